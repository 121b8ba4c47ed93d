//! Grammar pieces shared by the reader and the writer.
//!
//! # Module Organization
//!
//! - [`header`]: `[ Name ]` / `[ Name : N ]` section headers
//! - [`schema`]: `name:typechars` field declarations
//! - [`lexer`]: comment stripping and quote-aware tokenisation
//! - [`scalar`]: value rendering and token conversion
//! - [`layout`]: column widths and column-aligned emission
//!
//! # Document Structure
//!
//! ```text
//! [ SectionName : N ]            ← header::parse() / header::render()
//!  { field1:d field2:fff }       ← schema::parse_declarations()
//! // ------- -------------       ← layout::SectionLayout::separator_line()
//!    1       0.5 1.5 2.5         ← lexer::tokenize() + scalar::convert()
//! ```

pub mod header;
pub mod layout;
pub mod lexer;
pub mod scalar;
pub mod schema;
