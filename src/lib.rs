//! # matx-text
//!
//! Reader and writer for the MATX text format: a human-readable, schema-carrying
//! tabular format used to move geometry, hierarchy, material and physics
//! records between tools.
//!
//! ```text
//! [ Mesh : 2 ]
//!  { Index:d Name:s   }
//! // ------- --------
//!    0       "Cube"
//!    1       "Sphere"
//! ```
//!
//! Decoding is a single call, [`parse`] (or [`read_file`]). Encoding goes
//! through a [`TextWriter`], which buffers each section until its last row is
//! known and then emits it column-aligned.
//!
//! ```
//! use matx_text::{TextWriter, parse};
//!
//! let mut writer = TextWriter::new(Vec::new());
//! writer.begin_section("Mesh", Some(2)).unwrap();
//! writer.write_row("Index:d Name:s", &[0.into(), "Cube".into()]).unwrap();
//! writer.end_line().unwrap();
//! writer.write_row("Index:d Name:s", &[1.into(), "Sphere".into()]).unwrap();
//! writer.end_line().unwrap();
//! let text = String::from_utf8(writer.finish().unwrap()).unwrap();
//!
//! let document = parse(&text).unwrap();
//! let mesh = document.get("Mesh").unwrap();
//! assert_eq!(mesh.rows.len(), 2);
//! ```

pub mod matx;

// Re-export the main types for convenience
pub use matx::{
    MatxError, ReaderOptions, Result, TextWriter, WriterOptions, format, parse, read_file, read_file_with,
    types::models::{
        Document, FieldSchema, FieldValue, Guid, Row, Section, TypeCode, VERSION_FIELD, VERSION_SECTION, Value,
    },
};
