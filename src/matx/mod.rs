//! Core MATX text format module

pub mod format;
pub mod iter;
pub mod reader;
pub mod types;
pub mod writer;
mod utils;

pub use reader::{ReaderOptions, parse, read_file, read_file_with};
pub use types::error::{MatxError, Result};
pub use writer::{TextWriter, WriterOptions};
