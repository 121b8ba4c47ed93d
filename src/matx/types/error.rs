//! Custom error types for the matx-text crate.

use thiserror::Error;

use super::models::TypeCode;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum MatxError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A section header is missing its closing `]` or carries an unreadable count.
    #[error("Malformed section header on line {line}: {reason} (`{text}`)")]
    MalformedHeader {
        line: usize,
        text: String,
        reason: String,
    },

    /// A field declaration uses a letter that is not one of `d`, `f`, `s`, `g`.
    #[error("Unexpected type character '{character}' in field '{field}' of section [{section}]")]
    InvalidTypeCharacter {
        section: String,
        field: String,
        character: char,
    },

    /// A field declaration has no `:` between its name and its type characters.
    #[error("Missing ':' separator after field name '{field}' in section [{section}]")]
    MissingFieldSeparator { section: String, field: String },

    /// A field declaration starts with `:` and so has no name.
    #[error("Field declaration without a name in section [{section}]")]
    EmptyFieldName { section: String },

    /// A field declaration has a `:` but no type characters after it.
    #[error("Field '{field}' in section [{section}] declares no type characters")]
    EmptyFieldType { section: String, field: String },

    /// A `{` schema block is never closed.
    #[error("Schema block in section [{section}] opened on line {line_number} is never closed with '}}'")]
    UnterminatedSchema { section: String, line_number: usize },

    /// A data line ran out of tokens before every field was filled.
    #[error(
        "Unexpected dimension in field '{field}' of section [{section}]: expected {expected} values, \
         but found {found} (line {line_number}: `{line}`)"
    )]
    TokenCountMismatch {
        section: String,
        field: String,
        expected: usize,
        found: usize,
        line_number: usize,
        line: String,
    },

    /// A data line has tokens left over after the last field.
    #[error("{count} unexpected trailing value(s) in section [{section}] (line {line_number}: `{line}`)")]
    TrailingTokens {
        section: String,
        count: usize,
        line_number: usize,
        line: String,
    },

    /// A token could not be converted to the scalar kind its field declares.
    #[error(
        "Cannot read '{token}' as {kind} for field '{field}' in section [{section}] \
         (line {line_number}: `{line}`)"
    )]
    InvalidScalar {
        section: String,
        field: String,
        token: String,
        kind: TypeCode,
        line_number: usize,
        line: String,
    },

    /// A declared row count does not match the number of rows found or written.
    #[error("Unexpected row count in section [{section}]: expected {expected} rows, but found {found}")]
    RowCountMismatch {
        section: String,
        expected: usize,
        found: usize,
    },

    /// A write disagreed with the schema fixed by the section's first line.
    #[error("Schema contract violated in section [{section}]: {detail}")]
    SchemaContractViolation { section: String, detail: String },

    /// More lines were written than the section header declared.
    #[error("Too many lines added to section [{section}]: only {declared} declared")]
    LineBudgetExceeded { section: String, declared: usize },

    /// A comment was written while a section was still accepting rows.
    #[error("Cannot write a comment inside open section [{section}]; close it first")]
    CommentInsideSection { section: String },

    /// A row or line operation was issued before any section was opened.
    #[error("No section is open; call begin_section first")]
    NoOpenSection,
}

/// A convenience `Result` type alias using the crate's `MatxError` type.
pub type Result<T> = std::result::Result<T, MatxError>;
