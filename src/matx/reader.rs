//! Decoder: document text to [`Document`].
//!
//! Decoding runs in two passes:
//! 1. **Split**: scan lines for `[ Name ]` / `[ Name : N ]` headers, tracking
//!    quote state so a `[` inside a multi-line string never opens a section.
//! 2. **Decode**: per section, strip comments, read the `{ ... }` schema,
//!    tokenise each data line, map tokens onto fields and check the row count.
//!
//! Any error aborts the whole document; no partial result is returned.

use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use log::{debug, info, trace, warn};

use super::format::header::{self, SectionHeader};
use super::format::lexer::{self, CommentStripper};
use super::format::{scalar, schema};
use super::types::error::{MatxError, Result};
use super::types::models::{Document, FieldSchema, FieldValue, Row, Section};
use super::utils;

/// Options for the file-level wrappers.
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Text encoding of the file. A byte order mark takes precedence.
    pub encoding: &'static Encoding,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
        }
    }
}

impl ReaderOptions {
    /// Selects the encoding by label, e.g. `"windows-1252"`.
    pub fn with_encoding_label(mut self, label: &str) -> Self {
        self.encoding = utils::parse_encoding(label);
        self
    }
}

/// Reads and decodes a document from disk with default options.
pub fn read_file(path: impl AsRef<Path>) -> Result<Document> {
    read_file_with(path, ReaderOptions::default())
}

/// Reads and decodes a document from disk.
///
/// # Errors
/// Returns an error if the file cannot be read or any section fails to decode.
pub fn read_file_with(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Document> {
    let path = path.as_ref();
    info!("Reading MATX file: {}", path.display());
    let bytes = fs::read(path)?;
    let text = utils::decode_text(&bytes, options.encoding);
    parse(&text)
}

/// Decodes a complete document.
///
/// Sections are keyed by name; a repeated name replaces the earlier section.
pub fn parse(text: &str) -> Result<Document> {
    info!("Parsing MATX document ({} bytes)", text.len());

    let mut document = Document::new();
    for raw in split_sections(text)? {
        let section = decode_section(raw)?;
        let name = section.name.clone();
        if document.insert(section).is_some() {
            warn!("Section [{}] appears more than once; keeping the last one", name);
        }
    }

    info!("Parsed {} sections", document.len());
    Ok(document)
}

/// A section's header plus its raw, trimmed body lines with 1-based line numbers.
#[derive(Debug)]
struct RawSection {
    header: SectionHeader,
    lines: Vec<(usize, String)>,
}

fn split_sections(text: &str) -> Result<Vec<RawSection>> {
    let mut sections: Vec<RawSection> = Vec::new();
    let mut in_quotes = false;

    for (index, line) in text.split('\n').enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if lexer::count_quotes(trimmed) % 2 == 1 {
            in_quotes = !in_quotes;
        }

        if !in_quotes && header::is_header_line(trimmed) {
            let header = header::parse(trimmed, line_number)?;
            trace!("Section [{}] starts on line {}", header.name, line_number);
            sections.push(RawSection {
                header,
                lines: Vec::new(),
            });
        } else if let Some(current) = sections.last_mut() {
            current.lines.push((line_number, trimmed.to_owned()));
        } else {
            trace!("Ignoring line {} before the first section", line_number);
        }
    }

    Ok(sections)
}

fn decode_section(raw: RawSection) -> Result<Section> {
    let SectionHeader {
        name,
        declared_count,
    } = raw.header;

    let mut stripper = CommentStripper::new();
    let cleaned: Vec<(usize, String)> = raw
        .lines
        .into_iter()
        .map(|(number, line)| (number, stripper.strip(&line)))
        .collect();

    let (fields, schema_span) = match locate_schema(&cleaned, &name)? {
        Some((declaration, span)) => (schema::parse_declarations(&declaration, &name)?, Some(span)),
        None => {
            debug!("Section [{}] has no schema block", name);
            (Vec::new(), None)
        }
    };

    let mut section = Section::new(name, declared_count);
    section.fields = fields;

    for (index, (line_number, line)) in cleaned.iter().enumerate() {
        let in_schema = schema_span.is_some_and(|(start, end)| (start..=end).contains(&index));
        if in_schema || line.is_empty() || line.starts_with('{') || is_separator_line(line) {
            continue;
        }
        let row = decode_line(&section.name, &section.fields, *line_number, line)?;
        section.rows.push(row);
    }

    if let Some(expected) = section.declared_count
        && section.rows.len() != expected
    {
        return Err(MatxError::RowCountMismatch {
            section: section.name,
            expected,
            found: section.rows.len(),
        });
    }

    debug!(
        "Decoded section [{}]: {} fields, {} rows (declared {:?})",
        section.name,
        section.fields.len(),
        section.rows.len(),
        section.declared_count
    );
    Ok(section)
}

/// Finds the first `{ ... }` block in the comment-stripped body.
///
/// Returns the declaration text between the braces and the (first, last)
/// indices of the lines it spans.
fn locate_schema(lines: &[(usize, String)], section: &str) -> Result<Option<(String, (usize, usize))>> {
    let Some((start, open)) = lines
        .iter()
        .enumerate()
        .find_map(|(index, (_, line))| find_unquoted(line, '{').map(|pos| (index, pos)))
    else {
        return Ok(None);
    };

    let mut declaration = String::new();
    let mut rest = &lines[start].1[open + 1..];
    let mut index = start;
    loop {
        if let Some(close) = find_unquoted(rest, '}') {
            declaration.push_str(&rest[..close]);
            return Ok(Some((declaration, (start, index))));
        }
        declaration.push_str(rest);
        declaration.push('\n');

        index += 1;
        match lines.get(index) {
            Some((_, line)) => rest = line.as_str(),
            None => {
                return Err(MatxError::UnterminatedSchema {
                    section: section.to_owned(),
                    line_number: lines[start].0,
                });
            }
        }
    }
}

/// A run of dashes, as in `---- ----` (a leading `-` alone is a negative value).
fn is_separator_line(line: &str) -> bool {
    line.starts_with('-') && line.chars().all(|c| c == '-' || c.is_whitespace())
}

fn find_unquoted(text: &str, target: char) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == target && !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

fn decode_line(section: &str, fields: &[FieldSchema], line_number: usize, line: &str) -> Result<Row> {
    let tokens = lexer::tokenize(line);
    trace!("[{}] line {}: {} tokens", section, line_number, tokens.len());

    let mut row = Row::with_capacity(fields.len());
    let mut cursor = 0;

    for field in fields {
        let remaining = tokens.len() - cursor;
        if remaining < field.arity() {
            return Err(MatxError::TokenCountMismatch {
                section: section.to_owned(),
                field: field.name.clone(),
                expected: field.arity(),
                found: remaining,
                line_number,
                line: line.to_owned(),
            });
        }

        let mut values = Vec::with_capacity(field.arity());
        for (&code, &token) in field.components.iter().zip(&tokens[cursor..]) {
            let value = scalar::convert(code, token).ok_or_else(|| MatxError::InvalidScalar {
                section: section.to_owned(),
                field: field.name.clone(),
                token: token.to_owned(),
                kind: code,
                line_number,
                line: line.to_owned(),
            })?;
            values.push(value);
        }
        cursor += field.arity();

        row.push(match values.len() {
            1 => FieldValue::Single(values.remove(0)),
            _ => FieldValue::Tuple(values),
        });
    }

    if cursor < tokens.len() {
        return Err(MatxError::TrailingTokens {
            section: section.to_owned(),
            count: tokens.len() - cursor,
            line_number,
            line: line.to_owned(),
        });
    }

    Ok(row)
}
