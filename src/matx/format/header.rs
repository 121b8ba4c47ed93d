//! Section header grammar.
//!
//! ```text
//! [ Name ]          no declared count, no row check
//! [ Name : N ]      exactly N rows follow
//! ```

use crate::matx::types::error::{MatxError, Result};

/// A parsed `[ Name ]` / `[ Name : N ]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub name: String,
    pub declared_count: Option<usize>,
}

/// Whether a trimmed line opens a section (quote state is the caller's concern).
pub fn is_header_line(trimmed: &str) -> bool {
    trimmed.starts_with('[')
}

/// Parses a trimmed header line. `line_number` is 1-based and only used for errors.
pub fn parse(trimmed: &str, line_number: usize) -> Result<SectionHeader> {
    let malformed = |reason: &str| MatxError::MalformedHeader {
        line: line_number,
        text: trimmed.to_owned(),
        reason: reason.to_owned(),
    };

    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .map(|(inner, _)| inner)
        .ok_or_else(|| malformed("missing closing ']'"))?;

    let mut parts = inner.split(':');
    let name = parts.next().unwrap_or_default().trim();
    let count = parts.next().map(str::trim);
    if parts.next().is_some() {
        return Err(malformed("more than one ':' in header"));
    }
    if name.is_empty() {
        return Err(malformed("empty section name"));
    }

    let declared_count = match count {
        None | Some("") => None,
        Some(text) => Some(
            text.parse::<usize>()
                .map_err(|e| malformed(&format!("unparsable row count '{}': {}", text, e)))?,
        ),
    };

    Ok(SectionHeader {
        name: name.to_owned(),
        declared_count,
    })
}

/// Renders the header line, including its newline.
pub fn render(name: &str, declared_count: Option<usize>) -> String {
    match declared_count {
        Some(count) => format!("[ {} : {} ]\n", name, count),
        None => format!("[ {} ]\n", name),
    }
}
