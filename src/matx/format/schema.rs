//! Field declaration grammar: `name:typechars` entries.
//!
//! The same grammar serves the `{ ... }` schema block on the read side and the
//! `"Index:d Pos:fff"` specs callers hand to the writer. Entries are separated
//! by whitespace and/or commas.

use std::iter::Peekable;
use std::str::Chars;

use log::trace;

use crate::matx::types::error::{MatxError, Result};
use crate::matx::types::models::{FieldSchema, TypeCode};

/// Parses every declaration in `text`, in order.
///
/// `section` is only used to give errors context.
pub fn parse_declarations(text: &str, section: &str) -> Result<Vec<FieldSchema>> {
    let mut chars = text.chars().peekable();
    let mut fields = Vec::new();

    loop {
        skip_separators(&mut chars);
        if chars.peek().is_none() {
            break;
        }
        let field = parse_one(&mut chars, section)?;
        trace!("Declared field {} in [{}]", field, section);
        fields.push(field);
    }

    Ok(fields)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn skip_separators(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|&c| is_separator(c)).is_some() {}
}

fn parse_one(chars: &mut Peekable<Chars<'_>>, section: &str) -> Result<FieldSchema> {
    let mut name = String::new();
    while let Some(c) = chars.next_if(|&c| c != ':' && !is_separator(c)) {
        name.push(c);
    }

    if chars.next_if_eq(&':').is_none() {
        return Err(MatxError::MissingFieldSeparator {
            section: section.to_owned(),
            field: name,
        });
    }
    if name.is_empty() {
        return Err(MatxError::EmptyFieldName {
            section: section.to_owned(),
        });
    }

    let mut components = Vec::new();
    while let Some(c) = chars.next_if(|&c| !is_separator(c)) {
        match TypeCode::from_char(c) {
            Some(code) => components.push(code),
            None => {
                return Err(MatxError::InvalidTypeCharacter {
                    section: section.to_owned(),
                    field: name,
                    character: c,
                });
            }
        }
    }

    if components.is_empty() {
        return Err(MatxError::EmptyFieldType {
            section: section.to_owned(),
            field: name,
        });
    }

    Ok(FieldSchema::new(name, components))
}
