//! Scalar rendering (write side) and conversion (read side).
//!
//! These are the only two places that branch on [`TypeCode`].

use crate::matx::types::models::{Guid, TypeCode, Value};

/// Decimal places used for every float on write.
pub const FLOAT_PRECISION: usize = 6;

/// One rendered scalar, ready for column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    /// Numeric cells take part in sign alignment.
    pub numeric: bool,
}

impl Cell {
    pub fn is_negative(&self) -> bool {
        self.numeric && self.text.starts_with('-')
    }

    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// Renders `value` as a component of kind `code`.
///
/// Floats accept integers, GUIDs accept integers (packed) and strings (text).
/// Any other pairing is rejected with a description of the mismatch.
pub fn render(code: TypeCode, value: &Value) -> Result<Cell, String> {
    let text = match (code, value) {
        (TypeCode::Integer, Value::Integer(v)) => v.to_string(),
        (TypeCode::Float, Value::Float(v)) => format!("{:.*}", FLOAT_PRECISION, v),
        (TypeCode::Float, Value::Integer(v)) => format!("{:.*}", FLOAT_PRECISION, *v as f64),
        (TypeCode::String, Value::String(s)) => quote(s),
        (TypeCode::Guid, Value::Guid(Guid::Text(s)) | Value::String(s)) => quote(s),
        (TypeCode::Guid, Value::Guid(Guid::Packed(v))) => packed_guid(*v),
        (TypeCode::Guid, Value::Integer(v)) => packed_guid(*v as u64),
        (code, value) => {
            return Err(format!("{} component cannot hold {:?}", code, value));
        }
    };
    Ok(Cell {
        text,
        numeric: code.is_numeric(),
    })
}

/// Converts one token to a scalar of kind `code`, or `None` if it does not parse.
pub fn convert(code: TypeCode, token: &str) -> Option<Value> {
    match code {
        TypeCode::Integer => token.parse::<i64>().ok().map(Value::Integer),
        TypeCode::Float => token.parse::<f64>().ok().map(Value::Float),
        TypeCode::String => Some(Value::String(unquote(token).to_owned())),
        TypeCode::Guid => Some(Value::Guid(Guid::Text(token.to_owned()))),
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s)
}

fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token)
}

/// `"HHHHHHHH:LLLLLLLL"`: high and low 32 bits as uppercase hex.
fn packed_guid(value: u64) -> String {
    format!("\"{:08X}:{:08X}\"", value >> 32, value & 0xFFFF_FFFF)
}
