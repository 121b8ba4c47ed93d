//! Data structures shared by the reader and the writer.

use std::collections::HashMap;
use std::fmt;

use super::error::Result;
use crate::matx::format::schema;
use crate::matx::iter::ColumnIter;

/// Name of the leading record that carries the document's format version.
pub const VERSION_SECTION: &str = "MatxVersion";

/// Field holding the version number inside [`VERSION_SECTION`].
pub const VERSION_FIELD: &str = "Version";

/// The kind of a single scalar component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    Integer,
    Float,
    String,
    Guid,
}

impl TypeCode {
    /// Maps a declaration letter to its kind. Letters are case-insensitive.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'd' | 'D' => Some(Self::Integer),
            'f' | 'F' => Some(Self::Float),
            's' | 'S' => Some(Self::String),
            'g' | 'G' => Some(Self::Guid),
            _ => None,
        }
    }

    /// The canonical (lowercase) declaration letter.
    pub const fn as_char(self) -> char {
        match self {
            Self::Integer => 'd',
            Self::Float => 'f',
            Self::String => 's',
            Self::Guid => 'g',
        }
    }

    /// Whether rendered values of this kind take part in sign alignment.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::String => "String",
            Self::Guid => "Guid",
        };
        f.write_str(name)
    }
}

/// A named column group: one or more scalar components of fixed kind.
///
/// `components` is never empty for schemas produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSchema {
    pub name: String,
    pub components: Vec<TypeCode>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, components: Vec<TypeCode>) -> Self {
        Self {
            name: name.into(),
            components,
        }
    }

    /// Parses a list of `name:typechars` declarations separated by whitespace or commas.
    ///
    /// ```
    /// # use matx_text::{FieldSchema, TypeCode};
    /// let fields = FieldSchema::parse_list("Index:d Pos:fff").unwrap();
    /// assert_eq!(fields[1].components, vec![TypeCode::Float; 3]);
    /// ```
    pub fn parse_list(declarations: &str) -> Result<Vec<FieldSchema>> {
        schema::parse_declarations(declarations, "")
    }

    /// Number of scalar components (tokens) this field occupies per row.
    pub fn arity(&self) -> usize {
        self.components.len()
    }

    /// The `name:typechars` text used in schema lines.
    pub fn spec(&self) -> String {
        let mut spec = String::with_capacity(self.name.len() + 1 + self.components.len());
        spec.push_str(&self.name);
        spec.push(':');
        spec.extend(self.components.iter().map(|c| c.as_char()));
        spec
    }
}

impl fmt::Display for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec())
    }
}

/// A GUID component.
///
/// The writer renders `Text` as a quoted string and `Packed` as a quoted
/// `HHHHHHHH:LLLLLLLL` hex pair. The reader always yields `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Guid {
    Text(String),
    Packed(u64),
}

impl Guid {
    /// Decodes the `HHHHHHHH:LLLLLLLL` convention into a 64-bit value.
    ///
    /// Surrounding quotes are tolerated. Returns `None` for text that does not
    /// follow the convention.
    pub fn split_packed(&self) -> Option<u64> {
        match self {
            Self::Packed(value) => Some(*value),
            Self::Text(text) => {
                let text = text.trim_matches('"');
                let (high, low) = text.split_once(':')?;
                if high.len() != 8 || low.len() != 8 {
                    return None;
                }
                let high = u32::from_str_radix(high, 16).ok()?;
                let low = u32::from_str_radix(low, 16).ok()?;
                Some((u64::from(high) << 32) | u64::from(low))
            }
        }
    }
}

/// A single typed scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Guid(Guid),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Float value; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// String text, or the literal text of a textual GUID.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Guid(Guid::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_guid(&self) -> Option<&Guid> {
        match self {
            Value::Guid(g) => Some(g),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<usize> for Value {
    /// Indices and counts; values above `i64::MAX` saturate.
    fn from(v: usize) -> Self {
        Value::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Guid> for Value {
    fn from(v: Guid) -> Self {
        Value::Guid(v)
    }
}

/// The value(s) of one field in one row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A one-component field.
    Single(Value),
    /// A multi-component field, in component order.
    Tuple(Vec<Value>),
}

impl FieldValue {
    /// All components as a slice, whatever the arity.
    pub fn values(&self) -> &[Value] {
        match self {
            FieldValue::Single(v) => std::slice::from_ref(v),
            FieldValue::Tuple(vs) => vs,
        }
    }

    pub fn as_single(&self) -> Option<&Value> {
        match self {
            FieldValue::Single(v) => Some(v),
            FieldValue::Tuple(_) => None,
        }
    }
}

/// One data line: one entry per field, in schema order.
pub type Row = Vec<FieldValue>;

/// A named, optionally counted block of rows sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub declared_count: Option<usize>,
    pub fields: Vec<FieldSchema>,
    pub rows: Vec<Row>,
}

impl Section {
    pub fn new(name: impl Into<String>, declared_count: Option<usize>) -> Self {
        Self {
            name: name.into(),
            declared_count,
            fields: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterates one field's values down every row.
    ///
    /// Yields nothing when the section has no such field.
    pub fn column(&self, name: &str) -> ColumnIter<'_> {
        ColumnIter::new(&self.rows, self.field_index(name))
    }

    /// The value of field `name` in row `row`.
    pub fn value(&self, row: usize, name: &str) -> Option<&FieldValue> {
        let index = self.field_index(name)?;
        self.rows.get(row)?.get(index)
    }
}

/// All decoded sections of one document, looked up by name.
///
/// A later section with an already-seen name replaces the earlier one but
/// keeps its original position for iteration.
#[derive(Debug, Clone, Default)]
pub struct Document {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a section, returning the one it replaced, if any.
    pub fn insert(&mut self, section: Section) -> Option<Section> {
        match self.index.get(&section.name).copied() {
            Some(slot) => Some(std::mem::replace(&mut self.sections[slot], section)),
            None => {
                self.index.insert(section.name.clone(), self.sections.len());
                self.sections.push(section);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&slot| &self.sections[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in order of first appearance.
    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    /// The integer stored in the leading `[ MatxVersion ]` record, if present.
    pub fn format_version(&self) -> Option<i64> {
        self.get(VERSION_SECTION)?
            .column(VERSION_FIELD)
            .next()?
            .as_single()?
            .as_i64()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
