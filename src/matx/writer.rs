//! Encoder: column-aligned sections written one at a time.
//!
//! A [`TextWriter`] holds at most one open section. Rows are rendered as they
//! arrive, but nothing reaches the output until the section is complete,
//! because column widths depend on every row:
//!
//! ```text
//! begin_section ─► write_row/write_fields (one or more per line) ─► end_line ─┐
//!        ▲                                                                    │
//!        └──────────── section flushed when the declared count is reached ◄───┘
//! ```
//!
//! Sections declared without a count grow until [`TextWriter::close_section`],
//! the next [`TextWriter::begin_section`], or [`TextWriter::finish`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info, trace};

use super::format::layout::{self, ColumnStats, HeaderRepeat};
use super::format::scalar::{self, Cell};
use super::format::{header, schema};
use super::types::error::{MatxError, Result};
use super::types::models::{FieldSchema, Guid, Section, VERSION_FIELD, VERSION_SECTION, Value};

/// Layout knobs. The defaults reproduce the standard format exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterOptions {
    pub header_repeat: HeaderRepeat,
}

/// Accumulated state of the one section currently being written.
#[derive(Debug)]
struct OpenSection {
    name: String,
    declared_count: Option<usize>,
    fields: Vec<FieldSchema>,
    /// `stats[field][component]`
    stats: Vec<Vec<ColumnStats>>,
    rows: Vec<Vec<Cell>>,
    line: Vec<Cell>,
    /// Fields supplied so far on the current line.
    field_cursor: usize,
}

impl OpenSection {
    fn new(name: &str, declared_count: Option<usize>) -> Self {
        Self {
            name: name.to_owned(),
            declared_count,
            fields: Vec::new(),
            stats: Vec::new(),
            rows: Vec::new(),
            line: Vec::new(),
            field_cursor: 0,
        }
    }

    fn is_defining_schema(&self) -> bool {
        self.rows.is_empty()
    }

    fn is_complete(&self) -> bool {
        self.declared_count == Some(self.rows.len())
    }

    fn violation(&self, detail: String) -> MatxError {
        MatxError::SchemaContractViolation {
            section: self.name.clone(),
            detail,
        }
    }

    fn check_budget(&self) -> Result<()> {
        match self.declared_count {
            Some(declared) if self.rows.len() >= declared => Err(MatxError::LineBudgetExceeded {
                section: self.name.clone(),
                declared,
            }),
            _ => Ok(()),
        }
    }

    /// Validates and renders one call's worth of fields, then commits them to
    /// the current line. Nothing changes if any part is rejected.
    fn push_fields(&mut self, fields: &[FieldSchema], values: &[Value]) -> Result<()> {
        self.check_budget()?;

        if let Some(field) = fields.iter().find(|f| f.arity() == 0) {
            return Err(self.violation(format!("field '{}' declares no components", field.name)));
        }

        let expected: usize = fields.iter().map(FieldSchema::arity).sum();
        if values.len() != expected {
            let specs: Vec<String> = fields.iter().map(FieldSchema::spec).collect();
            return Err(self.violation(format!(
                "expected {} values for `{}`, got {}",
                expected,
                specs.join(" "),
                values.len()
            )));
        }

        if !self.is_defining_schema() {
            for (offset, field) in fields.iter().enumerate() {
                let position = self.field_cursor + offset;
                match self.fields.get(position) {
                    Some(existing) if existing == field => {}
                    Some(existing) => {
                        return Err(self.violation(format!(
                            "line {} has `{}` at field position {}, expected `{}`",
                            self.rows.len(),
                            field,
                            position,
                            existing
                        )));
                    }
                    None => {
                        return Err(self.violation(format!(
                            "line {} supplies `{}` beyond the {} fields of the schema",
                            self.rows.len(),
                            field,
                            self.fields.len()
                        )));
                    }
                }
            }
        }

        let mut rendered = Vec::with_capacity(values.len());
        let mut values = values.iter();
        for field in fields {
            for (&code, value) in field.components.iter().zip(values.by_ref()) {
                let cell = scalar::render(code, value)
                    .map_err(|detail| self.violation(format!("field '{}': {}", field.name, detail)))?;
                rendered.push(cell);
            }
        }

        if self.is_defining_schema() {
            for field in fields {
                self.stats.push(vec![ColumnStats::default(); field.arity()]);
                self.fields.push(field.clone());
            }
        }

        let mut cells = rendered.into_iter();
        for offset in 0..fields.len() {
            let position = self.field_cursor + offset;
            for column in self.stats[position].iter_mut() {
                if let Some(cell) = cells.next() {
                    column.observe(&cell);
                    self.line.push(cell);
                }
            }
        }
        self.field_cursor += fields.len();
        Ok(())
    }

    fn end_line(&mut self) -> Result<()> {
        self.check_budget()?;
        if !self.is_defining_schema() && self.field_cursor != self.fields.len() {
            return Err(self.violation(format!(
                "line {} supplied {} of {} fields",
                self.rows.len(),
                self.field_cursor,
                self.fields.len()
            )));
        }
        trace!("[{}] line {} complete ({} values)", self.name, self.rows.len(), self.line.len());
        self.rows.push(std::mem::take(&mut self.line));
        self.field_cursor = 0;
        Ok(())
    }

    /// Checks that the section may be flushed now.
    fn check_closable(&self) -> Result<()> {
        if let Some(expected) = self.declared_count
            && self.rows.len() != expected
        {
            return Err(MatxError::RowCountMismatch {
                section: self.name.clone(),
                expected,
                found: self.rows.len(),
            });
        }
        if self.field_cursor > 0 {
            return Err(self.violation(format!(
                "line {} was started but never ended",
                self.rows.len()
            )));
        }
        Ok(())
    }

    fn render(&self, repeat: HeaderRepeat) -> String {
        let header_line = header::render(&self.name, self.declared_count);
        layout::render_section(&header_line, &self.fields, &self.stats, &self.rows, repeat)
    }
}

/// A counted section that already reached its declared count and was flushed.
#[derive(Debug)]
struct ClosedSection {
    name: String,
    declared: usize,
    /// A zero-count section still accepts the one `end_line` that closes it.
    closing_line_pending: bool,
}

/// Decoded GUIDs keep their quotes; drop them so rendering does not quote twice.
fn reencodable(value: &Value) -> Value {
    match value {
        Value::Guid(Guid::Text(text)) => {
            let bare = text
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .unwrap_or(text);
            Value::Guid(Guid::Text(bare.to_owned()))
        }
        other => other.clone(),
    }
}

/// Writes MATX sections to any [`Write`] sink.
///
/// ```
/// # use matx_text::TextWriter;
/// let mut writer = TextWriter::new(Vec::new());
/// writer.begin_section("Mesh", Some(1)).unwrap();
/// writer.write_row("Index:d Name:s", &[0.into(), "Cube".into()]).unwrap();
/// writer.end_line().unwrap();
/// let text = String::from_utf8(writer.finish().unwrap()).unwrap();
/// assert!(text.starts_with("[ Mesh : 1 ]\n"));
/// ```
#[derive(Debug)]
pub struct TextWriter<W: Write> {
    out: W,
    options: WriterOptions,
    open: Option<OpenSection>,
    /// The last counted section that closed itself.
    exhausted: Option<ClosedSection>,
    sections_written: usize,
}

impl TextWriter<BufWriter<File>> {
    /// Creates (or truncates) `path` and writes to it through a buffer.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Writing MATX file: {}", path.display());
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TextWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    pub fn with_options(out: W, options: WriterOptions) -> Self {
        Self {
            out,
            options,
            open: None,
            exhausted: None,
            sections_written: 0,
        }
    }

    /// Number of sections flushed so far.
    pub fn sections_written(&self) -> usize {
        self.sections_written
    }

    /// Name of the section currently accepting rows, if any.
    pub fn open_section(&self) -> Option<&str> {
        self.open.as_ref().map(|s| s.name.as_str())
    }

    /// Opens a new section.
    ///
    /// `Some(n)` writes `[ Name : n ]` and closes the section after the n-th
    /// [`end_line`](Self::end_line); `Some(0)` closes it immediately. `None`
    /// writes `[ Name ]` and accepts any number of lines.
    ///
    /// An open uncounted section is flushed first; an open counted section
    /// that has not reached its count is an error.
    pub fn begin_section(&mut self, name: &str, declared_count: Option<usize>) -> Result<()> {
        if self.open.is_some() {
            self.close_section()?;
        }
        self.exhausted = None;

        debug!("Section [{}] opened (declared {:?})", name, declared_count);
        let section = OpenSection::new(name, declared_count);
        if section.is_complete() {
            self.exhausted = Some(ClosedSection {
                name: section.name.clone(),
                declared: 0,
                closing_line_pending: true,
            });
            self.flush_section(section)?;
        } else {
            self.open = Some(section);
        }
        Ok(())
    }

    /// Adds fields to the current line from `name:typechars` specs.
    ///
    /// `values` holds every component of every spec, in order.
    pub fn write_row(&mut self, specs: &str, values: &[Value]) -> Result<()> {
        let section_name = self.current()?.name.clone();
        let fields = schema::parse_declarations(specs, &section_name)?;
        self.write_fields(&fields, values)
    }

    /// Adds fields to the current line from prepared schemas.
    ///
    /// The first line of a section defines its schema; every later line must
    /// repeat the same fields at the same positions.
    pub fn write_fields(&mut self, fields: &[FieldSchema], values: &[Value]) -> Result<()> {
        self.current()?.push_fields(fields, values)
    }

    /// Ends the current line. Flushes the section when its declared count is reached.
    ///
    /// A section declared with zero rows is already written by
    /// [`begin_section`](Self::begin_section); one `end_line` after it is
    /// accepted as its closing call and writes nothing.
    pub fn end_line(&mut self) -> Result<()> {
        if self.open.is_none()
            && let Some(closed) = self.exhausted.as_mut()
            && closed.closing_line_pending
        {
            closed.closing_line_pending = false;
            trace!("[{}] closing line accepted for empty section", closed.name);
            return Ok(());
        }

        let section = self.current()?;
        section.end_line()?;
        if section.is_complete() {
            let budget = section.declared_count.unwrap_or_default();
            if let Some(section) = self.open.take() {
                self.exhausted = Some(ClosedSection {
                    name: section.name.clone(),
                    declared: budget,
                    closing_line_pending: false,
                });
                self.flush_section(section)?;
            }
        }
        Ok(())
    }

    /// Flushes the open section.
    ///
    /// # Errors
    /// `RowCountMismatch` if a declared count has not been reached,
    /// `NoOpenSection` if nothing is open.
    pub fn close_section(&mut self) -> Result<()> {
        let section = self.current()?;
        section.check_closable()?;
        if let Some(section) = self.open.take() {
            self.flush_section(section)?;
        }
        Ok(())
    }

    /// Writes `// text` lines between sections.
    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        if let Some(section) = &self.open {
            return Err(MatxError::CommentInsideSection {
                section: section.name.clone(),
            });
        }
        for line in text.lines() {
            writeln!(self.out, "// {}", line)?;
        }
        Ok(())
    }

    /// Writes the leading `[ MatxVersion ]` record.
    pub fn write_version(&mut self, version: i64) -> Result<()> {
        self.begin_section(VERSION_SECTION, None)?;
        self.write_row(&format!("{}:d", VERSION_FIELD), &[Value::Integer(version)])?;
        self.end_line()?;
        self.close_section()
    }

    /// Re-encodes a decoded section.
    pub fn write_section(&mut self, section: &Section) -> Result<()> {
        if let Some(expected) = section.declared_count
            && expected != section.rows.len()
        {
            return Err(MatxError::RowCountMismatch {
                section: section.name.clone(),
                expected,
                found: section.rows.len(),
            });
        }

        self.begin_section(&section.name, section.declared_count)?;
        for row in &section.rows {
            if row.len() != section.fields.len() {
                return Err(MatxError::SchemaContractViolation {
                    section: section.name.clone(),
                    detail: format!("row has {} values for {} fields", row.len(), section.fields.len()),
                });
            }
            for (field, value) in section.fields.iter().zip(row) {
                let values: Vec<Value> = value.values().iter().map(reencodable).collect();
                self.write_fields(std::slice::from_ref(field), &values)?;
            }
            self.end_line()?;
        }
        if section.declared_count.is_none() {
            self.close_section()?;
        }
        Ok(())
    }

    /// Closes any open section, flushes, and returns the sink.
    pub fn finish(mut self) -> Result<W> {
        if self.open.is_some() {
            self.close_section()?;
        }
        self.out.flush()?;
        info!("Finished writing {} sections", self.sections_written);
        Ok(self.out)
    }

    fn current(&mut self) -> Result<&mut OpenSection> {
        let exhausted = &self.exhausted;
        self.open.as_mut().ok_or_else(|| match exhausted {
            Some(closed) => MatxError::LineBudgetExceeded {
                section: closed.name.clone(),
                declared: closed.declared,
            },
            None => MatxError::NoOpenSection,
        })
    }

    fn flush_section(&mut self, section: OpenSection) -> Result<()> {
        let text = section.render(self.options.header_repeat);
        self.out.write_all(text.as_bytes())?;
        self.sections_written += 1;
        debug!(
            "Flushed section [{}]: {} fields, {} rows, {} bytes",
            section.name,
            section.fields.len(),
            section.rows.len(),
            text.len()
        );
        Ok(())
    }
}
