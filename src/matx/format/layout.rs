//! Column layout and section emission.
//!
//! Widths are only known once every row of a section has been rendered, so
//! the writer collects [`Cell`]s and [`ColumnStats`] while rows arrive and
//! hands them here when the section closes.
//!
//! ```text
//! [ Vertices : 2 ]
//!  { Index:d Pos:fff                      }
//! // ------- ----------------------------
//!    0       0.000000  1.000000 -2.500000
//!    1       3.250000 -1.000000  0.000000
//! ```

use super::scalar::Cell;
use crate::matx::types::models::FieldSchema;

/// Running width statistics for one (field, component) column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnStats {
    widest_negative: usize,
    widest_unsigned: usize,
    widest_plain: usize,
    has_negative: bool,
}

impl ColumnStats {
    pub fn observe(&mut self, cell: &Cell) {
        let width = cell.width();
        if !cell.numeric {
            self.widest_plain = self.widest_plain.max(width);
        } else if cell.is_negative() {
            self.has_negative = true;
            self.widest_negative = self.widest_negative.max(width);
        } else {
            self.widest_unsigned = self.widest_unsigned.max(width);
        }
    }

    /// Whether `cell` gets a leading space to line up with negative values.
    pub fn pads(&self, cell: &Cell) -> bool {
        self.has_negative && cell.numeric && !cell.is_negative()
    }

    /// Final width of the column, never less than one.
    pub fn width(&self) -> usize {
        let unsigned = self.widest_unsigned + usize::from(self.has_negative && self.widest_unsigned > 0);
        unsigned
            .max(self.widest_negative)
            .max(self.widest_plain)
            .max(1)
    }
}

/// When to repeat the schema as a comment block inside long sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRepeat {
    /// Repeat after every `interval` data lines. Zero disables repetition.
    pub interval: usize,
    /// Only repeat if more than this many lines remain, counting the one just written.
    pub min_remaining: usize,
}

impl Default for HeaderRepeat {
    fn default() -> Self {
        Self {
            interval: 80,
            min_remaining: 10,
        }
    }
}

#[derive(Debug)]
struct FieldLayout {
    spec: String,
    widths: Vec<usize>,
    total: usize,
}

impl FieldLayout {
    fn compute(field: &FieldSchema, stats: &[ColumnStats]) -> Self {
        let spec = field.spec();
        let mut widths: Vec<usize> = stats.iter().map(ColumnStats::width).collect();
        let mut total = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);

        let spec_len = spec.chars().count();
        if total < spec_len {
            if let Some(last) = widths.last_mut() {
                *last += spec_len - total;
            }
            total = spec_len;
        }

        Self { spec, widths, total }
    }

    fn padded_spec(&self) -> String {
        format!("{:<width$}", self.spec, width = self.total)
    }

    fn render(&self, cells: &[Cell], stats: &[ColumnStats], out: &mut String) {
        let mut field = String::with_capacity(self.total);
        let last = cells.len().saturating_sub(1);
        for (j, ((cell, width), column)) in cells.iter().zip(&self.widths).zip(stats).enumerate() {
            let mut component = String::with_capacity(*width);
            if column.pads(cell) {
                component.push(' ');
            }
            component.push_str(&cell.text);
            if j < last {
                field.push_str(&format!("{:<width$} ", component, width = width));
            } else {
                field.push_str(&component);
            }
        }
        out.push_str(&format!("{:<width$}", field, width = self.total));
    }
}

/// Computed widths for a whole section.
#[derive(Debug)]
pub struct SectionLayout {
    fields: Vec<FieldLayout>,
}

impl SectionLayout {
    /// `stats[i][j]` describes component `j` of field `i`.
    pub fn compute(fields: &[FieldSchema], stats: &[Vec<ColumnStats>]) -> Self {
        let fields = fields
            .iter()
            .zip(stats)
            .map(|(field, field_stats)| FieldLayout::compute(field, field_stats))
            .collect();
        Self { fields }
    }

    fn specs(&self) -> String {
        self.fields
            .iter()
            .map(FieldLayout::padded_spec)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// ` { spec spec }`
    pub fn schema_line(&self) -> String {
        format!(" {{ {} }}\n", self.specs())
    }

    /// `// ---- ---- `
    pub fn separator_line(&self) -> String {
        let dashes = self
            .fields
            .iter()
            .map(|f| "-".repeat(f.total))
            .collect::<Vec<_>>()
            .join(" ");
        format!("// {} \n", dashes)
    }

    fn repeated_schema_line(&self) -> String {
        format!("// {}\n", self.specs())
    }

    /// One data line. `cells` holds every component of the row in field order.
    pub fn data_line(&self, cells: &[Cell], stats: &[Vec<ColumnStats>]) -> String {
        let mut line = String::from("   ");
        let mut offset = 0;
        for (i, (field, field_stats)) in self.fields.iter().zip(stats).enumerate() {
            if i > 0 {
                line.push(' ');
            }
            let arity = field.widths.len();
            let end = (offset + arity).min(cells.len());
            field.render(&cells[offset..end], field_stats, &mut line);
            offset = end;
        }
        line.push('\n');
        line
    }
}

/// Renders a complete section: header, schema, separator, rows with periodic
/// schema repeats, and the trailing blank line.
pub fn render_section(
    header_line: &str,
    fields: &[FieldSchema],
    stats: &[Vec<ColumnStats>],
    rows: &[Vec<Cell>],
    repeat: HeaderRepeat,
) -> String {
    let layout = SectionLayout::compute(fields, stats);
    let separator = layout.separator_line();

    let mut out = String::new();
    out.push_str(header_line);
    out.push_str(&layout.schema_line());
    out.push_str(&separator);

    let line_count = rows.len();
    for (index, cells) in rows.iter().enumerate() {
        out.push_str(&layout.data_line(cells, stats));

        if repeat.interval > 0
            && (index + 1) % repeat.interval == 0
            && line_count - index > repeat.min_remaining
        {
            out.push_str(&separator);
            out.push_str(&layout.repeated_schema_line());
            out.push_str(&separator);
        }
    }

    out.push('\n');
    out
}
