//! Iterators over decoded sections.

use std::slice::Iter;

use super::types::models::{FieldValue, Row};

/// Iterator over one field's values down every row of a section.
///
/// Created by [`Section::column()`](crate::Section::column).
#[derive(Debug, Clone)]
pub struct ColumnIter<'a> {
    rows: Iter<'a, Row>,
    field_index: Option<usize>,
}

impl<'a> ColumnIter<'a> {
    pub(crate) fn new(rows: &'a [Row], field_index: Option<usize>) -> Self {
        Self {
            rows: rows.iter(),
            field_index,
        }
    }
}

impl<'a> Iterator for ColumnIter<'a> {
    type Item = &'a FieldValue;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.field_index?;
        loop {
            let row = self.rows.next()?;
            if let Some(value) = row.get(index) {
                return Some(value);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.field_index {
            Some(_) => (0, Some(self.rows.len())),
            None => (0, Some(0)),
        }
    }
}
