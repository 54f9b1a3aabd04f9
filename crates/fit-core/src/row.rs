// ABOUTME: Defines Row, one record of the table (issue, comment or wiki page), plus a named read view.
// ABOUTME: Field values are plain text laid out by the Schema; position is kept apart from the values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// A single record. `values` follows the schema's column order; `position`
/// is the row's rank in the table and is never written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    values: Vec<String>,
    position: usize,
}

impl Row {
    pub fn new(values: Vec<String>, position: usize) -> Self {
        Self { values, position }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    pub fn get(&self, column: usize) -> Option<&str> {
        self.values.get(column).map(|v| v.as_str())
    }

    /// Overwrite one column. Returns false if the column does not exist.
    pub fn set(&mut self, column: usize, value: impl Into<String>) -> bool {
        match self.values.get_mut(column) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Pad with empty values or cut off extra values so the row has exactly
    /// `width` columns. Returns true if anything changed.
    pub fn fit_to_width(&mut self, width: usize) -> bool {
        if self.values.len() == width {
            return false;
        }
        self.values.resize(width, String::new());
        true
    }

    pub fn view<'a>(&'a self, schema: &'a Schema) -> RowView<'a> {
        RowView { row: self, schema }
    }
}

/// Read access to a row by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    row: &'a Row,
    schema: &'a Schema,
}

impl<'a> RowView<'a> {
    /// Value of the named column, or None if the schema has no such column.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.schema.column(name).and_then(|c| self.row.get(c))
    }

    fn named(&self, name: &str) -> &'a str {
        self.get(name).unwrap_or_default()
    }

    pub fn id(&self) -> &'a str {
        self.row.get(self.schema.id_column()).unwrap_or_default()
    }

    pub fn kind(&self) -> &'a str {
        self.named("Type")
    }

    pub fn title(&self) -> &'a str {
        self.named("Title")
    }

    pub fn description(&self) -> &'a str {
        self.named("Description")
    }

    pub fn created(&self) -> &'a str {
        self.named("Created")
    }

    pub fn modified(&self) -> &'a str {
        self.named("Modified")
    }

    pub fn parent(&self) -> &'a str {
        self.named("Parent")
    }

    pub fn status(&self) -> &'a str {
        self.named("Status")
    }

    pub fn position(&self) -> usize {
        self.row.position
    }

    pub fn row(&self) -> &'a Row {
        self.row
    }

    /// Column name to value mapping for every configured column.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.schema
            .names()
            .iter()
            .cloned()
            .zip(self.row.values.iter().cloned())
            .collect()
    }
}
