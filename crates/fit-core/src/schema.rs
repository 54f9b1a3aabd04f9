// ABOUTME: Schema maps the configured field names to fixed column indices, case-insensitively.
// ABOUTME: Built once from the Fields config entry and used for every named row access.

use std::collections::HashMap;

use crate::config::Config;
use crate::defaults::FieldDefault;

/// Case folding applied to field names wherever they are compared.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Column layout of every row in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema from column names. If a name repeats (ignoring case) the
    /// first column wins lookups.
    pub fn new(names: &[String]) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (column, name) in names.iter().enumerate() {
            index.entry(fold_name(name)).or_insert(column);
        }
        Self {
            names: names.to_vec(),
            index,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.fields())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of values each row holds.
    pub fn width(&self) -> usize {
        self.names.len()
    }

    /// Column index of `name`, compared case-insensitively.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(&fold_name(name)).copied()
    }

    /// Column holding the row identifier: `Id` when configured, else the first.
    pub fn id_column(&self) -> usize {
        self.column("Id").unwrap_or(0)
    }

    /// Default strategy of every column, in column order.
    pub fn defaults(&self) -> Vec<FieldDefault> {
        self.names
            .iter()
            .map(|name| FieldDefault::for_field(name))
            .collect()
    }
}
