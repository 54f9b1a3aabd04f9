// ABOUTME: Defines Config, the ordered key to value-sequence map stored in a database file's [Config] block.
// ABOUTME: Holds the field schema, enumerations and colour tables, with built-in defaults for a fresh store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key naming the ordered list of columns every row carries.
pub const FIELDS_KEY: &str = "Fields";

/// Suffix of the key holding colours aligned with another key's values.
pub const COLOR_SUFFIX: &str = ".Color";

/// Suffix of the key holding the default value for another key.
pub const DEFAULT_SUFFIX: &str = ".Default";

/// Configuration block of a database file. Keys keep their insertion order so
/// that a file can be read and written back byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    entries: Vec<(String, Vec<String>)>,
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self::empty();
        config.set("Status.Default", strings(&["Backlog"]));
        config.set("Type.Default", strings(&["Todo"]));
        config.set("Type", strings(&["Todo", "Comment", "Bug", "Wiki"]));
        config.set("Status", strings(&["Backlog", "WIP", "Done"]));
        config.set("Status.Color", strings(&["#FF7777", "#77AAFF", "#77FF77"]));
        config.set("Type.Color", strings(&["Green", "Green", "Red", "Grey"]));
        config.set(
            FIELDS_KEY,
            strings(&[
                "Id",
                "Type",
                "Title",
                "Description",
                "Created",
                "Modified",
                "Parent",
                "Status",
            ]),
        );
        config
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Config {
    /// A config block with no keys at all.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Values stored under `key`, if the key exists.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Values stored under `key`, or an empty slice.
    pub fn values(&self, key: &str) -> &[String] {
        self.get(key).unwrap_or(&[])
    }

    /// First value stored under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|v| v.first())
            .map(|v| v.as_str())
    }

    /// Replace the values of an existing key in place, or append a new key.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    /// Keys and their values in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column names, in order.
    pub fn fields(&self) -> &[String] {
        self.values(FIELDS_KEY)
    }

    /// Pair each value of `key` with the colour at the same position in
    /// `key.Color`.
    ///
    /// Both sequences are expected to have the same length. When they do not,
    /// the pairing stops at the shorter one.
    pub fn color_map(&self, key: &str) -> BTreeMap<String, String> {
        let colors = self.values(&format!("{key}{COLOR_SUFFIX}"));
        self.values(key)
            .iter()
            .cloned()
            .zip(colors.iter().cloned())
            .collect()
    }
}
