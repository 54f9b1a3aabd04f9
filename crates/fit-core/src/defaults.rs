// ABOUTME: Default-value strategies for the columns of a new row, evaluated against a read-only snapshot.
// ABOUTME: Covers fixed literals, timestamps, config-driven defaults and fresh hashed identifiers.

use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};

use crate::config::{Config, DEFAULT_SUFFIX};
use crate::schema::fold_name;

/// Value stored in `Parent` when a row has no parent.
pub const NO_PARENT: &str = "none";

/// Number of hex digits in a generated id.
pub const ID_LEN: usize = 8;

/// Timestamp format of the `Created` and `Modified` columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How the value of a column is computed when the caller does not supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// A literal value.
    Fixed(&'static str),
    /// The current local time, second precision.
    Timestamp,
    /// The first value of `<dimension>.Default` in the config block.
    FromConfig(&'static str),
    /// A fresh identifier derived from the clock and the row count.
    FreshId,
}

/// Everything a default strategy may look at.
#[derive(Debug, Clone, Copy)]
pub struct DefaultContext<'a> {
    pub config: &'a Config,
    pub row_count: usize,
    pub now: DateTime<Local>,
}

impl FieldDefault {
    /// Strategy for a column name. Names are matched case-insensitively; a
    /// column without a known strategy defaults to the empty string.
    pub fn for_field(name: &str) -> Self {
        match fold_name(name).as_str() {
            "id" => FieldDefault::FreshId,
            "created" | "modified" => FieldDefault::Timestamp,
            "parent" => FieldDefault::Fixed(NO_PARENT),
            "status" => FieldDefault::FromConfig("Status"),
            "type" => FieldDefault::FromConfig("Type"),
            _ => FieldDefault::Fixed(""),
        }
    }

    pub fn resolve(&self, ctx: &DefaultContext<'_>) -> String {
        match self {
            FieldDefault::Fixed(value) => value.to_string(),
            FieldDefault::Timestamp => ctx.now.format(TIMESTAMP_FORMAT).to_string(),
            FieldDefault::FromConfig(dimension) => ctx
                .config
                .first(&format!("{dimension}{DEFAULT_SUFFIX}"))
                .unwrap_or_default()
                .to_string(),
            FieldDefault::FreshId => generate_id(&ctx.now, ctx.row_count),
        }
    }
}

/// Hash the microsecond timestamp followed by the row count and keep the first
/// [`ID_LEN`] hex digits, upper-cased. Uniqueness is checked by the store, not here.
pub fn generate_id(now: &DateTime<Local>, row_count: usize) -> String {
    let seed = format!("{}{}", now.format("%Y-%m-%dT%H:%M:%S%.6f"), row_count);
    let digest = Sha256::digest(seed.as_bytes());
    let mut id: String = digest.iter().map(|b| format!("{b:02X}")).collect();
    id.truncate(ID_LEN);
    id
}
