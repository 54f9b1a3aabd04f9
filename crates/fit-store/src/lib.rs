// ABOUTME: Persistence layer for fit, reading and writing the flat database file.
// ABOUTME: Provides the versioned format codecs, the in-memory record store, queries and a locked shared handle.

pub mod format;
pub mod query;
pub mod shared;
pub mod store;

pub use format::{FormatError, FormatVersion, Table, read_table, write_table};
pub use query::{BOARD_TYPES, Query};
pub use shared::SharedStore;
pub use store::{Fields, Placement, RecordStore, StoreError, StoreState};
