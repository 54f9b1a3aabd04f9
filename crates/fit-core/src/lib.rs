// ABOUTME: Core library for fit, holding the data model shared by the store and the command line.
// ABOUTME: Escaping codec, config block, field schema, default strategies and the Row record type.

pub mod config;
pub mod defaults;
pub mod escape;
pub mod row;
pub mod schema;

pub use config::Config;
pub use defaults::{DefaultContext, FieldDefault, NO_PARENT};
pub use row::{Row, RowView};
pub use schema::{Schema, fold_name};
