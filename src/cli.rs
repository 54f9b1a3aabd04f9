// ABOUTME: Command-line definitions for the fit binary: global flags and one subcommand per store operation.
// ABOUTME: Field arguments are NAME=VALUE pairs collected into the store's field mapping.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fit_store::{Fields, FormatVersion};

/// fit - flyweight issue tracker over a plain text file
#[derive(Debug, Parser)]
#[command(name = "fit", version, about = "Flyweight issue tracker over a plain text file")]
pub struct Cli {
    /// Database file (overrides FIT_FILE)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Format version to write, 1 or 2 (overrides FIT_OUTPUT_VERSION)
    #[arg(long, global = true, value_name = "VERSION")]
    pub output_version: Option<FormatVersion>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List rows, optionally filtered
    List {
        /// Keep rows of these types (repeatable)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        kinds: Vec<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(short, long)]
        parent: Option<String>,

        #[arg(long)]
        id: Option<String>,

        /// Only board cards (todo and bug)
        #[arg(long, conflicts_with = "kinds")]
        board: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show every field of one row and its comments
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Add a row and print its id
    Add {
        /// NAME=VALUE pairs; unset fields get their defaults
        #[arg(value_name = "NAME=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Change fields of an existing row
    Update {
        id: String,

        #[arg(value_name = "NAME=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },

    /// Update the row named by Id=..., or add one if no Id is given
    Save {
        #[arg(value_name = "NAME=VALUE", value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },

    /// Add a comment to an issue
    Comment {
        /// Issue the comment belongs to
        issue: String,

        title: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Set the status of a row and optionally place it before another
    Move {
        id: String,

        status: String,

        /// Row to place it before, or "empty" for the end
        #[arg(long, value_name = "ID")]
        before: Option<String>,
    },

    /// Place a row before another one, or at the end with "empty"
    Reorder {
        id: String,

        #[arg(value_name = "BEFORE")]
        before: String,
    },

    /// Print the configured field names
    Columns,

    /// Print the values of a config key
    Config { key: String },

    /// Print the value to colour mapping of a config key
    Colors {
        key: String,

        #[arg(long)]
        json: bool,
    },

    /// Print the whole table, one |-separated line per row
    Dump,

    /// Rewrite the file in another format version
    Migrate {
        #[arg(long, value_name = "VERSION")]
        to: FormatVersion,
    },
}

/// Parse one NAME=VALUE argument.
pub fn parse_field(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {arg:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("field name missing in {arg:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Collect parsed pairs into the store's field mapping. Later pairs win.
pub fn to_fields(pairs: &[(String, String)]) -> Fields {
    pairs.iter().cloned().collect()
}
