// ABOUTME: On-disk database format: version header, [Config] block and a version-specific [Entries] block.
// ABOUTME: FormatVersion selects the entries serializer once; reading and writing go through read_table/write_table.

mod lines;
mod v1;
mod v2;

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use fit_core::{Config, Row};
use thiserror::Error;

pub use lines::LineReader;

const VERSION_KEY: &str = "Version";
const CONFIG_SECTION: &str = "Config";
const ENTRIES_SECTION: &str = "Entries";

/// Errors that can occur while reading or writing a database file.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing Version= header line")]
    MissingVersion,

    #[error("unsupported format version: {0}")]
    UnsupportedVersion(String),

    #[error("missing [{0}] section")]
    MissingSection(&'static str),

    #[error("malformed config line {line}: {text:?}")]
    MalformedConfig { line: usize, text: String },
}

/// Serialization variant declared on the first line of a database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    /// Semicolon-delimited single-line rows.
    V1,
    /// Quoted multi-line fields with `----` row terminators.
    V2,
}

impl FormatVersion {
    pub const LATEST: FormatVersion = FormatVersion::V2;

    pub fn tag(self) -> &'static str {
        match self {
            FormatVersion::V1 => "1",
            FormatVersion::V2 => "2",
        }
    }

    /// Read the [Config] and [Entries] sections that follow the version line.
    ///
    /// Section headers may come in any order; the first line that is not a
    /// known header ends the file. Both sections must be present.
    pub fn read_all<R: BufRead>(self, lines: &mut LineReader<R>) -> Result<Table, FormatError> {
        let mut config = None;
        let mut rows = None;

        while let Some(line) = lines.next_line()? {
            match line.trim().trim_matches(|c: char| c == '[' || c == ']') {
                CONFIG_SECTION => config = Some(read_config(lines)?),
                ENTRIES_SECTION => {
                    rows = Some(match self {
                        FormatVersion::V1 => v1::read_entries(lines)?,
                        FormatVersion::V2 => v2::read_entries(lines)?,
                    })
                }
                _ => break,
            }
        }

        Ok(Table {
            config: config.ok_or(FormatError::MissingSection(CONFIG_SECTION))?,
            rows: rows.ok_or(FormatError::MissingSection(ENTRIES_SECTION))?,
        })
    }

    /// Write both sections. The version line is written by [`write_table`].
    pub fn write_all<W: Write>(
        self,
        out: &mut W,
        config: &Config,
        rows: &[Row],
    ) -> Result<(), FormatError> {
        writeln!(out, "[{CONFIG_SECTION}]")?;
        for (key, values) in config.iter() {
            writeln!(out, "{}={};", key, values.join(";"))?;
        }
        writeln!(out, "[{ENTRIES_SECTION}]")?;
        match self {
            FormatVersion::V1 => v1::write_entries(out, rows),
            FormatVersion::V2 => v2::write_entries(out, rows),
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FormatVersion {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(FormatVersion::V1),
            "2" => Ok(FormatVersion::V2),
            other => Err(FormatError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// Everything a database file holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub config: Config,
    pub rows: Vec<Row>,
}

/// Read a whole database file: the version line, then the sections.
pub fn read_table<R: BufRead>(reader: R) -> Result<(FormatVersion, Table), FormatError> {
    let mut lines = LineReader::new(reader);
    let header = lines.next_line()?.ok_or(FormatError::MissingVersion)?;
    let (key, tag) = header.split_once('=').ok_or(FormatError::MissingVersion)?;
    if key.trim() != VERSION_KEY {
        return Err(FormatError::MissingVersion);
    }
    let version: FormatVersion = tag.parse()?;
    let table = version.read_all(&mut lines)?;
    Ok((version, table))
}

/// Write a whole database file in the given version.
pub fn write_table<W: Write>(
    mut out: W,
    version: FormatVersion,
    config: &Config,
    rows: &[Row],
) -> Result<(), FormatError> {
    writeln!(out, "{VERSION_KEY}={version}")?;
    version.write_all(&mut out, config, rows)?;
    out.flush()?;
    Ok(())
}

/// Parse `key=v1;v2;...;` lines until the next section header or end of file.
fn read_config<R: BufRead>(lines: &mut LineReader<R>) -> Result<Config, FormatError> {
    let mut config = Config::empty();

    loop {
        let at_header = match lines.peek_line()? {
            None => true,
            Some(next) => next.trim_start().starts_with('['),
        };
        if at_header {
            break;
        }
        let Some(line) = lines.next_line()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, values)) = line.split_once('=') else {
            return Err(FormatError::MalformedConfig {
                line: lines.line_no(),
                text: line,
            });
        };
        let values = values
            .split(';')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        config.set(key.trim(), values);
    }

    Ok(config)
}
