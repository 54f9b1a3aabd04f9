// ABOUTME: Plain-text and JSON output for the fit binary.
// ABOUTME: Writers take any io::Write so the output can be checked in tests.

use std::collections::BTreeMap;
use std::io::{self, Write};

use fit_core::RowView;
use fit_store::RecordStore;

/// Whole table as `|Field|Field|...|` header then one line per row, in position order.
pub fn dump<W: Write>(out: &mut W, store: &RecordStore) -> io::Result<()> {
    write_pipe_line(out, store.columns())?;
    for row in store.rows() {
        write_pipe_line(out, row.values())?;
    }
    Ok(())
}

fn write_pipe_line<W: Write>(out: &mut W, values: &[String]) -> io::Result<()> {
    for value in values {
        write!(out, "|{value}")?;
    }
    writeln!(out, "|")
}

/// One summary line per row.
pub fn list<W: Write>(out: &mut W, rows: &[RowView<'_>]) -> io::Result<()> {
    for row in rows {
        writeln!(
            out,
            "{:<8}  {:<8}  {:<8}  {}",
            row.id(),
            row.kind(),
            row.status(),
            first_line(row.title())
        )?;
    }
    Ok(())
}

/// Every field of a row, then its comments.
pub fn show<W: Write>(out: &mut W, row: &RowView<'_>, comments: &[RowView<'_>]) -> io::Result<()> {
    for (name, value) in row.to_map() {
        if value.contains('\n') {
            writeln!(out, "{name}:")?;
            for line in value.lines() {
                writeln!(out, "    {line}")?;
            }
        } else {
            writeln!(out, "{name}: {value}")?;
        }
    }
    if !comments.is_empty() {
        writeln!(out)?;
        writeln!(out, "Comments:")?;
        for comment in comments {
            writeln!(out, "  [{}] {}", comment.created(), first_line(comment.title()))?;
            for line in comment.description().lines() {
                writeln!(out, "      {line}")?;
            }
        }
    }
    Ok(())
}

/// `key=value` lines.
pub fn pairs<W: Write>(out: &mut W, map: &BTreeMap<String, String>) -> io::Result<()> {
    for (key, value) in map {
        writeln!(out, "{key}={value}")?;
    }
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
