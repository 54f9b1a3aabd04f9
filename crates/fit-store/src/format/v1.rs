// ABOUTME: Version 1 entries encoding: one row per line, fields separated and terminated by semicolons.
// ABOUTME: Fields go through the fixed semicolon/newline codec; a blank or whitespace-only line or end of file ends the section.

use std::io::{BufRead, Write};

use fit_core::Row;
use fit_core::escape::{escape_v1, unescape_v1};

use super::FormatError;
use super::lines::LineReader;

pub(crate) fn read_entries<R: BufRead>(lines: &mut LineReader<R>) -> Result<Vec<Row>, FormatError> {
    let mut rows = Vec::new();
    while let Some(line) = lines.next_line()? {
        if line.trim().is_empty() {
            break;
        }
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let mut fields: Vec<String> = line.split(';').map(unescape_v1).collect();
        if fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        if fields.is_empty() {
            break;
        }
        rows.push(Row::new(fields, rows.len()));
    }
    Ok(rows)
}

pub(crate) fn write_entries<W: Write>(out: &mut W, rows: &[Row]) -> Result<(), FormatError> {
    for row in rows {
        let fields: Vec<String> = row.values().iter().map(|v| escape_v1(v)).collect();
        writeln!(out, "{};", fields.join(";"))?;
    }
    Ok(())
}
