// ABOUTME: Version 2 entries encoding: one quoted field per line, content may span lines, rows end with ----.
// ABOUTME: Only the quote character is escaped; newlines inside a field are kept as real line breaks.

use std::io::{BufRead, Write};

use fit_core::Row;
use fit_core::escape::{ESCAPE, escape, unescape};

use super::FormatError;
use super::lines::LineReader;

const QUOTE: char = '"';
const SPECIAL: &[char] = &[QUOTE];
const ROW_END: &str = "----";

pub(crate) fn read_entries<R: BufRead>(lines: &mut LineReader<R>) -> Result<Vec<Row>, FormatError> {
    let mut rows = Vec::new();
    while let Some(values) = read_row(lines)? {
        rows.push(Row::new(values, rows.len()));
    }
    Ok(rows)
}

/// Read the fields of one row. None means the section is over; a row cut
/// off by the end of the file is dropped.
fn read_row<R: BufRead>(lines: &mut LineReader<R>) -> Result<Option<Vec<String>>, FormatError> {
    let mut values = Vec::new();
    // escaped content of the field still waiting for its closing quote
    let mut open: Option<String> = None;

    loop {
        let Some(line) = lines.next_line()? else {
            if open.is_some() || !values.is_empty() {
                tracing::warn!(
                    "dropping unterminated row with {} complete fields at end of file",
                    values.len()
                );
            }
            return Ok(None);
        };

        if let Some(mut raw) = open.take() {
            match closing_body(&line) {
                Some(body) => {
                    raw.push_str(body);
                    values.push(unescape(&raw, SPECIAL));
                }
                None => {
                    raw.push_str(&line);
                    raw.push('\n');
                    open = Some(raw);
                }
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed == ROW_END {
            if values.is_empty() {
                continue;
            }
            return Ok(Some(values));
        }
        if trimmed.is_empty() {
            if values.is_empty() {
                return Ok(None);
            }
            continue;
        }

        let start = line.trim_start();
        let rest = start.strip_prefix(QUOTE).unwrap_or(start);
        match closing_body(rest) {
            Some(body) => values.push(unescape(body, SPECIAL)),
            None => {
                let mut raw = rest.to_string();
                raw.push('\n');
                open = Some(raw);
            }
        }
    }
}

/// If `text` ends (ignoring trailing whitespace) with an unescaped quote,
/// return everything before that quote.
fn closing_body(text: &str) -> Option<&str> {
    let body = text.trim_end().strip_suffix(QUOTE)?;
    let markers = body.chars().rev().take_while(|c| *c == ESCAPE).count();
    (markers % 2 == 0).then_some(body)
}

pub(crate) fn write_entries<W: Write>(out: &mut W, rows: &[Row]) -> Result<(), FormatError> {
    for row in rows {
        for value in row.values() {
            writeln!(out, "{QUOTE}{}{QUOTE}", escape(value, SPECIAL))?;
        }
        writeln!(out, "{ROW_END}")?;
    }
    Ok(())
}
