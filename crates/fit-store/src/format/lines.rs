// ABOUTME: Line source over any BufRead with one line of lookahead and line numbering.
// ABOUTME: Strips only the trailing newline so carriage returns inside field content survive.

use std::io::{self, BufRead};

/// Reads a stream one physical line at a time.
pub struct LineReader<R> {
    inner: R,
    peeked: Option<Option<String>>,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            peeked: None,
            line_no: 0,
        }
    }

    /// Number of the line most recently returned by [`next_line`](Self::next_line), starting at 1.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Next line without its `\n`, or None at end of stream.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let line = match self.peeked.take() {
            Some(line) => line,
            None => self.read_raw()?,
        };
        if line.is_some() {
            self.line_no += 1;
        }
        Ok(line)
    }

    /// Look at the next line without consuming it.
    pub fn peek_line(&mut self) -> io::Result<Option<&str>> {
        if self.peeked.is_none() {
            let line = self.read_raw()?;
            self.peeked = Some(line);
        }
        Ok(self.peeked.as_ref().and_then(|l| l.as_deref()))
    }

    fn read_raw(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.inner.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
        }
        Ok(Some(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_lines_without_newline() {
        let mut lines = LineReader::new("one\ntwo\r\n\nthree".as_bytes());
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("two\r"));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("three"));
        assert_eq!(lines.next_line().unwrap(), None);
        assert_eq!(lines.line_no(), 4);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut lines = LineReader::new("a\nb\n".as_bytes());
        assert_eq!(lines.peek_line().unwrap(), Some("a"));
        assert_eq!(lines.peek_line().unwrap(), Some("a"));
        assert_eq!(lines.line_no(), 0);
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(lines.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(lines.peek_line().unwrap(), None);
        assert_eq!(lines.next_line().unwrap(), None);
    }
}
