// ABOUTME: Bidirectional escaping codec that makes arbitrary text safe inside line-oriented formats.
// ABOUTME: Provides the general special-set codec and the fixed semicolon/newline codec used by format v1.

/// Marker that introduces every escape sequence.
pub const ESCAPE: char = '\\';

/// Control characters that are written with a letter token instead of themselves.
fn token_for(c: char) -> Option<char> {
    match c {
        '\n' => Some('n'),
        '\r' => Some('r'),
        '\t' => Some('t'),
        _ => None,
    }
}

fn control_for(token: char) -> Option<char> {
    match token {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        _ => None,
    }
}

/// Escape `text` so that none of the `special` characters appear unescaped.
///
/// The escape marker is always doubled. A special character is written as the
/// marker followed by itself, or by its letter token for newline, carriage return
/// and tab. Every other character passes through unchanged, including control
/// characters that are not in `special`.
///
/// `special` must not contain the letters `n`, `r` or `t`; they would collide with
/// the control-character tokens.
pub fn escape(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ESCAPE {
            out.push(ESCAPE);
            out.push(ESCAPE);
        } else if special.contains(&c) {
            out.push(ESCAPE);
            out.push(token_for(c).unwrap_or(c));
        } else {
            out.push(c);
        }
    }
    out
}

/// Reverse [`escape`] for the same `special` set.
///
/// An escaped character is translated only when the translated character belongs
/// to `special` (the doubled marker always is). Anything else keeps both the
/// marker and the character, so text escaped for a different special set passes
/// through untouched. A trailing lone marker is kept as is.
pub fn unescape(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => out.push(ESCAPE),
            Some(ESCAPE) => out.push(ESCAPE),
            Some(next) => {
                let translated = control_for(next).unwrap_or(next);
                if special.contains(&translated) {
                    out.push(translated);
                } else {
                    out.push(ESCAPE);
                    out.push(next);
                }
            }
        }
    }
    out
}

/// Escape a field for the semicolon-delimited v1 format: `\` becomes `\\`,
/// `;` becomes `\s` and newline becomes `\n`.
pub fn escape_v1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ';' => out.push_str("\\s"),
            '\n' => out.push_str("\\n"),
            ESCAPE => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape_v1`]. Unknown escapes yield the escaped character itself.
pub fn unescape_v1(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => out.push(ESCAPE),
            Some('s') => out.push(';'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
        }
    }
    out
}
