//! Scanning model output for embedded tool directives.
//!
//! A directive looks like `CALL TOOL: <name> <input>`:
//! - the `CALL TOOL:` prefix is matched case-insensitively,
//! - `<name>` is a run of ASCII letters, digits and underscores,
//! - `<input>` runs to the end of the line (or of the text) and is trimmed.
//!
//! Directives never span a line break. A name followed by anything other than
//! horizontal whitespace, or a directive with an empty input, is plain text.

const PREFIX: &[u8] = b"CALL TOOL:";

/// A parsed tool directive, borrowing from the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// The exact text the directive occupied, without its line break.
    pub raw: &'a str,
    pub tool: &'a str,
    /// The trimmed input.
    pub input: &'a str,
}

/// One piece of a scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Directive(Directive<'a>),
}

fn is_horizontal_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Tries to read a directive starting exactly at `start`.
fn directive_at(text: &str, start: usize) -> Option<Directive<'_>> {
    let bytes = text.as_bytes();
    let prefix_end = start + PREFIX.len();
    if bytes.len() < prefix_end || !bytes[start..prefix_end].eq_ignore_ascii_case(PREFIX) {
        return None;
    }

    let mut pos = prefix_end;
    while pos < bytes.len() && is_horizontal_space(bytes[pos]) {
        pos += 1;
    }

    let name_start = pos;
    while pos < bytes.len() && is_name_byte(bytes[pos]) {
        pos += 1;
    }
    if pos == name_start || pos == bytes.len() || !is_horizontal_space(bytes[pos]) {
        return None;
    }
    let tool = &text[name_start..pos];

    let line_end = text[pos..].find('\n').map_or(text.len(), |i| pos + i);
    let input = text[pos..line_end].trim();
    if input.is_empty() {
        return None;
    }

    Some(Directive {
        raw: &text[start..line_end],
        tool,
        input,
    })
}

/// Splits `text` into alternating literal and directive segments, left to right.
///
/// Concatenating the `raw` text of every segment reproduces the input.
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while pos + PREFIX.len() <= bytes.len() {
        // The prefix is ASCII, so a match can only start on a char boundary.
        if let Some(directive) = directive_at(text, pos) {
            if literal_start < pos {
                segments.push(Segment::Literal(&text[literal_start..pos]));
            }
            pos += directive.raw.len();
            literal_start = pos;
            segments.push(Segment::Directive(directive));
        } else {
            pos += 1;
        }
    }

    if literal_start < text.len() {
        segments.push(Segment::Literal(&text[literal_start..]));
    }
    segments
}

/// Matches a text that is nothing but a single directive, ignoring
/// surrounding whitespace.
pub fn parse_single(text: &str) -> Option<Directive<'_>> {
    let trimmed = text.trim();
    directive_at(trimmed, 0).filter(|d| d.raw.len() == trimmed.len())
}

impl Segment<'_> {
    /// The original text of this segment.
    pub fn raw(&self) -> &str {
        match self {
            Segment::Literal(text) => *text,
            Segment::Directive(d) => d.raw,
        }
    }
}
