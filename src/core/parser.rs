// DRCScope - core/parser.rs
//
// Report parsing: scans text line by line through the result-line matcher
// and builds classified violation records.
// Core layer: accepts already-decoded text, never touches the filesystem.

use crate::core::matcher;
use crate::core::model::ViolationRecord;

/// Result of parsing a single report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    /// Matched records, in line order.
    pub records: Vec<ViolationRecord>,
    /// Total lines processed.
    pub lines_processed: u64,
}

/// Characters that end a line. `\r\n` counts as one break.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split text into lines on every universal line break.
///
/// Besides `\n`, `\r\n`, and lone `\r` this covers the vertical tab, form
/// feed, file/group/record separators, NEL, and the Unicode line and
/// paragraph separators. A trailing break does not start an extra line.
pub fn split_lines(content: &str) -> Lines<'_> {
    Lines { rest: content }
}

/// Iterator returned by [`split_lines`].
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(start) = self.rest.find(LINE_BREAKS) else {
            let line = self.rest;
            self.rest = "";
            return Some(line);
        };

        let line = &self.rest[..start];
        let after = &self.rest[start..];
        let skip = if after.starts_with("\r\n") {
            2
        } else {
            after.chars().next().map_or(0, char::len_utf8)
        };
        self.rest = &after[skip..];
        Some(line)
    }
}

/// Parse the text of one report.
///
/// Every line is tried against the result-line grammar; non-matching lines are
/// skipped without error. The result is a pure function of the arguments.
///
/// # Arguments
/// * `content` - Report text (the app layer handles reading and decoding)
/// * `source_file` - Identifier stamped on every record
pub fn parse_content(content: &str, source_file: &str) -> ParseResult {
    let mut records = Vec::new();
    let mut lines_processed: u64 = 0;

    for (line_idx, line) in split_lines(content).enumerate() {
        lines_processed += 1;

        if let Some(m) = matcher::match_line(line) {
            tracing::trace!(
                file = source_file,
                line = line_idx + 1,
                layer = m.layer,
                rule = m.rule,
                count = m.count,
                "Result line matched"
            );
            records.push(ViolationRecord::new(m.layer, m.rule, m.count, source_file));
        }
    }

    tracing::debug!(
        file = source_file,
        records = records.len(),
        lines = lines_processed,
        "Parsing complete"
    );

    ParseResult {
        records,
        lines_processed,
    }
}
