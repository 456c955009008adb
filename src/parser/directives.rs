//! Extraction of `@match` and `@run-at` directives from script comments
//!
//! Directives are recognized in single-line comments and anywhere inside
//! block comments. No `==UserScript==` wrapper is required; the directive
//! token alone is enough, so freeform snippets keep working.

use crate::models::RunTiming;
use lazy_static::lazy_static;
use regex::Regex;

/// Catch-all pattern used when a script declares no valid `@match`.
pub const ALL_URLS_PATTERN: &str = "*://*/*";

/// Literal token the platform accepts as "every URL".
pub const ALL_URLS_TOKEN: &str = "<all_urls>";

lazy_static! {
    static ref MATCH_DIRECTIVE: Regex = Regex::new(r"@match\s+(\S+)").unwrap();

    static ref RUN_AT_DIRECTIVE: Regex = Regex::new(r"@run-at\s+(\S+)").unwrap();

    // <scheme>://<host>[:port]<path>; host is "*", a "*."-prefixed name, or
    // a bare name; path starts with "/" and contains no whitespace.
    static ref MATCH_PATTERN: Regex = Regex::new(
        r"^(\*|https?|file|ftp|wss?)://(\*|(?:\*\.)?[^/*:\s]+)(?::\d+)?(/\S*)$"
    )
    .unwrap();
}

/// Extract all valid `@match` patterns from a script body, in scan order.
///
/// Duplicates are kept. If no valid pattern is found the result is exactly
/// `["*://*/*"]`, so every script has a non-empty effective match set.
pub fn extract_match_patterns(body: &str) -> Vec<String> {
    let mut patterns = Vec::new();

    for line in comment_lines(body) {
        for cap in MATCH_DIRECTIVE.captures_iter(&line) {
            let pattern = cap[1].trim();
            if is_valid_match_pattern(pattern) {
                patterns.push(pattern.to_string());
            }
        }
    }

    if patterns.is_empty() {
        patterns.push(ALL_URLS_PATTERN.to_string());
    }
    patterns
}

/// Validate a match pattern following Chrome's match pattern syntax.
///
/// See <https://developer.chrome.com/docs/extensions/mv3/match_patterns/>.
pub fn is_valid_match_pattern(pattern: &str) -> bool {
    if pattern == ALL_URLS_TOKEN || pattern == ALL_URLS_PATTERN {
        return true;
    }
    MATCH_PATTERN.is_match(pattern)
}

/// Extract the script's run timing from its `@run-at` directive.
///
/// The first occurrence in scan order is authoritative. Absent or
/// unrecognized values resolve to [`RunTiming::DocumentIdle`].
pub fn extract_run_at(body: &str) -> RunTiming {
    for line in comment_lines(body) {
        if let Some(cap) = RUN_AT_DIRECTIVE.captures(&line) {
            return RunTiming::parse(cap[1].trim()).unwrap_or_default();
        }
    }
    RunTiming::DocumentIdle
}

/// Yield the comment text of each line: the suffix after `//` and the
/// content of `/* */` blocks, tracking block state across lines.
fn comment_lines(body: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut in_block = false;

    for raw in body.lines() {
        let mut rest = raw;
        let mut text = String::new();

        if in_block {
            match rest.find("*/") {
                Some(end) => {
                    text.push_str(&rest[..end]);
                    rest = &rest[end + 2..];
                    in_block = false;
                }
                None => {
                    lines.push(raw.to_string());
                    continue;
                }
            }
        }

        loop {
            let line_start = rest.find("//");
            let block_start = rest.find("/*");
            match (line_start, block_start) {
                (Some(l), Some(b)) if l < b => {
                    text.push_str(&rest[l + 2..]);
                    break;
                }
                (Some(l), None) => {
                    text.push_str(&rest[l + 2..]);
                    break;
                }
                (_, Some(b)) => {
                    let after = &rest[b + 2..];
                    match after.find("*/") {
                        Some(end) => {
                            text.push_str(&after[..end]);
                            text.push(' ');
                            rest = &after[end + 2..];
                        }
                        None => {
                            text.push_str(after);
                            in_block = true;
                            break;
                        }
                    }
                }
                (None, None) => break,
            }
        }

        if !text.trim().is_empty() {
            lines.push(text);
        }
    }

    lines
}
