//! Glob-style URL matching for registered match patterns
//!
//! A pattern matches a URL by treating every `*` as "any sequence of
//! characters" and requiring the whole URL to align with the rest of the
//! pattern, anchored at both ends. This is a deliberate simplification of
//! the platform's real match-pattern semantics (no scheme/host/path
//! decomposition), sufficient for per-tab match counting.

use crate::models::RegisteredScript;
use crate::parser::ALL_URLS_TOKEN;
use regex::Regex;

/// Whether a single match pattern applies to `url`.
pub fn pattern_matches_url(pattern: &str, url: &str) -> bool {
    if pattern == ALL_URLS_TOKEN {
        return true;
    }
    match compile_pattern(pattern) {
        Some(re) => re.is_match(url),
        None => false,
    }
}

/// Whether any of a registration's patterns applies to `url`.
pub fn registration_matches_url(registration: &RegisteredScript, url: &str) -> bool {
    registration
        .matches
        .iter()
        .any(|pattern| pattern_matches_url(pattern, url))
}

/// Number of registrations with at least one pattern matching `url`.
/// Each registration counts once however many of its patterns match.
pub fn count_matching(registrations: &[RegisteredScript], url: &str) -> usize {
    registrations
        .iter()
        .filter(|registration| registration_matches_url(registration, url))
        .count()
}

fn compile_pattern(pattern: &str) -> Option<Regex> {
    let escaped: Vec<String> = pattern.split('*').map(regex::escape).collect();
    let source = format!("^{}$", escaped.join(".*"));
    Regex::new(&source).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExecutionWorld, RunTiming};

    fn registration(id: u32, matches: &[&str]) -> RegisteredScript {
        RegisteredScript {
            id: RegisteredScript::id_for(id),
            matches: matches.iter().map(|m| m.to_string()).collect(),
            code: String::new(),
            world: ExecutionWorld::UserScript,
            run_at: RunTiming::DocumentIdle,
        }
    }

    #[test]
    fn test_exact_host_prefix_match() {
        assert!(pattern_matches_url(
            "https://example.com/*",
            "https://example.com/page1"
        ));
        assert!(!pattern_matches_url(
            "https://example.com/*",
            "https://other.com/page1"
        ));
    }

    #[test]
    fn test_wildcard_triple_matches_everything() {
        assert!(pattern_matches_url("*://*/*", "https://example.com/a/b?q=1"));
        assert!(pattern_matches_url("*://*/*", "ftp://files.example.com/pub"));
    }

    #[test]
    fn test_all_urls_token_matches_everything() {
        assert!(pattern_matches_url("<all_urls>", "https://example.com/"));
    }

    #[test]
    fn test_match_is_anchored() {
        // The pattern must cover the whole URL, not a substring.
        assert!(!pattern_matches_url(
            "https://example.com/",
            "https://example.com/page"
        ));
        assert!(!pattern_matches_url(
            "example.com/*",
            "https://example.com/page"
        ));
    }

    #[test]
    fn test_subdomain_wildcard() {
        assert!(pattern_matches_url(
            "https://*.example.com/*",
            "https://docs.example.com/intro"
        ));
    }

    #[test]
    fn test_count_counts_each_registration_once() {
        let registrations = vec![
            registration(1, &["https://example.com/*", "*://*/*"]),
            registration(2, &["https://other.com/*"]),
        ];
        // Registration 1 matches via both patterns but still counts once.
        assert_eq!(count_matching(&registrations, "https://example.com/x"), 1);
        assert_eq!(count_matching(&registrations, "https://other.com/x"), 2);
    }
}
