//! Compiled regex patterns for field extraction.
//!
//! All patterns are compiled once at first use with `LazyLock`.
//! Patterns are grouped by the field chain that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Rating Patterns
// =============================================================================

/// Accessible star label: "5 stars", "4.0 stars", "1 star", "Rated 3 stars".
/// Group 1 is the integer part.
pub static STAR_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)(?:[.,]\d+)?\s*stars?\b").expect("STAR_LABEL regex")
});

/// Accessible "out of five" label: "Rated 4 out of 5". Group 1 is the integer part.
pub static OUT_OF_FIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)(?:[.,]\d+)?\s*(?:out\s+of|/)\s*5\b").expect("OUT_OF_FIVE regex")
});

/// Detail row text: "Food: 5", "Service 4/5". Group 1 is the label, group 2 the rating.
pub static DETAIL_ROW_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:0-9]*[^:0-9\s])\s*:?\s*([1-5])(?:\s*/\s*5)?\s*$").expect("DETAIL_ROW_TEXT regex")
});

// =============================================================================
// Time Patterns
// =============================================================================

/// Relative time expression: "3 days ago", "a month ago", "an hour ago".
///
/// Group 1 is either a positive integer or the article `a`/`an`; group 2 is
/// the unit without its plural `s`.
pub static RELATIVE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+|an?)\s+(second|minute|hour|day|week|month|year)s?\s+ago\b")
        .expect("RELATIVE_TIME regex")
});

// =============================================================================
// Reviewer Patterns
// =============================================================================

/// Reviewer contribution count: "12 reviews", "1,204 reviews", "1 review".
pub static REVIEW_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d[\d,.\u{a0} ]*)\s+reviews?\b").expect("REVIEW_COUNT regex")
});

/// Trusted reviewer marker phrase.
pub static TRUSTED_REVIEWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(local\s+guide|trusted\s+reviewer|top\s+contributor)\b")
        .expect("TRUSTED_REVIEWER regex")
});

// =============================================================================
// Generic Patterns
// =============================================================================

/// First run of digits (with optional thousands separators).
pub static INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d[\d,.]*").expect("INTEGER regex")
});

/// Multiple whitespace characters for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

/// CSS-safe class token, usable in a synthesized `tag.class` descriptor.
pub static CSS_IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_-]*$").expect("CSS_IDENT regex")
});

/// Parse the digits of a count like "1,204" or "1.204" into an integer.
#[must_use]
pub fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
