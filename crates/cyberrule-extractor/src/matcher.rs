//! Span matching and overlap resolution
//!
//! A pattern yields every leftmost non-overlapping match in a description,
//! each scored from its surrounding context. Across patterns, spans are
//! claimed first-come in registry order: once accepted, a span blocks any
//! later match that shares a character with it, whatever its category.

use crate::pattern::Pattern;
use crate::registry::PatternRegistry;
use crate::MatchSpan;

/// Terms that raise confidence when they precede a match
const SECURITY_TERMS: [&str; 6] = [
    "vulnerability",
    "exploit",
    "attack",
    "flaw",
    "cve",
    "security",
];

/// Characters inspected before a match
const PREFIX_WINDOW: usize = 30;
/// Characters inspected after a match
const SUFFIX_WINDOW: usize = 20;
/// Matches shorter than this are penalized
const SHORT_MATCH: usize = 3;

const SHORT_MATCH_FACTOR: f64 = 0.8;
const SECURITY_CONTEXT_FACTOR: f64 = 1.1;
const CITATION_FACTOR: f64 = 0.7;

/// Apply one pattern to a description
pub fn match_pattern(pattern: &Pattern, text: &str) -> Vec<MatchSpan> {
    let mut spans = Vec::new();

    // find_iter yields increasing offsets, so byte -> char conversion
    // can resume from the previous match
    let mut byte_cursor = 0;
    let mut char_cursor = 0;

    for mat in pattern.matcher().find_iter(text) {
        if mat.start() == mat.end() {
            continue;
        }

        let start = char_cursor + text[byte_cursor..mat.start()].chars().count();
        let end = start + mat.as_str().chars().count();
        byte_cursor = mat.end();
        char_cursor = end;

        spans.push(MatchSpan {
            start,
            end,
            matched_text: mat.as_str().to_string(),
            confidence: score_confidence(text, mat.start(), mat.end()),
        });
    }

    spans
}

/// Context-based confidence for the match at byte range `[start, end)`
pub fn score_confidence(text: &str, start: usize, end: usize) -> f64 {
    let matched = &text[start..end];
    let mut confidence = 1.0;

    if matched.chars().count() < SHORT_MATCH {
        confidence *= SHORT_MATCH_FACTOR;
    }

    let prefix = last_chars(&text[..start], PREFIX_WINDOW).to_lowercase();
    if SECURITY_TERMS.iter().any(|term| prefix.contains(term)) {
        confidence *= SECURITY_CONTEXT_FACTOR;
    }

    let suffix = first_chars(&text[end..], SUFFIX_WINDOW);
    if prefix.contains("reference") || suffix.contains("http") {
        confidence *= CITATION_FACTOR;
    }

    f64::min(confidence, 1.0)
}

/// Up to `n` characters from the start of `s`
pub(crate) fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Up to `n` characters from the end of `s`
pub(crate) fn last_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Tracks spans already claimed in one description
#[derive(Debug, Default)]
pub struct OverlapResolver {
    accepted: Vec<(usize, usize)>,
}

impl OverlapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `[start, end)` against every accepted span
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.accepted.iter().any(|&(s, e)| !(end <= s || start >= e))
    }

    /// Claim the span unless it overlaps an accepted one
    pub fn try_accept(&mut self, span: &MatchSpan) -> bool {
        if self.overlaps(span.start, span.end) {
            return false;
        }
        self.accepted.push((span.start, span.end));
        true
    }

    /// Accepted spans in acceptance order
    pub fn accepted(&self) -> &[(usize, usize)] {
        &self.accepted
    }
}

/// Run every registry pattern over `text` and keep the matches that win
/// their span, in acceptance order
pub fn resolve_matches<'r>(
    registry: &'r PatternRegistry,
    text: &str,
) -> Vec<(&'r Pattern, MatchSpan)> {
    let mut resolver = OverlapResolver::new();
    let mut accepted = Vec::new();

    for pattern in registry.patterns() {
        for span in match_pattern(pattern, text) {
            if resolver.try_accept(&span) {
                accepted.push((pattern, span));
            }
        }
    }

    accepted
}
