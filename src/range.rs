use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::ParsedRange;

/// Qualitative results labs print instead of numbers. Lowercase,
/// whitespace-normalized for comparison.
pub(crate) const QUALITATIVE_VOCABULARY: &[&str] = &[
    "negative",
    "positive",
    "reactive",
    "non-reactive",
    "detected",
    "not detected",
];

/// `70-99`, `0.40 - 4.50`, `1,000-2,000`
static BOUNDED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<low>\d[\d,]*(?:\.\d+)?)\s*-\s*(?P<high>\d[\d,]*(?:\.\d+)?)$").unwrap()
});

/// `>40`, `>=40`, `≥40`, Quest's `> OR = 40`
static LOWER_BOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:≥|>\s*(?:or\s*=)?\s*=?)\s*(?P<min>\d[\d,]*(?:\.\d+)?)$").unwrap()
});

/// `<5`, `<=5.6`, `≤5.6`, Quest's `< OR = 5.6`
static UPPER_BOUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:≤|<\s*(?:or\s*=)?\s*=?)\s*(?P<max>\d[\d,]*(?:\.\d+)?)$").unwrap()
});

/// A single qualitative word or list item: letters, inner spaces, hyphens.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z -]*$").unwrap());

/// Parse the textual representation of a reference range.
///
/// Matchers are tried in order, first match wins. Anything unrecognized
/// falls into `Unparsed`, including a bare number, which is ambiguous
/// between a ceiling and a floor. Never errors: absence of a recognizable
/// pattern is data.
pub fn parse_range(text: &str) -> ParsedRange {
    let trimmed = text.trim();

    if let Some(caps) = BOUNDED_RE.captures(trimmed) {
        if let (Some(low), Some(high)) = (parse_number(&caps["low"]), parse_number(&caps["high"]))
        {
            return ParsedRange::Bounded { low, high };
        }
    }

    if let Some(caps) = LOWER_BOUND_RE.captures(trimmed) {
        if let Some(min) = parse_number(&caps["min"]) {
            return ParsedRange::LowerBound { min };
        }
    }

    if let Some(caps) = UPPER_BOUND_RE.captures(trimmed) {
        if let Some(max) = parse_number(&caps["max"]) {
            return ParsedRange::UpperBound { max };
        }
    }

    if let Some(allowed) = parse_enumerated(trimmed) {
        return ParsedRange::Enumerated { allowed };
    }

    ParsedRange::Unparsed {
        raw: trimmed.to_string(),
    }
}

/// Parse a numeric token, accepting thousands separators.
pub(crate) fn parse_number(token: &str) -> Option<f64> {
    token.replace(',', "").parse::<f64>().ok()
}

/// Whether a token is one of the known qualitative result words.
pub(crate) fn is_qualitative(token: &str) -> bool {
    let normalized = normalize_token(token);
    QUALITATIVE_VOCABULARY.contains(&normalized.as_str())
}

/// Lowercase and collapse runs of whitespace, so `NOT  DETECTED` compares
/// equal to `Not Detected`.
pub(crate) fn normalize_token(token: &str) -> String {
    token
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A qualitative vocabulary word, or a comma-separated list of words.
/// A single word outside the vocabulary stays unrecognized; free text like
/// "See note" must not become an enumerated range.
fn parse_enumerated(text: &str) -> Option<BTreeSet<String>> {
    let items: Vec<&str> = text.split(',').map(str::trim).collect();
    if items.iter().any(|i| i.is_empty() || !WORD_RE.is_match(i)) {
        return None;
    }
    if items.len() == 1 && !is_qualitative(items[0]) {
        return None;
    }
    Some(items.iter().map(|i| (*i).to_string()).collect())
}
