use std::sync::LazyLock;

use regex::Regex;

use crate::metadata::contains_metadata_anchor;
use crate::types::RawLine;

/// Classification of one extracted line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Patient/report header line; handled by the metadata extractor.
    Metadata,
    /// Matches the `name value [unit] [range]` grammar.
    BiomarkerCandidate(Candidate),
    /// Panel title scoping the biomarkers that follow it.
    SectionHeader,
    /// Page numbers, footers, disclaimers.
    Noise,
}

/// A biomarker-candidate line split into its grammatical parts.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub value_token: String,
    /// Everything after the value token: unit and/or range text, in either
    /// column order, possibly interleaved with H/L flag tokens.
    pub trailing: String,
}

/// A line with its classification and the section header in force when it
/// was seen.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    pub line: RawLine,
    pub kind: LineKind,
    pub section: Option<String>,
}

/// Permissive candidate grammar: a name (alphabetic/parenthetical tokens,
/// never starting with a digit), whitespace, then a value token (numeric
/// literal or qualitative vocabulary). The value must be followed by
/// whitespace or end of line, so `70-99` never reads as value `70`.
static CANDIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?P<name>[A-Za-z(][A-Za-z0-9 ,.'()/%+-]*?)\s+(?P<value>\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|non-reactive|not\s+detected|negative|positive|reactive|detected)(?P<trailing>(?:\s.*)?)$",
    )
    .unwrap()
});

/// Section headers are short, digit-free lines.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z ,()/&'-]{2,39}$").unwrap());

/// Page footers would otherwise satisfy the candidate grammar
/// ("Page 3 of 5" reads as name "Page", value "3").
static PAGE_FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^page\s+\d+(\s+of\s+\d+)?$").unwrap());

/// Classify every line, threading the current section through the stream as
/// an explicit accumulator. Pure function of its input.
pub fn classify_lines(lines: &[RawLine]) -> Vec<ClassifiedLine> {
    let mut classified = Vec::with_capacity(lines.len());
    let mut section: Option<String> = None;

    for line in lines {
        let kind = classify_line(&line.text);
        if kind == LineKind::SectionHeader {
            section = Some(line.text.trim().to_string());
        }
        classified.push(ClassifiedLine {
            line: line.clone(),
            kind,
            section: section.clone(),
        });
    }

    classified
}

/// Classify a single line. Metadata anchors take priority over the
/// candidate grammar so "Date of Birth: 01/01/1980" never becomes a
/// biomarker named "Date".
pub fn classify_line(text: &str) -> LineKind {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return LineKind::Noise;
    }

    if contains_metadata_anchor(trimmed) {
        return LineKind::Metadata;
    }

    if PAGE_FOOTER_RE.is_match(trimmed) {
        return LineKind::Noise;
    }

    if let Some(caps) = CANDIDATE_RE.captures(trimmed) {
        return LineKind::BiomarkerCandidate(Candidate {
            name: caps["name"].trim().to_string(),
            value_token: caps["value"].to_string(),
            trailing: caps["trailing"].trim().to_string(),
        });
    }

    if is_section_header(trimmed) {
        return LineKind::SectionHeader;
    }

    LineKind::Noise
}

fn is_section_header(text: &str) -> bool {
    if !SECTION_RE.is_match(text) {
        return false;
    }
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    if letters.peek().is_none() {
        return false;
    }
    let all_caps = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .all(|c| c.is_uppercase());
    all_caps || is_title_case(text)
}

fn is_title_case(text: &str) -> bool {
    text.split_whitespace().all(|word| {
        word.chars()
            .next()
            .is_some_and(|c| !c.is_alphabetic() || c.is_uppercase())
    })
}
