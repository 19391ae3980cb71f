use tracing::debug;

use crate::assemble::assemble;
use crate::classify::{classify_lines, LineKind};
use crate::error::ParseError;
use crate::metadata::extract_metadata;
use crate::pdf::extract_lines;
use crate::profile::VendorProfile;
use crate::range::parse_range;
use crate::resolve::{has_range_text, resolve, split_trailing};
use crate::types::{ParseDiagnostics, ParsedRange, ParsedReport, RawLine};

/// Parse a lab-report PDF with the given vendor profile.
///
/// Pure transformation: one buffer in, one report out, no state across
/// calls. Fails only when the buffer is not a readable, text-bearing PDF;
/// a document in which nothing matches still produces a report with an
/// empty biomarker list and whatever metadata was found.
pub fn parse_report(pdf_bytes: &[u8], profile: &VendorProfile) -> Result<ParsedReport, ParseError> {
    let lines = extract_lines(pdf_bytes)?;
    Ok(parse_lines(&lines, profile))
}

/// Parse a lab-report PDF selecting a built-in profile by key.
/// `None` selects the generic profile.
pub fn parse_report_with_key(
    pdf_bytes: &[u8],
    profile_key: Option<&str>,
) -> Result<ParsedReport, ParseError> {
    let profile = match profile_key {
        Some(key) => VendorProfile::builtin(key)?,
        None => VendorProfile::generic(),
    };
    parse_report(pdf_bytes, profile)
}

/// Text-level entry point: classify, resolve and assemble lines that have
/// already been extracted. Infallible: every heuristic miss becomes data
/// (`Unparsed`, `Unknown`, `None`) rather than an error, and one bad line
/// never aborts the document.
pub fn parse_lines(lines: &[RawLine], profile: &VendorProfile) -> ParsedReport {
    let metadata = extract_metadata(lines, profile);
    let classified = classify_lines(lines);

    let mut diagnostics = ParseDiagnostics {
        total_lines: lines.len(),
        ..ParseDiagnostics::default()
    };
    let mut observations = Vec::new();

    let mut i = 0;
    while i < classified.len() {
        let entry = &classified[i];
        if let LineKind::BiomarkerCandidate(candidate) = &entry.kind {
            diagnostics.candidate_lines += 1;
            let mut candidate = candidate.clone();

            // Wrapped rows: when the value column fits but the range wraps,
            // the range prints alone on the next line. Adopt that line if it
            // classified as noise yet parses as a recognizable range.
            if !has_range_text(&candidate, profile) {
                if let Some(next) = classified.get(i + 1) {
                    if next.kind == LineKind::Noise && is_range_continuation(&next.line, profile) {
                        candidate.trailing.push(' ');
                        candidate.trailing.push_str(next.line.text.trim());
                        i += 1;
                    }
                }
            }

            match resolve(&candidate, entry.section.as_deref(), profile) {
                Some(observation) => observations.push(observation),
                None => diagnostics.skipped_candidates += 1,
            }
        }
        i += 1;
    }

    debug!(
        total_lines = diagnostics.total_lines,
        candidates = diagnostics.candidate_lines,
        "classified document"
    );

    assemble(observations, metadata, profile, diagnostics)
}

/// A continuation line carries only range text (and possibly a unit), e.g.
/// `0.40-4.50` or `0.40-4.50 mIU/L`.
fn is_range_continuation(line: &RawLine, profile: &VendorProfile) -> bool {
    let (_, range_text) = split_trailing(&line.text, profile);
    match range_text {
        Some(text) => !matches!(parse_range(&text), ParsedRange::Unparsed { .. }),
        None => false,
    }
}
