use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One line of text extracted from the PDF.
///
/// Ordering (page, then line within page) is the only document structure
/// retained; no glyph coordinates survive extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    pub text: String,
    pub page_index: usize,
    pub line_index: usize,
}

/// A reference range in comparable form.
///
/// Range text that exists but matches no known notation is kept verbatim in
/// `Unparsed` rather than dropped, so a human reviewer can still see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParsedRange {
    Bounded { low: f64, high: f64 },
    LowerBound { min: f64 },
    UpperBound { max: f64 },
    Enumerated { allowed: BTreeSet<String> },
    Unparsed { raw: String },
}

/// Interpretation of a measured value against its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Normal,
    High,
    Low,
    /// Qualitative value outside the enumerated allowed set.
    Abnormal,
    /// No range could be parsed, or the value and range are incomparable.
    Unknown,
}

/// One measured lab value with its name, result, unit and interpreted status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerObservation {
    pub name: String,
    /// The value token exactly as printed ("95", "Negative", ...).
    pub raw_value: String,
    /// Parsed numeric value; `None` for qualitative results.
    pub numeric_value: Option<f64>,
    /// Unit exactly as printed. No unit-system conversion is performed.
    pub unit: Option<String>,
    pub reference_range: Option<ParsedRange>,
    pub status: Status,
    /// Panel header in force when the line was seen. Advisory only; never
    /// affects dedup or status.
    pub section: Option<String>,
}

/// Patient and report header fields, best effort.
///
/// Absence is represented explicitly; a field that could not be located or
/// parsed stays `None` and is never substituted with the current date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub patient_name: Option<String>,
    pub patient_dob: Option<NaiveDate>,
    pub test_date: Option<NaiveDate>,
    /// Configured per vendor profile, not extracted from text. Header
    /// branding is unreliable.
    pub lab_name: String,
}

/// Counters for what the parser saw and what became of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    pub total_lines: usize,
    pub candidate_lines: usize,
    /// Candidate lines that failed to yield a name and a value, plus
    /// denylisted names. Dropped silently from the output, counted here.
    pub skipped_candidates: usize,
    /// Multi-page repeats removed by the assembler.
    pub deduplicated: usize,
}

/// The final artifact. Owned by the caller; the engine holds no state
/// across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    pub metadata: ReportMetadata,
    pub biomarkers: Vec<BiomarkerObservation>,
    pub diagnostics: ParseDiagnostics,
}
