//! Lab-report extraction engine.
//!
//! Turns the raw bytes of a clinical lab PDF (Quest Diagnostics and
//! similar) into a structured [`ParsedReport`]: biomarker observations
//! with parsed reference ranges and derived abnormality flags, plus
//! patient/report metadata. Lab reports are semi-structured free text
//! with inconsistent column layout, line wrapping and multi-page
//! continuation, so extraction is heuristic and degrades gracefully:
//! whatever the heuristics cannot read is surfaced as `Unparsed` ranges,
//! `Unknown` statuses or `None` fields. That is data for a human reviewer,
//! never an invented value and never a per-line error.
//!
//! The engine is pure, synchronous and deterministic: one buffer in, one
//! report out, no state across calls, safe to invoke concurrently on
//! independent buffers. Vendor quirks (name aliases, unit vocabulary,
//! denylists) live in data-only [`VendorProfile`]s.

pub mod assemble;
pub mod classify;
pub mod error;
pub mod metadata;
pub mod orchestrator;
pub mod pdf;
pub mod profile;
pub mod range;
pub mod resolve;
pub mod sanitize;
pub mod types;

#[cfg(test)]
pub(crate) mod testpdf;

pub use error::ParseError;
pub use orchestrator::{parse_lines, parse_report, parse_report_with_key};
pub use profile::{VendorProfile, GENERIC_PROFILE_KEY};
pub use range::parse_range;
pub use types::{
    BiomarkerObservation, ParseDiagnostics, ParsedRange, ParsedReport, RawLine, ReportMetadata,
    Status,
};
