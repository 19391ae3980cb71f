use std::collections::BTreeSet;

use tracing::debug;

use crate::profile::{normalize_name, VendorProfile};
use crate::types::{BiomarkerObservation, ParseDiagnostics, ParsedReport, ReportMetadata};

/// Merge resolved observations and metadata into the final report.
///
/// Applies the profile's alias table and denylist, then deduplicates by
/// (normalized name, raw value), keeping the first occurrence so the top
/// of the report wins over multi-page continuations and reprints. Input
/// order is preserved; the result is deterministic for a given input and
/// profile.
pub fn assemble(
    observations: Vec<BiomarkerObservation>,
    metadata: ReportMetadata,
    profile: &VendorProfile,
    mut diagnostics: ParseDiagnostics,
) -> ParsedReport {
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    let mut biomarkers = Vec::with_capacity(observations.len());

    for mut observation in observations {
        if profile.is_denylisted(&observation.name) {
            diagnostics.skipped_candidates += 1;
            continue;
        }
        observation.name = profile.canonical_name(&observation.name);

        let key = (
            normalize_name(&observation.name),
            observation.raw_value.clone(),
        );
        if !seen.insert(key) {
            diagnostics.deduplicated += 1;
            continue;
        }
        biomarkers.push(observation);
    }

    debug!(
        biomarkers = biomarkers.len(),
        deduplicated = diagnostics.deduplicated,
        skipped = diagnostics.skipped_candidates,
        "assembled report"
    );

    ParsedReport {
        metadata,
        biomarkers,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    fn observation(name: &str, raw_value: &str) -> BiomarkerObservation {
        BiomarkerObservation {
            name: name.to_string(),
            raw_value: raw_value.to_string(),
            numeric_value: raw_value.parse().ok(),
            unit: None,
            reference_range: None,
            status: Status::Unknown,
            section: None,
        }
    }

    fn metadata(lab: &str) -> ReportMetadata {
        ReportMetadata {
            patient_name: None,
            patient_dob: None,
            test_date: None,
            lab_name: lab.to_string(),
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let report = assemble(
            vec![
                observation("Glucose", "95"),
                observation("TSH", "2.1"),
                observation("Glucose", "95"),
            ],
            metadata("Unknown Lab"),
            VendorProfile::generic(),
            ParseDiagnostics::default(),
        );

        assert_eq!(report.biomarkers.len(), 2);
        assert_eq!(report.biomarkers[0].name, "Glucose");
        assert_eq!(report.biomarkers[1].name, "TSH");
        assert_eq!(report.diagnostics.deduplicated, 1);
    }

    #[test]
    fn same_name_different_value_is_not_a_duplicate() {
        // A re-run with a different result is a distinct observation.
        let report = assemble(
            vec![observation("Glucose", "95"), observation("Glucose", "102")],
            metadata("Unknown Lab"),
            VendorProfile::generic(),
            ParseDiagnostics::default(),
        );
        assert_eq!(report.biomarkers.len(), 2);
    }

    #[test]
    fn aliases_are_applied_before_dedup() {
        let quest = VendorProfile::builtin("quest").unwrap();
        let report = assemble(
            vec![
                observation("HGB A1C", "5.6"),
                observation("Hemoglobin A1c", "5.6"),
            ],
            metadata("Quest Diagnostics"),
            quest,
            ParseDiagnostics::default(),
        );

        assert_eq!(report.biomarkers.len(), 1);
        assert_eq!(report.biomarkers[0].name, "Hemoglobin A1c");
        assert_eq!(report.diagnostics.deduplicated, 1);
    }

    #[test]
    fn denylisted_names_are_dropped_and_counted() {
        let quest = VendorProfile::builtin("quest").unwrap();
        let report = assemble(
            vec![observation("Lipid Panel", "3"), observation("Glucose", "95")],
            metadata("Quest Diagnostics"),
            quest,
            ParseDiagnostics::default(),
        );

        assert_eq!(report.biomarkers.len(), 1);
        assert_eq!(report.biomarkers[0].name, "Glucose");
        assert_eq!(report.diagnostics.skipped_candidates, 1);
    }

    #[test]
    fn empty_input_yields_empty_report_not_error() {
        let report = assemble(
            Vec::new(),
            metadata("Unknown Lab"),
            VendorProfile::generic(),
            ParseDiagnostics::default(),
        );
        assert!(report.biomarkers.is_empty());
        assert_eq!(report.metadata.lab_name, "Unknown Lab");
    }
}
