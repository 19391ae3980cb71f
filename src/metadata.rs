use chrono::NaiveDate;

use crate::profile::VendorProfile;
use crate::types::{RawLine, ReportMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataField {
    PatientName,
    PatientDob,
    TestDate,
}

/// Anchor phrases, longest first so "Patient Name" wins over "Name:" and
/// "Date of Birth" is tried before "DOB".
const ANCHORS: &[(&str, MetadataField)] = &[
    ("Collection Date", MetadataField::TestDate),
    ("Date Collected", MetadataField::TestDate),
    ("Date of Birth", MetadataField::PatientDob),
    ("Patient Name", MetadataField::PatientName),
    ("Collected:", MetadataField::TestDate),
    ("Test Date", MetadataField::TestDate),
    ("Name:", MetadataField::PatientName),
    ("DOB", MetadataField::PatientDob),
];

/// Date notations seen across lab vendors, tried in order.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%B %d, %Y", "%b %d, %Y"];

/// Scan all lines for metadata anchor phrases and collect patient/report
/// fields. Layout varies too much to trust a header region, so the whole
/// document is scanned; the first hit per field wins. Fields that cannot
/// be located or parsed stay `None`: never a guess, never the current
/// date.
pub fn extract_metadata(lines: &[RawLine], profile: &VendorProfile) -> ReportMetadata {
    let mut patient_name: Option<String> = None;
    let mut patient_dob: Option<NaiveDate> = None;
    let mut test_date: Option<NaiveDate> = None;

    for (idx, line) in lines.iter().enumerate() {
        for (anchor, field) in ANCHORS {
            let Some((_, end)) = find_anchor(&line.text, anchor) else {
                continue;
            };

            let after = line.text[end..]
                .trim_start_matches([' ', '\t', ':', '-'])
                .trim();
            // Label-only line: the value is on the next line.
            let value = if after.is_empty() {
                lines.get(idx + 1).map(|l| l.text.trim()).unwrap_or("")
            } else {
                after
            };
            let value = cut_at_next_anchor(value);
            if value.is_empty() {
                continue;
            }

            match field {
                MetadataField::PatientName => {
                    if patient_name.is_none() {
                        patient_name = Some(collapse_whitespace(value));
                    }
                }
                MetadataField::PatientDob => {
                    if patient_dob.is_none() {
                        patient_dob = parse_date(value);
                    }
                }
                MetadataField::TestDate => {
                    if test_date.is_none() {
                        test_date = parse_date(value);
                    }
                }
            }
        }
    }

    ReportMetadata {
        patient_name,
        patient_dob,
        test_date,
        lab_name: profile.lab_name.clone(),
    }
}

/// Whether a line contains any metadata anchor phrase. Used by the
/// classifier's tie-break: metadata beats the candidate grammar.
pub(crate) fn contains_metadata_anchor(text: &str) -> bool {
    ANCHORS
        .iter()
        .any(|(anchor, _)| find_anchor(text, anchor).is_some())
}

/// Case-insensitive anchor search with word boundaries, so "DOB" does not
/// fire inside "DOBUTAMINE". Returns the byte offsets of the anchor and of
/// the position just past it.
fn find_anchor(text: &str, anchor: &str) -> Option<(usize, usize)> {
    let haystack = text.to_ascii_lowercase();
    let needle = anchor.to_ascii_lowercase();
    let bytes = haystack.as_bytes();

    let mut from = 0;
    while let Some(rel) = haystack[from..].find(&needle) {
        let start = from + rel;
        let end = start + needle.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let after_ok = needle.ends_with(':')
            || end == bytes.len()
            || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return Some((start, end));
        }
        // Needle is pure ASCII, so `end` is a char boundary.
        from = end;
    }
    None
}

/// Truncate a value at the next anchor phrase, for lines that pack several
/// fields together ("Patient Name: Jane Doe DOB: 03/14/1985"). Uses the same
/// word-boundary scan as anchor detection, so "Jane Dobbs" is not cut at the
/// "Dob" inside the surname.
fn cut_at_next_anchor(value: &str) -> &str {
    let mut cut = value.len();
    for (anchor, _) in ANCHORS {
        if let Some((start, _)) = find_anchor(value, anchor) {
            cut = cut.min(start);
        }
    }
    value[..cut].trim().trim_end_matches([':', ',', '-']).trim()
}

/// Parse a date, trying each known notation against the whole value and
/// then against leading token windows, since anchor lines often carry
/// trailing fields ("03/14/1985 Sex: F").
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    for take in (1..=tokens.len().min(3)).rev() {
        let prefix = tokens[..take].join(" ");
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&prefix, fmt) {
                return Some(date);
            }
        }
    }
    None
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::VendorProfile;

    fn raw_lines(texts: &[&str]) -> Vec<RawLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| RawLine {
                text: (*t).to_string(),
                page_index: 0,
                line_index: i,
            })
            .collect()
    }

    fn generic() -> &'static VendorProfile {
        VendorProfile::generic()
    }

    #[test]
    fn extracts_all_three_fields() {
        let lines = raw_lines(&[
            "Patient Name: Jane Doe",
            "DOB: 03/14/1985",
            "Collection Date: 01/10/2024",
        ]);
        let meta = extract_metadata(&lines, generic());

        assert_eq!(meta.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(meta.patient_dob, NaiveDate::from_ymd_opt(1985, 3, 14));
        assert_eq!(meta.test_date, NaiveDate::from_ymd_opt(2024, 1, 10));
    }

    #[test]
    fn label_only_line_takes_value_from_next_line() {
        let lines = raw_lines(&["Date of Birth", "03/14/1985"]);
        let meta = extract_metadata(&lines, generic());
        assert_eq!(meta.patient_dob, NaiveDate::from_ymd_opt(1985, 3, 14));
    }

    #[test]
    fn packed_line_cuts_name_at_next_anchor() {
        let lines = raw_lines(&["Patient Name: Jane Doe DOB: 03/14/1985"]);
        let meta = extract_metadata(&lines, generic());
        assert_eq!(meta.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(meta.patient_dob, NaiveDate::from_ymd_opt(1985, 3, 14));
    }

    #[test]
    fn name_containing_anchor_substring_is_not_truncated() {
        // "Dobbs" must not be cut at the "Dob" inside the surname.
        let lines = raw_lines(&["Patient Name: Jane Dobbs"]);
        let meta = extract_metadata(&lines, generic());
        assert_eq!(meta.patient_name.as_deref(), Some("Jane Dobbs"));

        // The boundary-valid anchor after the surname still cuts.
        let packed = raw_lines(&["Patient Name: Jane Dobbs DOB: 03/14/1985"]);
        let meta = extract_metadata(&packed, generic());
        assert_eq!(meta.patient_name.as_deref(), Some("Jane Dobbs"));
        assert_eq!(meta.patient_dob, NaiveDate::from_ymd_opt(1985, 3, 14));
    }

    #[test]
    fn missing_dob_stays_none() {
        let lines = raw_lines(&["Patient Name: Jane Doe", "Glucose 95 mg/dL 70-99"]);
        let meta = extract_metadata(&lines, generic());
        assert_eq!(meta.patient_dob, None);
    }

    #[test]
    fn unparseable_date_stays_none() {
        let lines = raw_lines(&["DOB: unknown"]);
        let meta = extract_metadata(&lines, generic());
        assert_eq!(meta.patient_dob, None);
    }

    #[test]
    fn first_hit_wins_over_later_repeats() {
        let lines = raw_lines(&[
            "Collection Date: 01/10/2024",
            "Collection Date: 12/31/2099",
        ]);
        let meta = extract_metadata(&lines, generic());
        assert_eq!(meta.test_date, NaiveDate::from_ymd_opt(2024, 1, 10));
    }

    #[test]
    fn anchor_requires_word_boundary() {
        let lines = raw_lines(&["DOBUTAMINE STRESS ECHO"]);
        let meta = extract_metadata(&lines, generic());
        assert_eq!(meta.patient_dob, None);
        assert!(!contains_metadata_anchor("DOBUTAMINE STRESS ECHO"));
    }

    #[test]
    fn date_formats() {
        assert_eq!(
            parse_date("03/14/1985"),
            NaiveDate::from_ymd_opt(1985, 3, 14)
        );
        assert_eq!(
            parse_date("03-14-1985"),
            NaiveDate::from_ymd_opt(1985, 3, 14)
        );
        assert_eq!(
            parse_date("March 14, 1985"),
            NaiveDate::from_ymd_opt(1985, 3, 14)
        );
        assert_eq!(
            parse_date("Mar 14, 1985"),
            NaiveDate::from_ymd_opt(1985, 3, 14)
        );
        assert_eq!(parse_date("14.03.1985"), None);
    }

    #[test]
    fn date_with_trailing_fields() {
        assert_eq!(
            parse_date("03/14/1985 Sex: F"),
            NaiveDate::from_ymd_opt(1985, 3, 14)
        );
    }

    #[test]
    fn lab_name_comes_from_profile_not_text() {
        let lines = raw_lines(&["Some Other Lab Inc."]);
        let meta = extract_metadata(&lines, VendorProfile::builtin("quest").unwrap());
        assert_eq!(meta.lab_name, "Quest Diagnostics");
    }
}
