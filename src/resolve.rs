use std::sync::LazyLock;

use regex::Regex;

use crate::classify::Candidate;
use crate::profile::VendorProfile;
use crate::range::{normalize_token, parse_number, parse_range};
use crate::types::{BiomarkerObservation, ParsedRange, Status};

/// Units printed across common panels (chemistry, lipids, thyroid,
/// hormones, CBC, iron). Matched case-insensitively; profiles extend this
/// list per vendor.
const BASE_UNITS: &[&str] = &[
    "%", "g/dL", "g/L", "mg/dL", "mcg/dL", "µg/dL", "ug/dL", "ng/dL", "ng/mL", "pg/mL", "pg",
    "mIU/L", "uIU/mL", "µIU/mL", "IU/L", "U/L", "mmol/L", "nmol/L", "pmol/L", "mEq/L", "mL/min",
    "mL/min/1.73m²", "K/µL", "K/uL", "M/µL", "M/uL", "fL", "ratio",
];

/// Abnormality flag column tokens (Quest prints H/L beside the value).
/// Skipped when splitting trailing text; the flag is re-derived from the
/// parsed range instead of trusted from the page.
const FLAG_TOKENS: &[&str] = &["H", "L", "HH", "LL"];

/// `mg/dL`-shaped compound unit: short alphanumeric numerator over a short
/// denominator.
static UNIT_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zµx][A-Za-z0-9µ^.]{0,9}/[A-Za-z0-9µ^.]{1,12}$").unwrap());

/// Resolve a candidate line into a biomarker observation.
///
/// Returns `None` when the candidate has no usable name or value; such
/// lines are dropped from the output, never emitted as partial records.
pub fn resolve(
    candidate: &Candidate,
    section: Option<&str>,
    profile: &VendorProfile,
) -> Option<BiomarkerObservation> {
    let name = candidate.name.trim().trim_end_matches(':').trim();
    let raw_value = candidate.value_token.trim();
    if name.is_empty() || raw_value.is_empty() {
        return None;
    }

    let numeric_value = parse_number(raw_value);
    let (unit, range_text) = split_trailing(&candidate.trailing, profile);
    let reference_range = range_text.as_deref().map(parse_range);
    let status = derive_status(numeric_value, raw_value, reference_range.as_ref());

    Some(BiomarkerObservation {
        name: name.to_string(),
        raw_value: raw_value.to_string(),
        numeric_value,
        unit,
        reference_range,
        status,
        section: section.map(str::to_string),
    })
}

/// Whether the candidate's trailing text already carries range tokens.
/// Used by the wrapped-line heuristic before adopting the next line.
pub(crate) fn has_range_text(candidate: &Candidate, profile: &VendorProfile) -> bool {
    split_trailing(&candidate.trailing, profile).1.is_some()
}

/// Split trailing text into a unit and range text. Tolerates both
/// `value unit range` and `value range unit` column orders and skips
/// interleaved H/L flag tokens.
pub(crate) fn split_trailing(
    trailing: &str,
    profile: &VendorProfile,
) -> (Option<String>, Option<String>) {
    let mut unit: Option<String> = None;
    let mut range_parts: Vec<&str> = Vec::new();

    for token in trailing.split_whitespace() {
        if FLAG_TOKENS.contains(&token) {
            continue;
        }
        match &unit {
            None if is_unit_token(token, profile) => {
                unit = Some(token.to_string());
                continue;
            }
            // Some layouts print the unit beside both the value and the
            // range; a repeat must not pollute the range text.
            Some(u) if u.eq_ignore_ascii_case(token) => continue,
            _ => {}
        }
        range_parts.push(token);
    }

    let range_text = if range_parts.is_empty() {
        None
    } else {
        Some(range_parts.join(" "))
    };
    (unit, range_text)
}

fn is_unit_token(token: &str, profile: &VendorProfile) -> bool {
    if BASE_UNITS.iter().any(|u| u.eq_ignore_ascii_case(token)) {
        return true;
    }
    if profile.is_extra_unit(token) {
        return true;
    }
    UNIT_SHAPE_RE.is_match(token)
}

/// Derive the abnormality flag from the value and its parsed range.
/// Bounds are inclusive: a value exactly on a bound is Normal, matching
/// standard lab-report convention.
fn derive_status(numeric: Option<f64>, raw_value: &str, range: Option<&ParsedRange>) -> Status {
    let Some(range) = range else {
        return Status::Unknown;
    };

    match range {
        ParsedRange::Bounded { low, high } => match numeric {
            Some(v) if v < *low => Status::Low,
            Some(v) if v > *high => Status::High,
            Some(_) => Status::Normal,
            None => Status::Unknown,
        },
        ParsedRange::LowerBound { min } => match numeric {
            Some(v) if v < *min => Status::Low,
            Some(_) => Status::Normal,
            None => Status::Unknown,
        },
        ParsedRange::UpperBound { max } => match numeric {
            Some(v) if v > *max => Status::High,
            Some(_) => Status::Normal,
            None => Status::Unknown,
        },
        ParsedRange::Enumerated { allowed } => {
            let value = normalize_token(raw_value);
            if allowed.iter().any(|a| normalize_token(a) == value) {
                Status::Normal
            } else {
                Status::Abnormal
            }
        }
        ParsedRange::Unparsed { .. } => Status::Unknown,
    }
}
