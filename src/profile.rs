use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Key of the vendor-neutral default profile.
pub const GENERIC_PROFILE_KEY: &str = "generic";

/// Parsing configuration for one lab vendor: alias tables, unit vocabulary,
/// denylist. Pure data: a profile never executes code, which keeps the
/// engine auditable and testable independent of any vendor. Adding a vendor
/// means adding a profile entry, not a new code path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorProfile {
    pub key: String,
    /// Reported lab name. Configured rather than extracted: header branding
    /// is unreliable.
    pub lab_name: String,
    /// Units beyond the base vocabulary that this vendor prints.
    #[serde(default)]
    pub extra_units: BTreeSet<String>,
    /// Canonical biomarker names keyed by uppercased, whitespace-normalized
    /// printed variants.
    #[serde(default)]
    pub name_aliases: BTreeMap<String, String>,
    /// Known false-positive candidate names (panel titles, column headings),
    /// uppercased.
    #[serde(default)]
    pub denylist: BTreeSet<String>,
}

/// Built-in profile table. Read-only after first use; the engine holds no
/// other shared state across calls.
static BUILTIN_PROFILES: LazyLock<BTreeMap<&'static str, VendorProfile>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert(
        GENERIC_PROFILE_KEY,
        VendorProfile {
            key: GENERIC_PROFILE_KEY.to_string(),
            lab_name: "Unknown Lab".to_string(),
            extra_units: BTreeSet::new(),
            name_aliases: BTreeMap::new(),
            denylist: BTreeSet::new(),
        },
    );
    map.insert("quest", quest_profile());
    map
});

/// Quest Diagnostics: name variants and panel titles as printed on their
/// reports.
fn quest_profile() -> VendorProfile {
    let aliases = [
        ("HGB A1C", "Hemoglobin A1c"),
        ("HEMOGLOBIN A1C", "Hemoglobin A1c"),
        ("TESTOSTERONE, TOTAL", "Testosterone, Total"),
        ("TESTOSTERONE, FREE", "Testosterone, Free"),
        ("VITAMIN D,25-OH", "Vitamin D, 25-OH"),
        ("VITAMIN D, 25-OH", "Vitamin D, 25-OH"),
        ("SEX HORMONE BINDING GLOBULIN", "SHBG"),
        ("DHEA SULFATE", "DHEA-S"),
        ("PSA, TOTAL", "PSA, Total"),
        ("IRON, TOTAL", "Iron, Total"),
        ("CHOLESTEROL, TOTAL", "Cholesterol, Total"),
        ("HDL CHOLESTEROL", "HDL Cholesterol"),
        ("LDL-CHOLESTEROL", "LDL Cholesterol"),
        ("T4, FREE", "Free T4"),
        ("T3, FREE", "Free T3"),
    ];
    let denylist = [
        "LIPID PANEL",
        "COMPREHENSIVE METABOLIC PANEL",
        "BASIC METABOLIC PANEL",
        "CBC",
        "CBC W/ DIFFERENTIAL",
        "THYROID PANEL",
        "HORMONE PANEL",
        "TEST NAME",
        "IN RANGE",
        "OUT OF RANGE",
        "REFERENCE RANGE",
    ];
    let extra_units = ["x10E3/uL", "x10E6/uL", "cells/uL", "Thousand/uL", "Million/uL"];

    VendorProfile {
        key: "quest".to_string(),
        lab_name: "Quest Diagnostics".to_string(),
        extra_units: extra_units.iter().map(|u| (*u).to_string()).collect(),
        name_aliases: aliases
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
        denylist: denylist.iter().map(|d| (*d).to_string()).collect(),
    }
}

impl VendorProfile {
    /// Look up a built-in profile by key.
    pub fn builtin(key: &str) -> Result<&'static VendorProfile, ParseError> {
        BUILTIN_PROFILES
            .get(key)
            .ok_or_else(|| ParseError::UnknownProfile(key.to_string()))
    }

    /// The vendor-neutral default profile.
    pub fn generic() -> &'static VendorProfile {
        &BUILTIN_PROFILES[GENERIC_PROFILE_KEY]
    }

    /// Keys of all built-in profiles.
    pub fn builtin_keys() -> Vec<&'static str> {
        BUILTIN_PROFILES.keys().copied().collect()
    }

    /// Load a profile from a JSON document.
    pub fn from_json_str(json: &str) -> Result<VendorProfile, ParseError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a profile from a JSON file on disk.
    pub fn from_json_file(path: &Path) -> Result<VendorProfile, ParseError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Canonical name for a printed biomarker name, via the alias table.
    pub fn canonical_name(&self, name: &str) -> String {
        let normalized = normalize_name(name);
        self.name_aliases
            .get(&normalized)
            .cloned()
            .unwrap_or_else(|| name.trim().to_string())
    }

    /// Whether a candidate name is a known false positive.
    pub fn is_denylisted(&self, name: &str) -> bool {
        self.denylist.contains(&normalize_name(name))
    }

    /// Whether a token is in this vendor's additional unit vocabulary.
    pub fn is_extra_unit(&self, token: &str) -> bool {
        self.extra_units
            .iter()
            .any(|u| u.eq_ignore_ascii_case(token))
    }
}

/// Uppercase and collapse whitespace; the key form for alias and denylist
/// lookups and for dedup.
pub(crate) fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
