use serde::{Deserialize, Serialize};

/// One OSV-style range event. A range's `events` list is a single pass
/// over these: `Introduced` opens an interval, `Fixed`/`LastAffected`
/// closes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum VersionEvent {
    Introduced { introduced: String },
    Fixed { fixed: String },
    LastAffected { last_affected: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionRange {
    pub range_type: String,
    pub events: Vec<VersionEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectedPackage {
    pub ecosystem: String,
    pub package: String,
    pub ranges: Vec<VersionRange>,
}

/// A single advisory as surfaced by the advisory service, already reduced
/// to the fields range-mode auditing needs: no severity scoring, no KEV/EPSS
/// enrichment, no per-ecosystem metadata beyond the affected ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    pub id: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub affected: Vec<AffectedPackage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawn: Option<String>,
}

impl Advisory {
    /// Chooses the primary identifier from a full id list: a `PYSEC-`
    /// prefixed id wins if one is present, otherwise the first-listed id
    /// (preserving source order), with the rest demoted to aliases.
    pub fn select_primary(ids: &[String]) -> (String, Vec<String>) {
        assert!(!ids.is_empty(), "advisory must carry at least one identifier");
        let primary_idx = ids
            .iter()
            .position(|id| id.starts_with("PYSEC-"))
            .unwrap_or(0);
        let primary = ids[primary_idx].clone();
        let aliases = ids
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != primary_idx)
            .map(|(_, s)| s.clone())
            .collect();
        (primary, aliases)
    }

    pub fn is_withdrawn(&self) -> bool {
        self.withdrawn.is_some()
    }

    /// Falls back summary -> details -> "N/A", matching the description
    /// precedence range-mode reporting uses when an advisory provides only
    /// one of the two free-text fields.
    pub fn description_or_na<'a>(summary: Option<&'a str>, details: Option<&'a str>) -> String {
        summary
            .or(details)
            .unwrap_or("N/A")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_pysec_prefixed_identifier_as_primary() {
        let ids = vec!["GHSA-xxxx".to_string(), "PYSEC-2023-1".to_string(), "CVE-2023-1".to_string()];
        let (primary, aliases) = Advisory::select_primary(&ids);
        assert_eq!(primary, "PYSEC-2023-1");
        assert_eq!(aliases, vec!["GHSA-xxxx".to_string(), "CVE-2023-1".to_string()]);
    }

    #[test]
    fn falls_back_to_first_listed_identifier() {
        let ids = vec!["GHSA-xxxx".to_string(), "CVE-2023-1".to_string()];
        let (primary, aliases) = Advisory::select_primary(&ids);
        assert_eq!(primary, "GHSA-xxxx");
        assert_eq!(aliases, vec!["CVE-2023-1".to_string()]);
    }

    #[test]
    fn description_falls_back_through_summary_then_details_then_na() {
        assert_eq!(Advisory::description_or_na(Some("s"), Some("d")), "s");
        assert_eq!(Advisory::description_or_na(None, Some("d")), "d");
        assert_eq!(Advisory::description_or_na(None, None), "N/A");
    }
}
