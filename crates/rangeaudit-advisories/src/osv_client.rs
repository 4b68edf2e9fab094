//! OSV-backed advisory lookup with an on-disk response cache.
//!
//! Grounded on the synchronous `ureq`-based fetch style used elsewhere in
//! this workspace for talking to advisory feeds, rather than an async
//! client: range-mode auditing drives one blocking query per package and
//! never needs concurrent requests in flight.

use crate::error::AdvisoryError;
use crate::service::AdvisoryService;
use crate::types::{Advisory, AffectedPackage, VersionEvent};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const OSV_QUERY_URL: &str = "https://api.osv.dev/v1/query";

#[derive(Serialize)]
struct OsvQueryRequest<'a> {
    package: OsvPackageRef<'a>,
}

#[derive(Serialize)]
struct OsvPackageRef<'a> {
    name: &'a str,
    ecosystem: &'a str,
}

#[derive(Debug, Deserialize)]
struct OsvQueryResponse {
    #[serde(default)]
    vulns: Vec<OsvVuln>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OsvVuln {
    id: String,
    #[serde(default)]
    aliases: Vec<String>,
    summary: Option<String>,
    details: Option<String>,
    #[serde(default)]
    affected: Vec<OsvAffected>,
    #[serde(default)]
    withdrawn: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OsvAffected {
    package: OsvPackageInfo,
    #[serde(default)]
    ranges: Vec<OsvRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OsvPackageInfo {
    name: String,
    ecosystem: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OsvRange {
    #[serde(rename = "type")]
    range_type: String,
    events: Vec<VersionEvent>,
}

fn convert(vuln: OsvVuln) -> Advisory {
    let (primary, mut aliases) = Advisory::select_primary(
        &std::iter::once(vuln.id.clone())
            .chain(vuln.aliases.iter().cloned())
            .collect::<Vec<_>>(),
    );
    aliases.sort();
    aliases.dedup();

    let affected = vuln
        .affected
        .into_iter()
        .map(|aff| AffectedPackage {
            ecosystem: aff.package.ecosystem,
            package: aff.package.name,
            ranges: aff
                .ranges
                .into_iter()
                .map(|r| crate::types::VersionRange {
                    range_type: r.range_type,
                    events: r.events,
                })
                .collect(),
        })
        .collect();

    Advisory {
        id: primary,
        aliases,
        description: Some(Advisory::description_or_na(
            vuln.summary.as_deref(),
            vuln.details.as_deref(),
        )),
        affected,
        withdrawn: vuln.withdrawn,
    }
}

/// Queries OSV for every advisory affecting a package within a single
/// ecosystem, with responses cached to disk under `cache_dir` (when set)
/// using a write-to-temp-then-rename pattern so a crash mid-write never
/// leaves a corrupt cache entry behind.
pub struct OsvAdvisoryService {
    agent: ureq::Agent,
    ecosystem: String,
    cache_dir: Option<PathBuf>,
}

impl OsvAdvisoryService {
    pub fn new(ecosystem: impl Into<String>, timeout: Duration, cache_dir: Option<PathBuf>) -> OsvAdvisoryService {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        OsvAdvisoryService {
            agent,
            ecosystem: ecosystem.into(),
            cache_dir,
        }
    }

    fn cache_path(&self, package: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}-{}.json", self.ecosystem, package)))
    }

    fn read_cache(&self, package: &str) -> Option<Vec<Advisory>> {
        let path = self.cache_path(package)?;
        let bytes = fs::read(path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn write_cache(&self, package: &str, advisories: &[Advisory]) {
        let Some(path) = self.cache_path(package) else {
            return;
        };
        let Some(parent) = path.parent() else {
            return;
        };
        if fs::create_dir_all(parent).is_err() {
            return;
        }
        let Ok(bytes) = serde_json::to_vec(advisories) else {
            return;
        };
        let tmp_path = path.with_extension(format!("tmp.{}", std::process::id()));
        if fs::write(&tmp_path, &bytes).is_err() {
            return;
        }
        let _ = fs::rename(&tmp_path, &path);
    }
}

impl AdvisoryService for OsvAdvisoryService {
    fn query(&self, package: &str) -> Result<Vec<Advisory>, AdvisoryError> {
        if let Some(cached) = self.read_cache(package) {
            return Ok(cached);
        }

        let request = OsvQueryRequest {
            package: OsvPackageRef {
                name: package,
                ecosystem: &self.ecosystem,
            },
        };

        let response: OsvQueryResponse = self
            .agent
            .post(OSV_QUERY_URL)
            .send_json(&request)
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?
            .body_mut()
            .read_json()
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;

        let advisories: Vec<Advisory> = response
            .vulns
            .into_iter()
            .map(convert)
            .filter(|a| !a.is_withdrawn())
            .collect();

        self.write_cache(package, &advisories);
        Ok(advisories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_osv_vuln_preferring_pysec_alias_as_primary() {
        let vuln = OsvVuln {
            id: "GHSA-xxxx".to_string(),
            aliases: vec!["PYSEC-2023-42".to_string()],
            summary: Some("summary".to_string()),
            details: None,
            affected: vec![],
            withdrawn: None,
        };
        let advisory = convert(vuln);
        assert_eq!(advisory.id, "PYSEC-2023-42");
        assert_eq!(advisory.aliases, vec!["GHSA-xxxx".to_string()]);
        assert_eq!(advisory.description.as_deref(), Some("summary"));
    }

    #[test]
    fn withdrawn_advisories_are_marked() {
        let vuln = OsvVuln {
            id: "PYSEC-2023-1".to_string(),
            aliases: vec![],
            summary: None,
            details: None,
            affected: vec![],
            withdrawn: Some("2024-01-01T00:00:00Z".to_string()),
        };
        let advisory = convert(vuln);
        assert!(advisory.is_withdrawn());
    }

    #[test]
    fn cache_round_trips_through_a_temp_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let service = OsvAdvisoryService::new("PyPI", Duration::from_secs(5), Some(tmp.path().to_path_buf()));
        let advisories = vec![Advisory {
            id: "PYSEC-2023-1".to_string(),
            aliases: vec![],
            description: Some("N/A".to_string()),
            affected: vec![],
            withdrawn: None,
        }];
        service.write_cache("requests", &advisories);
        let cached = service.read_cache("requests").unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].id, "PYSEC-2023-1");
    }
}
