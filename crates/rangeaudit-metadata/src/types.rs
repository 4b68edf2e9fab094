use rangeaudit_version::Version;
use serde::{Deserialize, Serialize};

/// One release's registry metadata: whether it's yanked, and its
/// `Requires-Dist` list when the registry exposed one.
#[derive(Debug, Clone)]
pub struct VersionMetadata {
    pub version: Version,
    pub yanked: bool,
    pub requires_dist: Option<Vec<String>>,
}

/// Every release a registry reports for one package.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub name: String,
    pub versions: Vec<VersionMetadata>,
    /// Release entries the registry listed whose version string didn't
    /// parse as PEP 440 and were dropped from `versions`. Counted
    /// separately from `versions_no_metadata_available` (a valid version
    /// with no dependency metadata) since this is a data-quality gap in
    /// the registry's own listing, not in the package's metadata.
    pub version_parse_failures: usize,
}

impl PackageMetadata {
    /// Non-yanked release versions, the catalog `is_envelope_empty` checks
    /// an envelope against.
    pub fn known_versions(&self) -> Vec<Version> {
        self.versions
            .iter()
            .filter(|v| !v.yanked)
            .map(|v| v.version.clone())
            .collect()
    }

    pub fn versions_with_metadata(&self) -> Vec<&VersionMetadata> {
        self.versions
            .iter()
            .filter(|v| v.requires_dist.is_some())
            .collect()
    }
}

/// Running counters describing how completely the registry traversal was
/// able to resolve transitive dependency metadata. The four failure/success
/// buckets partition `versions_examined` exactly: every version attempted
/// lands in precisely one of
/// `versions_with_requires_dist`, `versions_no_metadata_available`,
/// `versions_fetch_failed`, or `versions_parse_failed`. Surfaced to the
/// user alongside findings so an "everything looks fine" result backed by
/// sparse metadata doesn't read as more confident than it is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataStats {
    pub versions_examined: usize,
    pub versions_with_requires_dist: usize,
    pub versions_no_metadata_available: usize,
    pub versions_fetch_failed: usize,
    pub versions_parse_failed: usize,
}
