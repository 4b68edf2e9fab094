use rangeaudit_advisories::RangeKey;
use rangeaudit_metadata::MetadataStats;

/// A package node's position at the moment a finding or unsatisfiable
/// envelope was recorded: its name, the allowed envelope's displayed form,
/// and the provenance chain of constraints that produced it, rendered as
/// `"{specifier} from {source}"` strings.
#[derive(Debug, Clone)]
pub struct ConstrainedDependency {
    pub name: String,
    pub envelope: String,
    pub constraint_sources: Vec<String>,
}

/// One vulnerability's overlap result against a package's allowed envelope.
#[derive(Debug, Clone)]
pub struct VulnerabilityRangeResult {
    pub id: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    /// The union's members, each a single allowed-envelope-shaped clause
    /// list. Empty means "matches everything" (the advisory's ranges carried
    /// no events at all).
    pub affected_ranges: Vec<String>,
    pub fix_versions: Vec<String>,
    pub range_key: RangeKey,
}

impl VulnerabilityRangeResult {
    /// Renders the affected-range union for display: `"*"` when empty, the
    /// bare specifier when there's exactly one member, otherwise each member
    /// parenthesized and joined with `" OR "`.
    pub fn affected_range_display(&self) -> String {
        if self.affected_ranges.is_empty() {
            return "*".to_string();
        }
        if self.affected_ranges.len() == 1 {
            let only = &self.affected_ranges[0];
            return if only.is_empty() { "*".to_string() } else { only.clone() };
        }
        self.affected_ranges
            .iter()
            .map(|s| if s.is_empty() { "(*)".to_string() } else { format!("({s})") })
            .collect::<Vec<_>>()
            .join(" OR ")
    }
}

/// An overlap between a dependency's allowed envelope and one vulnerability's
/// affected range. The auditor emits these individually, one per advisory;
/// findings sharing `(package, range_key)` are coalesced downstream by the
/// output layer, not here.
#[derive(Debug, Clone)]
pub struct ConstraintFinding {
    pub dependency: ConstrainedDependency,
    pub vulnerability: VulnerabilityRangeResult,
    pub vulnerable_versions_permitted: Vec<String>,
}

/// A package whose accumulated constraints admit no known, non-yanked
/// release at all — independent of whether any vulnerability applies.
#[derive(Debug, Clone)]
pub struct UnsatisfiableEnvelope {
    pub name: String,
    pub constraints: Vec<(String, String)>,
}

/// Registry-traversal completeness: [`MetadataStats`]'s five-way version
/// partition plus the package-level totals that only the builder, not the
/// provider, can observe.
#[derive(Debug, Clone, Default)]
pub struct MetadataCoverage {
    pub packages_total: usize,
    pub packages_with_requires_dist: usize,
    pub versions_examined: usize,
    pub versions_with_requires_dist: usize,
    pub versions_no_metadata_available: usize,
    pub versions_fetch_failed: usize,
    pub versions_parse_failed: usize,
}

impl MetadataCoverage {
    pub fn new(stats: MetadataStats, packages_total: usize, packages_with_requires_dist: usize) -> MetadataCoverage {
        MetadataCoverage {
            packages_total,
            packages_with_requires_dist,
            versions_examined: stats.versions_examined,
            versions_with_requires_dist: stats.versions_with_requires_dist,
            versions_no_metadata_available: stats.versions_no_metadata_available,
            versions_fetch_failed: stats.versions_fetch_failed,
            versions_parse_failed: stats.versions_parse_failed,
        }
    }
}

/// Advisory-query completeness, the same kind of honesty signal
/// [`MetadataCoverage`] gives for the registry side.
#[derive(Debug, Clone, Default)]
pub struct OsvCoverage {
    pub packages_queried: usize,
    pub packages_with_vulns: usize,
    pub packages_query_failed: usize,
}
