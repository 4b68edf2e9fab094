//! Ties the constraint-graph builder, advisory lookups, and the overlap
//! engine together into one range-mode audit pass.

use crate::builder::build_constraint_graph;
use crate::findings::{
    ConstrainedDependency, ConstraintFinding, MetadataCoverage, OsvCoverage, UnsatisfiableEnvelope,
    VulnerabilityRangeResult,
};
use crate::overlap::ranges_overlap;
use rangeaudit_advisories::{compute_range_key, fix_versions_from_ranges, specifier_from_osv_range, AdvisoryService};
use rangeaudit_metadata::MetadataProvider;
use rangeaudit_version::{Specifier, Version};

const DEFAULT_MAX_DEPTH: usize = 10;

#[derive(Debug, Clone)]
pub struct AuditReport {
    pub findings: Vec<ConstraintFinding>,
    pub unsatisfiable: Vec<UnsatisfiableEnvelope>,
    pub metadata_coverage: MetadataCoverage,
    pub osv_coverage: OsvCoverage,
}

pub struct RangeAuditor<'a> {
    metadata_provider: &'a dyn MetadataProvider,
    advisory_service: &'a dyn AdvisoryService,
    max_depth: usize,
    include_prereleases: bool,
}

impl<'a> RangeAuditor<'a> {
    pub fn new(
        metadata_provider: &'a dyn MetadataProvider,
        advisory_service: &'a dyn AdvisoryService,
    ) -> RangeAuditor<'a> {
        RangeAuditor {
            metadata_provider,
            advisory_service,
            max_depth: DEFAULT_MAX_DEPTH,
            include_prereleases: false,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_prereleases(mut self, include_prereleases: bool) -> Self {
        self.include_prereleases = include_prereleases;
        self
    }

    /// Runs one full audit: builds the constraint graph from `roots`, then
    /// for every package it reaches, queries advisories and checks the
    /// overlap between its envelope and each advisory's affected range.
    /// Upstream failures (a registry timeout, a failed advisory query)
    /// never abort the run; they are absorbed into the coverage counters
    /// and the affected package is simply skipped for that one concern.
    pub fn audit(&self, roots: Vec<(String, Specifier)>) -> AuditReport {
        let build = build_constraint_graph(roots, self.metadata_provider, self.max_depth);
        let mut osv_coverage = OsvCoverage::default();
        let mut findings = Vec::new();

        for node in build.graph.nodes() {
            let advisories = match self.advisory_service.query(node.canonical_name()) {
                Ok(advisories) => {
                    osv_coverage.packages_queried += 1;
                    advisories
                }
                Err(_) => {
                    osv_coverage.packages_queried += 1;
                    osv_coverage.packages_query_failed += 1;
                    continue;
                }
            };
            if advisories.is_empty() {
                continue;
            }

            let metadata = match self.metadata_provider.get_metadata(node.canonical_name()) {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };
            let catalog: Vec<(Version, bool)> = metadata
                .versions
                .iter()
                .map(|v| (v.version.clone(), v.yanked))
                .collect();

            let constraint_sources: Vec<String> = node
                .constraints()
                .iter()
                .map(|(specifier, source)| format!("{specifier} from {source}"))
                .collect();

            let mut package_had_vuln = false;
            for advisory in &advisories {
                let pypi_ranges: Vec<_> = advisory
                    .affected
                    .iter()
                    .filter(|ap| ap.ecosystem.eq_ignore_ascii_case("pypi"))
                    .flat_map(|ap| ap.ranges.iter().cloned())
                    .collect();

                let union: Vec<Specifier> = pypi_ranges
                    .iter()
                    .filter_map(|range| specifier_from_osv_range(range).ok())
                    .flatten()
                    .collect();

                let admit_prereleases = self.include_prereleases || node.envelope().admits_prereleases();
                let witnesses = ranges_overlap(node.envelope(), &union, &catalog, admit_prereleases);
                if witnesses.is_empty() {
                    continue;
                }

                package_had_vuln = true;
                findings.push(ConstraintFinding {
                    dependency: ConstrainedDependency {
                        name: node.canonical_name().to_string(),
                        envelope: node.envelope().to_string(),
                        constraint_sources: constraint_sources.clone(),
                    },
                    vulnerability: VulnerabilityRangeResult {
                        id: advisory.id.clone(),
                        description: advisory.description.clone(),
                        aliases: advisory.aliases.clone(),
                        affected_ranges: union.iter().map(|s| s.to_string()).collect(),
                        fix_versions: fix_versions_from_ranges(&pypi_ranges)
                            .iter()
                            .map(|v| v.to_string())
                            .collect(),
                        range_key: compute_range_key(&[union]),
                    },
                    vulnerable_versions_permitted: witnesses.iter().map(|v| v.normalize()).collect(),
                });
            }
            if package_had_vuln {
                osv_coverage.packages_with_vulns += 1;
            }
        }

        AuditReport {
            findings,
            unsatisfiable: build.unsatisfiable,
            metadata_coverage: build.metadata_coverage,
            osv_coverage,
        }
    }
}
