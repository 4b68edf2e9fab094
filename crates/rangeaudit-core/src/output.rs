//! Groups the auditor's per-advisory [`ConstraintFinding`]s that share
//! `(package, range_key)` into one output-facing finding, unioning their
//! `{id, aliases}`, and assembles the canonical report shape. The auditor
//! itself never groups — that stays here so the internal model keeps one
//! finding per advisory, which is what the deduplication key is computed
//! against.

use crate::findings::{ConstraintFinding, MetadataCoverage, UnsatisfiableEnvelope};
use serde::Serialize;
use std::collections::BTreeSet;

/// Whether a finding's vulnerability carries its description/aliases into
/// the serialized output. Both toggles are display-only: the underlying
/// finding data is unaffected, only what gets serialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub include_description: bool,
    pub include_aliases: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VulnerabilityOutput {
    pub ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub aliases: Vec<String>,
    pub affected_range: String,
    pub fix_versions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindingOutput {
    pub name: String,
    pub envelope: String,
    pub constraint_sources: Vec<String>,
    pub vulnerability: VulnerabilityOutput,
    pub vulnerable_versions_permitted: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnsatisfiableEnvelopeOutput {
    pub name: String,
    pub constraints: Vec<(String, String)>,
}

impl From<&UnsatisfiableEnvelope> for UnsatisfiableEnvelopeOutput {
    fn from(unsat: &UnsatisfiableEnvelope) -> UnsatisfiableEnvelopeOutput {
        UnsatisfiableEnvelopeOutput {
            name: unsat.name.clone(),
            constraints: unsat.constraints.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataCoverageOutput {
    pub packages_total: usize,
    pub packages_with_requires_dist: usize,
    pub versions_examined: usize,
    pub versions_with_requires_dist: usize,
    pub versions_no_metadata_available: usize,
    pub versions_fetch_failed: usize,
    pub versions_parse_failed: usize,
}

impl From<&MetadataCoverage> for MetadataCoverageOutput {
    fn from(coverage: &MetadataCoverage) -> MetadataCoverageOutput {
        MetadataCoverageOutput {
            packages_total: coverage.packages_total,
            packages_with_requires_dist: coverage.packages_with_requires_dist,
            versions_examined: coverage.versions_examined,
            versions_with_requires_dist: coverage.versions_with_requires_dist,
            versions_no_metadata_available: coverage.versions_no_metadata_available,
            versions_fetch_failed: coverage.versions_fetch_failed,
            versions_parse_failed: coverage.versions_parse_failed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReportOutput {
    pub constraint_findings: Vec<FindingOutput>,
    pub unsatisfiable_envelopes: Vec<UnsatisfiableEnvelopeOutput>,
    pub transitive_metadata_completeness: MetadataCoverageOutput,
}

struct Group<'a> {
    finding: &'a ConstraintFinding,
    ids: Vec<String>,
    aliases: BTreeSet<String>,
}

/// Groups `findings` by `(package, range_key)`, in first-seen order, then
/// stable-sorts the groups ascending by package name, so ties within a
/// name stay in discovery order rather than being re-scrambled by the
/// sort.
pub fn assemble_findings(findings: &[ConstraintFinding], options: OutputOptions) -> Vec<FindingOutput> {
    let mut order: Vec<(String, crate::RangeKey)> = Vec::new();
    let mut groups: std::collections::HashMap<(String, crate::RangeKey), Group> = std::collections::HashMap::new();

    for finding in findings {
        let key = (finding.dependency.name.clone(), finding.vulnerability.range_key.clone());
        groups
            .entry(key.clone())
            .and_modify(|g| {
                g.ids.push(finding.vulnerability.id.clone());
                g.aliases.extend(finding.vulnerability.aliases.iter().cloned());
            })
            .or_insert_with(|| {
                order.push(key);
                Group {
                    finding,
                    ids: vec![finding.vulnerability.id.clone()],
                    aliases: finding.vulnerability.aliases.iter().cloned().collect(),
                }
            });
    }

    let mut outputs: Vec<FindingOutput> = order
        .into_iter()
        .map(|key| {
            let group = groups.remove(&key).expect("key was just inserted");
            let finding = group.finding;
            let mut ids = group.ids;
            ids.dedup();
            let aliases: Vec<String> = group.aliases.into_iter().filter(|a| !ids.contains(a)).collect();

            FindingOutput {
                name: finding.dependency.name.clone(),
                envelope: finding.dependency.envelope.clone(),
                constraint_sources: finding.dependency.constraint_sources.clone(),
                vulnerability: VulnerabilityOutput {
                    ids,
                    description: options.include_description.then(|| finding.vulnerability.description.clone().unwrap_or_else(|| "N/A".to_string())),
                    aliases: if options.include_aliases { aliases } else { Vec::new() },
                    affected_range: finding.vulnerability.affected_range_display(),
                    fix_versions: finding.vulnerability.fix_versions.clone(),
                },
                vulnerable_versions_permitted: finding.vulnerable_versions_permitted.clone(),
            }
        })
        .collect();

    outputs.sort_by(|a, b| a.name.cmp(&b.name));
    outputs
}

pub fn assemble_report(
    findings: &[ConstraintFinding],
    unsatisfiable: &[UnsatisfiableEnvelope],
    coverage: &MetadataCoverage,
    options: OutputOptions,
) -> AuditReportOutput {
    let mut unsatisfiable_envelopes: Vec<UnsatisfiableEnvelopeOutput> =
        unsatisfiable.iter().map(UnsatisfiableEnvelopeOutput::from).collect();
    unsatisfiable_envelopes.sort_by(|a, b| a.name.cmp(&b.name));

    AuditReportOutput {
        constraint_findings: assemble_findings(findings, options),
        unsatisfiable_envelopes,
        transitive_metadata_completeness: MetadataCoverageOutput::from(coverage),
    }
}
