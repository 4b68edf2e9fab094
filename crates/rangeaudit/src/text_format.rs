//! Plain-text fallback renderer, grounded on
//! `original_source/pip_audit/_range_audit.py::_format_findings_text`: used
//! whenever no structured output format was requested.

use rangeaudit_core::{AuditReportOutput, FindingOutput};

const MAX_LISTED_VERSIONS: usize = 5;

pub fn format_report(report: &AuditReportOutput) -> String {
    let mut lines = Vec::new();

    lines.push("Range Mode Analysis Results".to_string());
    lines.push("=".repeat(40));
    lines.push(String::new());

    if report.constraint_findings.is_empty() {
        lines.push("No constraint findings.".to_string());
        lines.push(String::new());
    } else {
        lines.push(format!("Found {} constraint finding(s):", report.constraint_findings.len()));
        lines.push(String::new());
        for finding in &report.constraint_findings {
            lines.extend(format_finding(finding));
        }
    }

    if !report.unsatisfiable_envelopes.is_empty() {
        lines.push(format!(
            "Found {} unsatisfiable envelope(s):",
            report.unsatisfiable_envelopes.len()
        ));
        lines.push(String::new());
        for unsat in &report.unsatisfiable_envelopes {
            lines.push(format!("  Package: {}", unsat.name));
            lines.push("  Conflicting constraints:".to_string());
            for (specifier, source) in &unsat.constraints {
                lines.push(format!("    - {specifier} from {source}"));
            }
            lines.push(String::new());
        }
    }

    let coverage = &report.transitive_metadata_completeness;
    lines.push("Transitive Metadata Completeness:".to_string());
    lines.push(format!("  Packages analyzed: {}", coverage.packages_total));
    lines.push(format!("  Packages with metadata: {}", coverage.packages_with_requires_dist));
    lines.push(format!("  Versions examined: {}", coverage.versions_examined));
    lines.push(format!("  Versions with requires_dist: {}", coverage.versions_with_requires_dist));
    lines.push(format!("  Versions no metadata available: {}", coverage.versions_no_metadata_available));
    lines.push(format!("  Versions fetch failed: {}", coverage.versions_fetch_failed));
    lines.push(format!("  Versions parse failed: {}", coverage.versions_parse_failed));

    lines.join("\n")
}

fn format_finding(finding: &FindingOutput) -> Vec<String> {
    let mut lines = Vec::new();
    let vuln = &finding.vulnerability;
    let envelope = if finding.envelope.is_empty() { "*" } else { &finding.envelope };

    lines.push(format!("  Package: {}", finding.name));
    lines.push(format!("  Constraint: {envelope}"));
    lines.push(format!("  Vulnerability: {}", vuln.ids.first().map(String::as_str).unwrap_or("unknown")));
    if let Some(description) = &vuln.description {
        let truncated: String = description.chars().take(80).collect();
        lines.push(format!("  Description: {truncated}..."));
    }
    lines.push(format!("  Affected range: {}", vuln.affected_range));

    if !finding.vulnerable_versions_permitted.is_empty() {
        let shown = finding
            .vulnerable_versions_permitted
            .iter()
            .take(MAX_LISTED_VERSIONS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let remaining = finding.vulnerable_versions_permitted.len().saturating_sub(MAX_LISTED_VERSIONS);
        let suffix = if remaining > 0 { format!(" (+{remaining} more)") } else { String::new() };
        lines.push(format!("  Vulnerable versions permitted: {shown}{suffix}"));
    }
    lines.push(String::new());
    lines
}
