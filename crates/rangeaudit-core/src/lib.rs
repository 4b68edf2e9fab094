//! Range-mode dependency vulnerability constraint auditing: wires the
//! constraint-graph builder, advisory lookups, and the overlap engine into
//! one audit pass, then groups and serializes the result.

mod auditor;
mod builder;
mod error;
mod findings;
mod output;
mod overlap;

pub use auditor::{AuditReport, RangeAuditor};
pub use builder::{build_constraint_graph, BuildResult};
pub use error::RangeAuditError;
pub use findings::{
    ConstrainedDependency, ConstraintFinding, MetadataCoverage, OsvCoverage, UnsatisfiableEnvelope,
    VulnerabilityRangeResult,
};
pub use output::{
    assemble_findings, assemble_report, AuditReportOutput, FindingOutput, MetadataCoverageOutput, OutputOptions,
    UnsatisfiableEnvelopeOutput, VulnerabilityOutput,
};
pub use overlap::ranges_overlap;
pub use rangeaudit_advisories::RangeKey;
