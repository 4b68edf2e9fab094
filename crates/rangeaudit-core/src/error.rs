use thiserror::Error;

/// The only error variant that escapes the audit entry point as `Err`:
/// malformed caller-supplied input (an unparseable requirement string, an
/// empty root dependency list). Every other degradation — a registry
/// timeout, a malformed advisory range, a package with no catalog — is
/// absorbed into `MetadataCoverage`/`OsvCoverage` counters instead of
/// failing the whole audit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RangeAuditError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid version: {0}")]
    InvalidVersion(String),
    #[error("invalid specifier: {0}")]
    InvalidSpecifier(String),
}
