use thiserror::Error;

/// Parse failures for version and specifier primitives.
///
/// These map directly onto the `InvalidVersion` / `InvalidSpecifier` kinds
/// in the core error taxonomy: for user-declared input they are fatal, for
/// upstream records (advisory ranges, registry releases) callers absorb
/// them into coverage counters instead of propagating.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version: {0}")]
    InvalidVersion(String),
    #[error("invalid specifier clause: {0}")]
    InvalidSpecifier(String),
}
