use crate::error::AdvisoryError;
use crate::types::Advisory;

/// An advisory backend: everything vulnerable in a given PyPI package,
/// regardless of version. Range-mode auditing needs the full affected-range
/// shape, not a point-version verdict, so this is a package-keyed query
/// rather than a package+version one.
pub trait AdvisoryService {
    fn query(&self, package: &str) -> Result<Vec<Advisory>, AdvisoryError>;
}
