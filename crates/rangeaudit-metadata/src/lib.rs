//! Registry metadata providers for range-mode dependency analysis: a
//! PyPI-JSON-backed implementation and a fixed-catalog test double, both
//! behind one [`MetadataProvider`] trait.

mod error;
mod fixed;
mod provider;
mod pypi;
mod requirement;
mod types;

pub use error::MetadataError;
pub use fixed::FixedMetadataProvider;
pub use provider::MetadataProvider;
pub use pypi::PyPiMetadataProvider;
pub use requirement::parse_requires_dist;
pub use types::{MetadataStats, PackageMetadata, VersionMetadata};
