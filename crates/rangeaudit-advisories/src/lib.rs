//! Vulnerability-range normalization and advisory lookup for range-mode
//! dependency auditing.
//!
//! Splits into two concerns: turning an advisory feed's raw event lists
//! into interval unions comparable against allowed envelopes
//! ([`normalize`]), and fetching those advisories in the first place
//! ([`service`], [`osv_client`], [`memory`]).

mod error;
mod memory;
mod normalize;
mod osv_client;
mod service;
mod types;

pub use error::AdvisoryError;
pub use memory::InMemoryAdvisoryService;
pub use normalize::{
    compute_range_key, fix_versions_from_ranges, is_zero_version, specifier_from_osv_range, AffectedUnion, RangeKey,
};
pub use osv_client::OsvAdvisoryService;
pub use service::AdvisoryService;
pub use types::{Advisory, AffectedPackage, VersionEvent, VersionRange};
