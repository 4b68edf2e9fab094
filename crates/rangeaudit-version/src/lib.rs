//! PEP 440 version and specifier-set primitives.
//!
//! This crate has no knowledge of advisories, graphs, or metadata; it only
//! knows how to parse and compare versions and how to evaluate specifier
//! clauses against them. Everything downstream builds on top of it.

mod error;
mod specifier;
mod version;

pub use error::VersionError;
pub use specifier::{Clause, Operator, Specifier};
pub use version::{LocalSegment, PreReleaseKind, Version};
