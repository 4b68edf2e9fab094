use crate::error::AdvisoryError;
use crate::service::AdvisoryService;
use crate::types::Advisory;
use std::collections::HashMap;

/// A fixed advisory set keyed by canonical package name, used in tests in
/// place of a live OSV connection.
#[derive(Debug, Default)]
pub struct InMemoryAdvisoryService {
    advisories: HashMap<String, Vec<Advisory>>,
}

impl InMemoryAdvisoryService {
    pub fn new() -> InMemoryAdvisoryService {
        InMemoryAdvisoryService::default()
    }

    pub fn with_package(mut self, package: impl Into<String>, advisories: Vec<Advisory>) -> Self {
        self.advisories.insert(package.into(), advisories);
        self
    }
}

impl AdvisoryService for InMemoryAdvisoryService {
    fn query(&self, package: &str) -> Result<Vec<Advisory>, AdvisoryError> {
        Ok(self.advisories.get(package).cloned().unwrap_or_default())
    }
}
