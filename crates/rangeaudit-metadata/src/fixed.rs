use crate::error::MetadataError;
use crate::provider::MetadataProvider;
use crate::types::PackageMetadata;
use std::collections::HashMap;

/// A fixed registry catalog, used in tests in place of a live PyPI
/// connection.
#[derive(Debug, Default)]
pub struct FixedMetadataProvider {
    packages: HashMap<String, PackageMetadata>,
}

impl FixedMetadataProvider {
    pub fn new() -> FixedMetadataProvider {
        FixedMetadataProvider::default()
    }

    pub fn with_package(mut self, metadata: PackageMetadata) -> Self {
        self.packages.insert(metadata.name.clone(), metadata);
        self
    }
}

impl MetadataProvider for FixedMetadataProvider {
    fn get_metadata(&self, package: &str) -> Result<PackageMetadata, MetadataError> {
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| MetadataError::Malformed(format!("no fixture registered for {package}")))
    }
}
