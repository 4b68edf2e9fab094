use rangeaudit_version::VersionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("malformed affected-range event: {0}")]
    MalformedRange(String),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error("advisory service request failed: {0}")]
    Transport(String),
}
