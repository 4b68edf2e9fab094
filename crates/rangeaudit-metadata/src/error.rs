use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("registry request failed: {0}")]
    Transport(String),
    #[error("unparseable registry response: {0}")]
    Malformed(String),
}
