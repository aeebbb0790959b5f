use std::path::PathBuf;

/// Errors that can occur during asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("no audio clip named '{0}'")]
    NotFound(String),

    #[error("failed to decode audio clip '{0}': {1}")]
    Decode(PathBuf, String),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid clip manifest '{0}': {1}")]
    Manifest(PathBuf, String),
}
