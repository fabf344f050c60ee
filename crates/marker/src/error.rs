use thiserror::Error;

use crate::document::Path;

#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: Path, reason: String },
    #[error("offset {offset} out of bounds at {path:?} (len {len})")]
    OffsetOutOfBounds {
        path: Path,
        offset: usize,
        len: usize,
    },
    #[error("node at {0:?} is not an element")]
    NotAnElement(Path),
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("duplicate inline tool: {0}")]
    DuplicateTool(String),
    #[error("unknown inline tool: {0}")]
    UnknownTool(String),
}

impl MarkerError {
    pub(crate) fn invalid_path(path: &[usize], reason: impl Into<String>) -> Self {
        MarkerError::InvalidPath {
            path: path.to_vec(),
            reason: reason.into(),
        }
    }
}
