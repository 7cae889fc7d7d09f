use std::path::PathBuf;

use thiserror::Error;

use crate::classify::UnresolvedSlot;

pub type Result<T> = std::result::Result<T, MapError>;

/// Every failure the generator can report.
///
/// Unmatched colours and duplicate mapping keys are *not* errors; they are
/// reported through [`CoverageReport`](crate::placement::CoverageReport) and
/// `tracing` warnings respectively.
#[derive(Debug, Error)]
pub enum MapError {
    /// Empty grid, mismatched pixel buffer, bad config value, empty level name.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One or more authoring-table rows have no object for their category.
    #[error("{} authoring row(s) have no object registered", .0.len())]
    Unresolved(Vec<UnresolvedSlot>),

    #[error("variable is read-only")]
    ReadOnly,

    #[error("a level already exists at {}", .0.display())]
    LevelExists(PathBuf),

    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MapError::InvalidInput(msg.into())
    }
}
