use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the map pipeline. Each one is handled where it is
/// raised; none of them stops the application.
#[derive(Debug, Error)]
pub enum MapError {
    /// One input row failed validation and was dropped.
    #[error("row rejected: {reason}")]
    RowRejected { reason: String },

    /// The input file could not be read or parsed at all.
    #[error("could not load hazard data from {}: {reason}", .path.display())]
    DatasetLoadFailed { path: PathBuf, reason: String },

    /// The host has no location capability configured.
    #[error("this device does not provide location information")]
    GeolocationUnavailable,

    #[error("could not export to {}: {reason}", .path.display())]
    ExportFailed { path: PathBuf, reason: String },
}

impl MapError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        MapError::RowRejected {
            reason: reason.into(),
        }
    }
}
