use std::time::Duration;
use thiserror::Error;

/// Failure taxonomy for a capture run.
///
/// `Config` is fatal before any job starts; every other variant is a
/// per-job failure that triggers directory cleanup and an `ERR` log record
/// without aborting the run.
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("browser session failed: {0}")]
    Connection(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("page script failed: {0}")]
    Script(String),

    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl CaptureError {
    /// Fatal errors abort the run before any job executes; everything else
    /// is contained within a single job.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CaptureError::Config(_))
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Filesystem(err.to_string())
    }
}
