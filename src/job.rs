//! Target and job model for a capture run.

use crate::error::CaptureError;
use crate::utils::sanitize_url;
use std::path::{Path, PathBuf};

/// One URL scheduled for capture.
///
/// Targets are read once, consumed in order, and never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: String,
}

impl Target {
    /// Build a target from raw input, trimming surrounding whitespace.
    /// Empty input is rejected.
    pub fn new(raw: &str) -> Result<Self, CaptureError> {
        let url = raw.trim();
        if url.is_empty() {
            return Err(CaptureError::Config("target URL is empty".to_string()));
        }
        Ok(Self {
            url: url.to_string(),
        })
    }
}

/// Terminal state of a job. Set exactly once, never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

/// One execution of the capture pipeline against one target.
///
/// Created when a target enters the pipeline; mutated only by the pipeline
/// (HTTP status) and the runner (terminal status).
#[derive(Debug)]
pub struct Job {
    pub target: Target,
    pub started_at: String,
    pub output_dir: PathBuf,
    pub status: JobStatus,
    pub http_status: Option<u16>,
    pub error: Option<String>,
}

impl Job {
    pub fn new(target: Target, started_at: String, outputs_root: &Path) -> Self {
        let output_dir =
            outputs_root.join(format!("{}_{}", started_at, sanitize_url(&target.url)));
        Self {
            target,
            started_at,
            output_dir,
            status: JobStatus::Pending,
            http_status: None,
            error: None,
        }
    }

    pub fn succeed(&mut self) {
        debug_assert_eq!(self.status, JobStatus::Pending);
        self.status = JobStatus::Succeeded;
    }

    pub fn fail(&mut self, error: &CaptureError) {
        debug_assert_eq!(self.status, JobStatus::Pending);
        self.status = JobStatus::Failed;
        self.error = Some(error.to_string());
    }

    /// Captured HTTP status for log messages; absence is "unknown", not an
    /// error.
    pub fn http_status_label(&self) -> String {
        match self.http_status {
            Some(status) => status.to_string(),
            None => "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_target_trims_input() {
        let target = Target::new("  https://example.com  ").unwrap();
        assert_eq!(target.url, "https://example.com");
    }

    #[test]
    fn test_target_rejects_empty_input() {
        assert!(Target::new("").is_err());
        assert!(Target::new("   \t ").is_err());
    }

    #[test]
    fn test_job_starts_pending() {
        let target = Target::new("https://example.com").unwrap();
        let job = Job::new(target, "2024-01-01_00-00-00".to_string(), Path::new("outputs"));
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.http_status.is_none());
        assert!(job.error.is_none());
        assert!(job
            .output_dir
            .to_string_lossy()
            .starts_with("outputs/2024-01-01_00-00-00_"));
    }

    #[test]
    fn test_job_terminal_states() {
        let target = Target::new("https://example.com").unwrap();
        let mut job = Job::new(target, "2024-01-01_00-00-00".to_string(), Path::new("outputs"));
        job.succeed();
        assert_eq!(job.status, JobStatus::Succeeded);

        let target = Target::new("https://example.org").unwrap();
        let mut job = Job::new(target, "2024-01-01_00-00-00".to_string(), Path::new("outputs"));
        job.fail(&CaptureError::Navigation("net::ERR_FAILED".to_string()));
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.as_deref().unwrap().contains("net::ERR_FAILED"));
    }

    #[test]
    fn test_http_status_label() {
        let target = Target::new("https://example.com").unwrap();
        let mut job = Job::new(target, "2024-01-01_00-00-00".to_string(), Path::new("outputs"));
        assert_eq!(job.http_status_label(), "unknown");
        job.http_status = Some(200);
        assert_eq!(job.http_status_label(), "200");
    }
}
