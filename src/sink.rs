//! Artifact persistence with all-or-nothing semantics.
//!
//! A job's output directory either contains all three artifacts or does
//! not exist at all. Individual writes are not transactional; the
//! invariant is enforced at the directory level by removing the whole
//! directory when any write fails.

use crate::error::CaptureError;
use crate::pipeline::CaptureResult;
use std::path::Path;
use tokio::fs;
use tracing::warn;

pub const HTML_FILENAME: &str = "scraped_output.html";
pub const SCREENSHOT_FILENAME: &str = "screenshot.png";
pub const URL_LIST_FILENAME: &str = "extracted_urls.txt";

/// Persists capture results under per-job directories.
pub struct OutputSink;

impl OutputSink {
    pub fn new() -> Self {
        Self
    }

    /// Write the three artifacts into `dir`, creating it (and any missing
    /// parent) first. On any write failure the whole directory is removed
    /// before the error is returned.
    pub async fn write(&self, dir: &Path, result: &CaptureResult) -> Result<(), CaptureError> {
        fs::create_dir_all(dir).await?;

        if let Err(err) = self.write_artifacts(dir, result).await {
            self.cleanup(dir).await;
            return Err(err);
        }

        Ok(())
    }

    async fn write_artifacts(&self, dir: &Path, result: &CaptureResult) -> Result<(), CaptureError> {
        fs::write(dir.join(HTML_FILENAME), result.html.as_bytes()).await?;
        fs::write(dir.join(SCREENSHOT_FILENAME), &result.screenshot).await?;
        fs::write(dir.join(URL_LIST_FILENAME), result.links.join("\n").as_bytes()).await?;
        Ok(())
    }

    /// Remove a job directory and everything in it. Also invoked directly
    /// by the runner when the pipeline fails before persistence; a missing
    /// directory is not an error.
    pub async fn cleanup(&self, dir: &Path) {
        if let Err(e) = fs::remove_dir_all(dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(dir = %dir.display(), error = %e, "failed to remove job directory");
            }
        }
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> CaptureResult {
        CaptureResult {
            html: "<html><body>hello</body></html>".to_string(),
            screenshot: vec![0x89, 0x50, 0x4e, 0x47],
            links: vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ],
            http_status: Some(200),
        }
    }

    #[tokio::test]
    async fn test_write_produces_exactly_three_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("job");
        let sink = OutputSink::new();

        sink.write(&dir, &sample_result()).await.unwrap();

        let mut names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                URL_LIST_FILENAME.to_string(),
                HTML_FILENAME.to_string(),
                SCREENSHOT_FILENAME.to_string(),
            ]
        );

        let links = std::fs::read_to_string(dir.join(URL_LIST_FILENAME)).unwrap();
        assert_eq!(links, "https://example.com/a\nhttps://example.com/b");
    }

    #[tokio::test]
    async fn test_write_creates_missing_parents() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("outputs").join("job");
        let sink = OutputSink::new();

        sink.write(&dir, &sample_result()).await.unwrap();
        assert!(dir.join(HTML_FILENAME).exists());
    }

    #[tokio::test]
    async fn test_partial_write_failure_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("job");
        // A directory squatting on the screenshot path makes the second
        // write fail after the markup write succeeded.
        std::fs::create_dir_all(dir.join(SCREENSHOT_FILENAME)).unwrap();
        let sink = OutputSink::new();

        let err = sink.write(&dir, &sample_result()).await.unwrap_err();
        assert!(matches!(err, CaptureError::Filesystem(_)));
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_cleanup_tolerates_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let sink = OutputSink::new();
        sink.cleanup(&root.path().join("never-created")).await;
    }
}
