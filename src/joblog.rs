//! Shared append-only run log.
//!
//! Every job writes exactly one terminal record, after its outcome is
//! final. The file is never rotated or truncated; it grows for the run's
//! lifetime.

use crate::error::CaptureError;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

pub const LOG_FILENAME: &str = "logs.txt";

/// Outcome marker for a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Ok,
    Err,
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogStatus::Ok => write!(f, "OK"),
            LogStatus::Err => write!(f, "ERR"),
        }
    }
}

/// Appends one structured outcome line per job to the shared log file.
pub struct JobLog {
    path: PathBuf,
}

impl JobLog {
    pub fn new(outputs_root: &Path) -> Self {
        Self {
            path: outputs_root.join(LOG_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record in the fixed format
    /// `<STATUS> | <timestamp> - <url> - <message>`.
    pub async fn append(
        &self,
        status: LogStatus,
        timestamp: &str,
        url: &str,
        message: &str,
    ) -> Result<(), CaptureError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let line = format!("{status} | {timestamp} - {url} - {message}\n");
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_writes_fixed_format() {
        let root = tempfile::tempdir().unwrap();
        let log = JobLog::new(root.path());

        log.append(
            LogStatus::Ok,
            "2024-01-01_00-00-00",
            "https://example.com",
            "capture complete | HTTP status: 200",
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "OK | 2024-01-01_00-00-00 - https://example.com - capture complete | HTTP status: 200\n"
        );
    }

    #[tokio::test]
    async fn test_append_accumulates_one_line_per_record() {
        let root = tempfile::tempdir().unwrap();
        let log = JobLog::new(root.path());

        log.append(LogStatus::Ok, "t1", "https://a.example", "done")
            .await
            .unwrap();
        log.append(LogStatus::Err, "t2", "https://b.example", "navigation failed")
            .await
            .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("OK | t1 - https://a.example - "));
        assert!(lines[1].starts_with("ERR | t2 - https://b.example - "));
    }

    #[tokio::test]
    async fn test_append_creates_outputs_root_lazily() {
        let root = tempfile::tempdir().unwrap();
        let outputs = root.path().join("outputs");
        let log = JobLog::new(&outputs);
        assert!(!outputs.exists());

        log.append(LogStatus::Ok, "t", "https://example.com", "done")
            .await
            .unwrap();
        assert!(log.path().exists());
    }
}
