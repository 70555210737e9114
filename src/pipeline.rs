//! The per-target capture pipeline.
//!
//! Orchestrates one job against one browser session: acquisition,
//! bounded-deadline navigation, settle delay, and multi-artifact
//! extraction. Any stage failure, including deadline expiry, aborts the
//! job with no partial result; the session is released on every exit path.

use crate::config::Config;
use crate::error::CaptureError;
use crate::job::Job;
use crate::session::{BrowserSession, SessionProvider};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

/// Everything a successful capture produced.
///
/// Either fully present or the job has already failed; never partially
/// populated. `links` is deduplicated and preserves first-occurrence order.
#[derive(Debug)]
pub struct CaptureResult {
    pub html: String,
    pub screenshot: Vec<u8>,
    pub links: Vec<String>,
    pub http_status: Option<u16>,
}

/// Runs capture jobs against sessions acquired from a provider.
pub struct CapturePipeline {
    config: Config,
    provider: Arc<dyn SessionProvider>,
}

impl CapturePipeline {
    pub fn new(config: Config, provider: Arc<dyn SessionProvider>) -> Self {
        Self { config, provider }
    }

    /// Execute one capture job.
    ///
    /// One absolute deadline computed at entry covers session acquisition
    /// through link extraction; every stage races it, so expiry anywhere
    /// surfaces as `CaptureError::Timeout` rather than a stage error.
    /// The captured HTTP status is written back to the job on success and
    /// failure alike, and the session is closed before this returns.
    pub async fn run(&self, job: &mut Job) -> Result<CaptureResult, CaptureError> {
        let url = job.target.url.clone();

        url::Url::parse(&url)
            .map_err(|e| CaptureError::Navigation(format!("invalid URL {url:?}: {e}")))?;

        let deadline = Instant::now() + self.config.capture_deadline;

        debug!(%url, "acquiring browser session");
        let mut session = self.bounded(deadline, self.provider.acquire()).await?;

        let outcome = self.drive(session.as_mut(), &url, deadline).await;

        job.http_status = session.http_status();
        session.close().await;

        let (html, screenshot, links) = outcome?;
        Ok(CaptureResult {
            html,
            screenshot,
            links: dedup_preserving_order(links),
            http_status: job.http_status,
        })
    }

    /// The staged part of the pipeline, with the session borrowed so the
    /// caller can still tear it down when a stage fails or the deadline
    /// expires mid-await.
    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        deadline: Instant,
    ) -> Result<(String, Vec<u8>, Vec<String>), CaptureError> {
        // Subscribe before navigating so the document response is not
        // missed. Best-effort: without it the status is "unknown".
        if let Err(e) = self.bounded(deadline, session.observe_responses()).await {
            warn!(%url, error = %e, "response observation unavailable, HTTP status will be unknown");
        }

        debug!(%url, "navigating");
        self.bounded(deadline, session.navigate(url)).await?;

        debug!(%url, delay = ?self.config.settle_delay, "waiting for page to settle");
        self.bounded(deadline, session.wait_settle(self.config.settle_delay))
            .await?;

        let html = self.bounded(deadline, session.outer_html()).await?;
        let screenshot = self
            .bounded(deadline, session.screenshot(self.config.screenshot_quality))
            .await?;
        let links = self.bounded(deadline, session.extract_links()).await?;

        debug!(%url, links = links.len(), "extraction complete");
        Ok((html, screenshot, links))
    }

    /// Race one stage against the job's absolute deadline.
    async fn bounded<T>(
        &self,
        deadline: Instant,
        stage: impl Future<Output = Result<T, CaptureError>> + Send,
    ) -> Result<T, CaptureError> {
        match timeout_at(deadline, stage).await {
            Ok(result) => result,
            Err(_) => Err(CaptureError::Timeout(self.config.capture_deadline)),
        }
    }
}

/// Insertion-order deduplication, enforced at the pipeline level even if a
/// session implementation returns duplicates.
fn dedup_preserving_order(links: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_preserves_first_occurrence_order() {
        let links = vec![
            "https://example.com/a".to_string(),
            "https://example.com/b".to_string(),
            "https://example.com/a".to_string(),
            "https://example.com/c".to_string(),
            "https://example.com/b".to_string(),
        ];
        assert_eq!(
            dedup_preserving_order(links),
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
                "https://example.com/c".to_string(),
            ]
        );
    }

    #[test]
    fn test_dedup_empty() {
        assert!(dedup_preserving_order(Vec::new()).is_empty());
    }
}
