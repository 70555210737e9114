//! Per-job browser sessions.
//!
//! Each capture job owns exactly one isolated browser session for its
//! lifetime. `BrowserSession` is the capability set the pipeline depends
//! on; `ChromiumSession` is the production implementation backed by a
//! dedicated headless Chrome process per job.

use crate::config::{create_browser_config, Config};
use crate::error::CaptureError;
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, ResourceType,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// In-page link extraction routine: every anchor's `href` resolved against
/// the document's base URI, unresolvable hrefs silently dropped,
/// deduplicated in first-seen order.
pub const LINK_EXTRACTION_JS: &str = r#"
(() => {
    const urls = [];
    for (const anchor of document.querySelectorAll('a')) {
        const href = anchor.getAttribute('href');
        if (href === null) {
            continue;
        }
        try {
            const resolved = new URL(href, document.baseURI).href;
            if (!urls.includes(resolved)) {
                urls.push(resolved);
            }
        } catch (e) {
            // Unresolvable href, skip.
        }
    }
    return urls;
})()
"#;

/// Capability set one capture job requires from its browser session.
///
/// Any automation engine exposing these operations is substitutable without
/// changing the pipeline.
#[async_trait]
pub trait BrowserSession: Send {
    /// Subscribe to network response events so the HTTP status of the
    /// top-level document can be recorded. Best-effort: callers treat a
    /// failure here as "status unknown", not as a job failure.
    async fn observe_responses(&mut self) -> Result<(), CaptureError>;

    async fn navigate(&mut self, url: &str) -> Result<(), CaptureError>;

    /// Fixed settle delay between navigation and extraction.
    async fn wait_settle(&mut self, delay: Duration) -> Result<(), CaptureError>;

    /// Serialized markup of the document root.
    async fn outer_html(&mut self) -> Result<String, CaptureError>;

    /// Full-page raster screenshot at the given quality.
    async fn screenshot(&mut self, quality: i64) -> Result<Vec<u8>, CaptureError>;

    /// Run the in-page link extraction routine.
    async fn extract_links(&mut self) -> Result<Vec<String>, CaptureError>;

    /// Status of the last observed top-level document response, if any.
    fn http_status(&self) -> Option<u16>;

    /// Tear the session down. Invoked on every pipeline exit path.
    async fn close(self: Box<Self>);
}

/// Acquires a fresh, isolated session for each job.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, CaptureError>;
}

/// Launches one dedicated Chrome process per job.
pub struct ChromiumLauncher {
    config: Config,
}

impl ChromiumLauncher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionProvider for ChromiumLauncher {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>, CaptureError> {
        let session = ChromiumSession::launch(&self.config).await?;
        Ok(Box::new(session))
    }
}

/// A single-use browser session bound to one capture job.
///
/// Owns the Chrome process, the CDP handler drain task, and one page. The
/// unique user data directory keeps cookies, cache, and tabs private to
/// this job.
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    status: Arc<Mutex<Option<u16>>>,
    status_task: Option<JoinHandle<()>>,
}

impl ChromiumSession {
    pub async fn launch(config: &Config) -> Result<Self, CaptureError> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let browser_config = match create_browser_config(config, &session_id) {
            Ok(browser_config) => browser_config,
            // A missing executable is only discovered here, during
            // acquisition, so it surfaces as a session failure.
            Err(CaptureError::Config(msg)) => return Err(CaptureError::Connection(msg)),
            Err(other) => return Err(other),
        };

        let (browser, mut cdp_events) = Browser::launch(browser_config)
            .await
            .map_err(|e| CaptureError::Connection(format!("browser launch failed: {e}")))?;

        // The CDP handler stream must be polled for the session's lifetime.
        let handler = tokio::spawn(async move {
            while let Some(event) = cdp_events.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler event error");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(CaptureError::Connection(format!(
                    "page creation failed: {e}"
                )));
            }
        };

        let emulation = SetDeviceMetricsOverrideParams::builder()
            .width(config.viewport.width)
            .height(config.viewport.height)
            .device_scale_factor(config.viewport.device_scale_factor)
            .mobile(config.viewport.mobile)
            .build()
            .map_err(CaptureError::Connection)?;

        if let Err(e) = page.execute(emulation).await {
            handler.abort();
            return Err(CaptureError::Connection(format!(
                "viewport setup failed: {e}"
            )));
        }

        debug!(session = %session_id, "browser session ready");

        Ok(Self {
            browser,
            handler,
            page,
            status: Arc::new(Mutex::new(None)),
            status_task: None,
        })
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn observe_responses(&mut self) -> Result<(), CaptureError> {
        self.page
            .execute(EnableParams::default())
            .await
            .map_err(|e| CaptureError::Connection(format!("network domain enable failed: {e}")))?;

        let mut events = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| CaptureError::Connection(format!("response subscription failed: {e}")))?;

        let status = self.status.clone();

        // Redirect chains emit several document responses; the last one wins.
        self.status_task = Some(tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if matches!(event.r#type, ResourceType::Document) {
                    let code = event.response.status as u16;
                    debug!(status = code, url = %event.response.url, "document response observed");
                    *status.lock().unwrap() = Some(code);
                }
            }
        }));

        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<(), CaptureError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| CaptureError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn wait_settle(&mut self, delay: Duration) -> Result<(), CaptureError> {
        tokio::time::sleep(delay).await;
        Ok(())
    }

    async fn outer_html(&mut self) -> Result<String, CaptureError> {
        self.page
            .content()
            .await
            .map_err(|e| CaptureError::Script(format!("markup extraction failed: {e}")))
    }

    async fn screenshot(&mut self, quality: i64) -> Result<Vec<u8>, CaptureError> {
        // Quality 100 selects lossless PNG; anything lower captures JPEG at
        // that quality.
        let params = if quality >= 100 {
            ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .full_page(true)
                .build()
        } else {
            ScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Jpeg)
                .quality(quality)
                .full_page(true)
                .build()
        };

        self.page
            .screenshot(params)
            .await
            .map_err(|e| CaptureError::Script(format!("screenshot capture failed: {e}")))
    }

    async fn extract_links(&mut self) -> Result<Vec<String>, CaptureError> {
        let evaluation = self
            .page
            .evaluate(LINK_EXTRACTION_JS)
            .await
            .map_err(|e| CaptureError::Script(format!("link extraction failed: {e}")))?;

        evaluation.into_value::<Vec<String>>().map_err(|e| {
            CaptureError::Script(format!("link extraction returned unexpected value: {e}"))
        })
    }

    fn http_status(&self) -> Option<u16> {
        *self.status.lock().unwrap()
    }

    async fn close(self: Box<Self>) {
        let this = *self;

        if let Some(task) = this.status_task {
            task.abort();
        }

        if let Err(e) = this.page.close().await {
            debug!(error = %e, "page close failed");
        }

        let mut browser = this.browser;
        if let Err(e) = browser.close().await {
            debug!(error = %e, "browser close failed");
        }

        this.handler.abort();
        debug!("browser session released");
    }
}
