//! Configuration management with serde serialization/deserialization
//!
//! This module provides the configuration structures for the capture tool,
//! including pipeline timing, browser settings, and output locations.

use crate::error::CaptureError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the capture tool
///
/// Controls the per-job deadline, the post-navigation settle delay, the
/// screenshot quality, and where job outputs land on disk.
///
/// # Examples
///
/// ```rust
/// use capture_tool::Config;
/// use std::time::Duration;
///
/// // Use default configuration
/// let config = Config::default();
///
/// // Create custom configuration
/// let config = Config {
///     settle_delay: Duration::from_millis(500),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Deadline for one whole capture job, session acquisition through link
    /// extraction (default: 30 seconds)
    ///
    /// A job that exceeds this is aborted, its browser session released, and
    /// its outcome logged as a timeout. The deadline is not per-stage.
    pub capture_deadline: Duration,

    /// Fixed delay between navigation and extraction (default: 2 seconds)
    ///
    /// This is a rendering heuristic, not an event-driven wait, and is the
    /// pipeline's primary source of flakiness on slow pages. Raise it via
    /// `--settle-wait` when capturing script-heavy targets.
    pub settle_delay: Duration,

    /// Screenshot quality from 1 to 100 (default: 90)
    ///
    /// 100 selects lossless PNG encoding; anything lower captures JPEG at
    /// that quality.
    pub screenshot_quality: i64,

    /// Root directory that receives per-job output directories and the
    /// shared run log (default: `outputs`)
    pub outputs_root: PathBuf,

    /// Browser viewport configuration for rendering
    pub viewport: Viewport,

    /// Path to Chrome/Chromium executable (default: auto-detect)
    pub chrome_path: Option<String>,

    /// Custom User-Agent string for requests (default: Chrome default)
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture_deadline: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
            screenshot_quality: 90,
            outputs_root: PathBuf::from("outputs"),
            viewport: Viewport::default(),
            chrome_path: None,
            user_agent: None,
        }
    }
}

/// Browser viewport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Viewport {
    /// Viewport width in pixels (default: 1920)
    pub width: u32,

    /// Viewport height in pixels (default: 1080)
    pub height: u32,

    /// Device pixel ratio for high-DPI displays (default: 1.0)
    pub device_scale_factor: f64,

    /// Whether to emulate a mobile device (default: false)
    pub mobile: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            device_scale_factor: 1.0,
            mobile: false,
        }
    }
}

/// Validate a configuration before any job runs
///
/// Invalid configuration is a fatal, pre-job condition: nothing is captured
/// and nothing is logged.
pub fn validate_config(config: &Config) -> Result<(), CaptureError> {
    if config.capture_deadline.is_zero() {
        return Err(CaptureError::Config(
            "capture deadline must be greater than 0".to_string(),
        ));
    }

    if config.settle_delay >= config.capture_deadline {
        return Err(CaptureError::Config(
            "settle delay must be shorter than the capture deadline".to_string(),
        ));
    }

    if !(1..=100).contains(&config.screenshot_quality) {
        return Err(CaptureError::Config(
            "screenshot quality must be between 1 and 100".to_string(),
        ));
    }

    if config.viewport.width == 0 || config.viewport.height == 0 {
        return Err(CaptureError::Config(
            "viewport dimensions must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Generate Chrome command-line arguments for one isolated session
///
/// Each job gets a unique user data directory so no cookies, cache, or tabs
/// are shared with any other job.
pub fn get_chrome_args(config: &Config, session_id: &str) -> Vec<String> {
    let profile_dir = std::env::temp_dir().join(format!("capture-tool-{session_id}"));

    let mut args = vec![
        "--headless".to_string(),
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--disable-extensions".to_string(),
        "--disable-default-apps".to_string(),
        "--disable-sync".to_string(),
        "--no-first-run".to_string(),
        "--ignore-certificate-errors".to_string(),
        format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        ),
        format!("--user-data-dir={}", profile_dir.display()),
    ];

    if let Some(user_agent) = &config.user_agent {
        args.push(format!("--user-agent={user_agent}"));
    }

    args
}

/// Build a chromiumoxide launch configuration for one session
pub fn create_browser_config(
    config: &Config,
    session_id: &str,
) -> Result<chromiumoxide::browser::BrowserConfig, CaptureError> {
    use chromiumoxide::browser::BrowserConfig;

    let mut builder = BrowserConfig::builder()
        .window_size(config.viewport.width, config.viewport.height)
        .args(get_chrome_args(config, session_id));

    if let Some(chrome_path) = &config.chrome_path {
        builder = builder.chrome_executable(chrome_path);
    }

    builder.build().map_err(CaptureError::Config)
}
