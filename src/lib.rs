//! # Capture Tool
//!
//! A headless-browser page capture tool. Given one URL or a list of URLs,
//! it drives a dedicated Chrome process per target to render the page,
//! then persists the rendered markup, a full-page screenshot, and the set
//! of outbound links, recording one structured outcome line per job in a
//! shared run log.
//!
//! Jobs are independent, strictly sequential, and all-or-nothing: a job's
//! output directory either contains all three artifacts or does not exist
//! at all. Each job owns exactly one isolated browser session that is
//! released on every exit path, including deadline expiry.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use capture_tool::{ChromiumLauncher, Config, JobRunner, SessionProvider, Target};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let provider: Arc<dyn SessionProvider> =
//!         Arc::new(ChromiumLauncher::new(config.clone()));
//!     let runner = JobRunner::new(config, provider);
//!
//!     let targets = vec![Target::new("https://example.com")?];
//!     runner.run(&targets).await;
//!     Ok(())
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ### Single target
//! ```bash
//! capture-tool https://example.com
//! ```
//!
//! ### Target list
//! ```bash
//! # One URL per line, blank lines ignored
//! capture-tool --targets targets.txt
//! ```
//!
//! Outputs land under `outputs/<start-time>_<sanitized-url>/`, next to the
//! shared append-only `outputs/logs.txt`.

/// Configuration and browser launch settings
pub mod config;

/// Error types for the capture taxonomy
pub mod error;

/// Target and job model
pub mod job;

/// Shared append-only run log
pub mod joblog;

/// The per-target capture pipeline
pub mod pipeline;

/// Sequential job execution with fault isolation
pub mod runner;

/// Per-job browser sessions and the capability trait
pub mod session;

/// Artifact persistence with all-or-nothing rollback
pub mod sink;

/// Target list acquisition
pub mod targets;

/// Command-line interface implementation
pub mod cli;

/// Utility functions and helpers
pub mod utils;


pub use cli::*;
pub use config::*;
pub use error::*;
pub use job::*;
pub use joblog::*;
pub use pipeline::*;
pub use runner::*;
pub use session::*;
pub use sink::*;
pub use targets::*;
pub use utils::*;
