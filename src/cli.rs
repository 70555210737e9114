use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "capture-tool")]
#[command(about = "Headless browser page capture tool")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[arg(help = "Target URL; omit to read targets.txt")]
    pub url: Option<String>,

    #[arg(long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Target list file (one URL per line)")]
    pub targets: Option<PathBuf>,

    #[arg(long, help = "Root directory for job outputs")]
    pub outputs: Option<PathBuf>,

    #[arg(long, help = "Whole-pipeline deadline in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Post-navigation settle delay in milliseconds")]
    pub settle_wait: Option<u64>,

    #[arg(long, help = "Chrome executable path")]
    pub chrome_path: Option<String>,

    #[arg(long, help = "Enable verbose logging")]
    pub verbose: bool,
}

pub fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    Ok(())
}
