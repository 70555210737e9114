use capture_tool::{
    load_targets, setup_logging, validate_config, ChromiumLauncher, Cli, Config, JobRunner,
    SessionProvider, TARGETS_FILENAME,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    info!("Starting capture-tool v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&args).await?;

    // Resolve the target list; an unusable source is fatal before any job
    // runs, and nothing may be written in that case.
    let targets_path = args
        .targets
        .clone()
        .unwrap_or_else(|| PathBuf::from(TARGETS_FILENAME));

    let targets = match load_targets(args.url.clone(), &targets_path).await {
        Ok(targets) => targets,
        Err(e) => {
            eprintln!("{e}");
            println!("Usage: capture-tool <url>  (or provide a {TARGETS_FILENAME} file)");
            return Ok(());
        }
    };

    let provider: Arc<dyn SessionProvider> = Arc::new(ChromiumLauncher::new(config.clone()));
    let runner = JobRunner::new(config, provider);
    runner.run(&targets).await;

    info!("capture-tool finished");
    Ok(())
}

async fn load_config(args: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if let Some(config_path) = &args.config {
        // Load from file
        let config_content = tokio::fs::read_to_string(config_path).await?;
        serde_json::from_str(&config_content)?
    } else {
        // Use default configuration
        Config::default()
    };

    // Override with CLI arguments
    if let Some(timeout) = args.timeout {
        config.capture_deadline = Duration::from_secs(timeout);
    }

    if let Some(settle_wait) = args.settle_wait {
        config.settle_delay = Duration::from_millis(settle_wait);
    }

    if let Some(outputs) = &args.outputs {
        config.outputs_root = outputs.clone();
    }

    if let Some(chrome_path) = &args.chrome_path {
        config.chrome_path = Some(chrome_path.clone());
    }

    // Validate configuration
    validate_config(&config)?;

    info!("Configuration loaded successfully");
    info!("Capture deadline: {:?}", config.capture_deadline);
    info!("Settle delay: {:?}", config.settle_delay);
    info!("Outputs root: {}", config.outputs_root.display());

    Ok(config)
}
