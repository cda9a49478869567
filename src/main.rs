use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use brand_compositor::{composition::CompositionEngine, config::Config, styles::StyleRegistry};

#[derive(Parser)]
#[command(
    name = "brand-compositor",
    version,
    about = "Overlay brand assets on a photo and wrap it in a frame style",
    long_about = "Brand-Compositor reads a composite request (the same JSON a web host would POST), fetches the base and overlay images, renders the tint, ring and frame, stores the result and prints the response body."
)]
struct Cli {
    /// Request JSON file
    #[arg(short, long, required_unless_present_any = ["list_styles", "init_config"])]
    request: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fixed seed for procedural textures (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// List frame styles and exit
    #[arg(long)]
    list_styles: bool,

    /// Write the default configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if cli.list_styles {
        let registry = StyleRegistry::new();
        for name in registry.available_styles() {
            let style = registry.resolve(name);
            let metadata = style.metadata();
            println!(
                "{:<10} {:<16} {}{}",
                name,
                metadata.growth.to_string(),
                style.description(),
                if metadata.procedural { " (seeded)" } else { "" }
            );
        }
        return Ok(());
    }

    if let Some(path) = cli.init_config {
        Config::default().save_to_file(&path)?;
        info!("Wrote default configuration to {:?}", path);
        return Ok(());
    }

    info!("Starting Brand-Compositor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if let Some(seed) = cli.seed {
        config.engine.grain_seed = Some(seed);
    }

    let request_path = cli.request.context("--request is required")?;
    let body = tokio::fs::read(&request_path)
        .await
        .with_context(|| format!("reading request {}", request_path.display()))?;

    let engine = CompositionEngine::from_config(config)?;
    let response = engine.handle(&body).await;

    info!("Finished with status {}", response.status);
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    if response.status != 200 {
        std::process::exit(1);
    }
    Ok(())
}
