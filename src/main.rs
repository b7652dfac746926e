use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

use sbs_compositor::{
    config::Config,
    encoder::FfmpegEncoder,
    pipeline::PipelineEngine,
};

#[derive(Parser)]
#[command(
    name = "sbs-compositor",
    version,
    about = "Compose two rendered frame sequences into a side-by-side video",
    long_about = "SBS-Compositor takes a directory of rendered frames and a subdirectory of \
visualization frames, encodes each sequence into a clip, and stacks the two clips \
side by side into a single comparison video."
)]
struct Cli {
    /// Base directory containing the primary frame sequence
    #[arg(short, long)]
    base_dir: PathBuf,

    /// Frame rate applied to both intermediate encodes
    #[arg(short, long, default_value_t = 30.0)]
    frame_rate: f64,

    /// Filename of the final video, written inside the base directory
    #[arg(short, long, default_value = "combined_video.mp4")]
    output: String,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

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
        .init();

    info!("Starting SBS-Compositor v{}", env!("CARGO_PKG_VERSION"));
    info!("Base directory: {:?}", cli.base_dir);
    info!("Frame rate: {}", cli.frame_rate);
    info!("Output: {}", cli.output);

    // Load configuration
    let config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    config.validate()?;

    if !FfmpegEncoder::is_available() {
        anyhow::bail!("ffmpeg not found on PATH. Please install FFmpeg.");
    }

    // Create and run the pipeline engine
    let engine = PipelineEngine::new(config, Arc::new(FfmpegEncoder::new()));

    info!("Starting composition pipeline...");
    let report = engine
        .run(&cli.base_dir, cli.frame_rate, &cli.output)
        .await?;

    info!("Composition complete! Output saved to: {:?}", report.path);
    Ok(())
}
