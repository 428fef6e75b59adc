//! bathyscope: drive an ROV through an underwater scene.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use bathyscope::ViewerConfig;

#[derive(Parser)]
#[command(name = "bathyscope")]
#[command(about = "Underwater ROV scene viewer")]
struct Cli {
    /// JSON configuration file; every key is optional
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the textures and the skybox/ faces
    #[arg(long)]
    assets: Option<PathBuf>,
    /// Seed for a reproducible scenery layout
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Start in borderless fullscreen
    #[arg(long)]
    fullscreen: bool,
}

impl Cli {
    fn into_config(self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ViewerConfig::default(),
        };
        if let Some(dir) = self.assets {
            config = config.with_asset_dir(dir);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        let width = self.width.unwrap_or(config.window.width);
        let height = self.height.unwrap_or(config.window.height);
        config = config.with_size(width, height);
        if self.fullscreen {
            config = config.with_fullscreen(true);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse()
        .into_config()
        .inspect_err(|err| error!("{err:#}"))?;
    bathyscope::run(config).inspect_err(|err| error!("viewer failed: {err}"))?;
    Ok(())
}
