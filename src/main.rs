use anyhow::{Context, Result};
use clap::Parser;
use snake_arcade::audio::BellPlayer;
use snake_arcade::game::GameConfig;
use snake_arcade::logging::init_logging;
use snake_arcade::modes::HumanMode;
use snake_arcade::prefs::{JsonFileStore, Preferences};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Snake with power-ups in the terminal")]
struct Cli {
    /// JSON game configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Play-field width, in the same units as the cell pitch
    #[arg(long)]
    field_width: Option<u32>,

    /// Play-field height
    #[arg(long)]
    field_height: Option<u32>,

    /// Size of one grid cell
    #[arg(long)]
    cell_pitch: Option<u32>,

    /// Tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where sound setting, message setting and high score are kept
    #[arg(long, default_value = "snake_prefs.json")]
    prefs: PathBuf,

    /// Write diagnostic logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.field_width {
            config.field_width = width;
        }
        if let Some(height) = self.field_height {
            config.field_height = height;
        }
        if let Some(pitch) = self.cell_pitch {
            config.cell_pitch = pitch;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    tracing::info!(?config, "configuration loaded");

    let prefs = Preferences::load(Box::new(JsonFileStore::open(&cli.prefs)));
    let player = Box::new(BellPlayer::new(std::io::stdout()));

    let mut human_mode = HumanMode::new(config, prefs, player);
    human_mode.run().await?;

    Ok(())
}
