use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rabbit_snake::game::GameConfig;
use rabbit_snake::modes::PlayMode;
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "rabbit_snake")]
#[command(version, about = "Snake game: eat rabbits, don't bite yourself")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting speed, 1 (slow) to 9 (fast)
    #[arg(long)]
    speed: Option<u8>,

    /// Seed for rabbit placement
    #[arg(long)]
    seed: Option<u64>,

    /// Board surface width in columns (defaults to the terminal)
    #[arg(long, requires = "height")]
    width: Option<u16>,

    /// Board surface height in rows (defaults to the terminal)
    #[arg(long, requires = "width")]
    height: Option<u16>,

    /// Where to write the log; the terminal belongs to the game
    #[arg(long, default_value = "rabbit_snake.log")]
    log_file: PathBuf,

    /// Log level (error, warn, info, debug, trace, off)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(speed) = self.speed {
            config.initial_speed = speed;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let config = cli.game_config()?;
    info!("Starting with {:?}", config);

    let (width, height) = match (cli.width, cli.height) {
        (Some(width), Some(height)) => (width, height),
        _ => PlayMode::terminal_surface()?,
    };
    info!("Board surface {}x{}", width, height);

    let mut play_mode = PlayMode::new(config, width, height)?;
    play_mode.run().await?;

    Ok(())
}
