use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::CellPitch;

/// Speeds the player can pick, slowest first
pub const SPEED_RANGE: RangeInclusive<u8> = 1..=9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("initial_speed must be in {min}..={max}, got {got}")]
    SpeedOutOfRange { got: u8, min: u8, max: u8 },
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Columns taken by one drawn cell
    pub point_width: u16,
    /// Blank columns after each cell
    pub spacing_x: u16,
    /// Rows taken by one drawn cell
    pub point_height: u16,
    /// Blank rows after each cell
    pub spacing_y: u16,

    /// Speed of the very first game; later games keep the last speed
    pub initial_speed: u8,
    /// Tick interval at speed 1, divided by the speed
    pub base_frame_ms: u64,
    pub blink_interval_ms: u64,
    pub blink_steps: u8,

    pub rabbit_reward: u32,
    /// Score interval at which the game speeds itself up
    pub speed_up_every: u32,
    /// Lifetime of the short milestone notices
    pub short_notice_ms: u64,

    /// Fixed RNG seed for reproducible rabbit placement
    pub seed: Option<u64>,

    pub active_color: [u8; 3],
    pub idle_color: [u8; 3],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            point_width: 1,
            spacing_x: 1,
            point_height: 1,
            spacing_y: 0,
            initial_speed: 1,
            base_frame_ms: 500,
            blink_interval_ms: 350,
            blink_steps: 6,
            rabbit_reward: 100,
            speed_up_every: 1000,
            short_notice_ms: 5000,
            seed: None,
            active_color: [0x33, 0x33, 0x33],
            idle_color: [0xee, 0xee, 0xee],
        }
    }
}

impl GameConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SPEED_RANGE.contains(&self.initial_speed) {
            return Err(ConfigError::SpeedOutOfRange {
                got: self.initial_speed,
                min: *SPEED_RANGE.start(),
                max: *SPEED_RANGE.end(),
            });
        }

        let positive = [
            ("point_width", self.point_width as u64),
            ("point_height", self.point_height as u64),
            ("base_frame_ms", self.base_frame_ms),
            ("blink_interval_ms", self.blink_interval_ms),
            ("rabbit_reward", self.rabbit_reward as u64),
            ("speed_up_every", self.speed_up_every as u64),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::NotPositive { field });
            }
        }

        Ok(())
    }

    pub fn pitch_x(&self) -> CellPitch {
        CellPitch::new(self.point_width, self.spacing_x)
    }

    pub fn pitch_y(&self) -> CellPitch {
        CellPitch::new(self.point_height, self.spacing_y)
    }

    /// Time between two ticks at `speed`
    pub fn frame_time(&self, speed: u8) -> Duration {
        Duration::from_millis(self.base_frame_ms) / u32::from(speed.max(1))
    }

    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }

    pub fn short_notice(&self) -> Duration {
        Duration::from_millis(self.short_notice_ms)
    }
}
