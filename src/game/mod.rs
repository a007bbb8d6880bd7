//! Core game logic for the rabbit-chasing snake
//!
//! Nothing in here touches the terminal or the clock. The engine is driven by
//! input events and timer firings and talks to the outside world through the
//! sink traits, so it can be exercised directly from tests.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod sink;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Input};
pub use config::{ConfigError, GameConfig, SPEED_RANGE};
pub use engine::{Fired, GameEngine, StepInfo, Timer, TimerKind, find_free_cell};
pub use grid::{CellPitch, Geometry, Grid, GridError};
pub use sink::{NoticeDuration, NoticeSink, RenderSink};
pub use state::{Cell, CollisionType, Controls, GameState, Phase, Snake, Status};
