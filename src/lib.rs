//! Rabbit Snake - a terminal snake game
//!
//! This library provides:
//! - Core game logic (game module): grid, state machine, sink traits
//! - Keyboard mapping per phase (input module)
//! - TUI sinks and drawing (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
