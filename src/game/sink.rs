//! Collaborators the engine pushes to.
//!
//! The engine never draws or prints anything itself. It tells a
//! [`RenderSink`] which cells are lit and when to present a frame, and a
//! [`NoticeSink`] which message to show.

use std::time::Duration;

use super::state::{Cell, Status};

/// How long a notice stays up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeDuration {
    /// Clears itself after the given time
    For(Duration),
    /// Stays until replaced or cleared
    Infinite,
}

pub trait NoticeSink {
    /// Show `message`, replacing whatever was shown before
    fn push(&mut self, message: &str, duration: NoticeDuration);

    fn clear(&mut self);
}

pub trait RenderSink {
    /// Switch every cell back to the idle colour
    fn clear_highlights(&mut self);

    /// Light one cell for the next frame
    fn activate(&mut self, cell: Cell);

    /// Present the lit cells along with the score and speed
    fn render(&mut self, status: Status);
}
