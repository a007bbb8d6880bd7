pub mod canvas;
pub mod notice;
pub mod renderer;

pub use canvas::TerminalCanvas;
pub use notice::NoticeBanner;
pub use renderer::{Renderer, View};
