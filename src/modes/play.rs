use std::io::{Stderr, stderr};
use std::pin::Pin;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tokio::time::{Sleep, interval, sleep};

use crate::game::{Fired, GameConfig, GameEngine, Geometry, Grid, Input, StepInfo};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::{NoticeBanner, Renderer, TerminalCanvas, View};

/// The engine's pending timer as a live tokio sleep
struct ArmedTimer {
    token: u64,
    sleep: Pin<Box<Sleep>>,
}

/// Interactive terminal game.
///
/// Owns the engine and feeds it from a single `select!` loop: key presses
/// and timer expiries are handled one at a time, each to completion, so the
/// engine never sees two callers at once.
pub struct PlayMode {
    engine: GameEngine<NoticeBanner, TerminalCanvas>,
    geometry: Geometry,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    /// Build a game whose board fits a `width` x `height` surface
    pub fn new(config: GameConfig, width: u16, height: u16) -> Result<Self> {
        let geometry = Geometry::fit(width, height, config.pitch_x(), config.pitch_y())
            .context("Board does not fit the terminal")?;
        let grid = Grid::from_geometry(&geometry);
        let canvas = TerminalCanvas::for_grid(&grid);
        let engine = GameEngine::new(config, grid, NoticeBanner::new(), canvas);
        let renderer = Renderer::new(engine.config());

        Ok(Self {
            engine,
            geometry,
            stats: SessionStats::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    /// Board surface available in the current terminal
    pub fn terminal_surface() -> Result<(u16, u16)> {
        let (width, height) =
            crossterm::terminal::size().context("Failed to query terminal size")?;
        let surface = Renderer::board_surface(Rect::new(0, 0, width, height));
        Ok((surface.width, surface.height))
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut armed: Option<ArmedTimer> = None;

        // Redraw at 30 FPS for the clock and expiring notices
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            self.sync_timer(&mut armed);

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event)?,
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Engine timer: tick or blink step
                token = wait_for(&mut armed) => {
                    armed = None;
                    self.fire(token);
                }

                // Redraw frame
                _ = render_timer.tick() => {
                    self.stats.update();
                    self.engine.notices_mut().expire(Instant::now());
                    self.draw(terminal)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            // Present freshly committed state without waiting for the redraw tick
            if self.engine.renderer_mut().take_dirty() {
                self.draw(terminal)?;
            }

            if self.should_quit {
                info!("Quitting");
                break;
            }
        }

        Ok(())
    }

    /// Re-arm the sleep whenever the engine scheduled or cancelled a timer
    fn sync_timer(&self, armed: &mut Option<ArmedTimer>) {
        match self.engine.pending_timer() {
            Some(timer) if armed.as_ref().map(|a| a.token) != Some(timer.token) => {
                *armed = Some(ArmedTimer {
                    token: timer.token,
                    sleep: Box::pin(sleep(timer.delay)),
                });
            }
            Some(_) => {}
            None => *armed = None,
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self
                .input_handler
                .handle_key_event(key, self.engine.controls())
            {
                KeyAction::GameInput(input) => {
                    if self.engine.handle(input) && input == Input::Start {
                        self.stats.on_game_start();
                    }
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }

        Ok(())
    }

    fn fire(&mut self, token: u64) {
        if let Fired::Tick(StepInfo {
            collision: Some(_), ..
        }) = self.engine.fire(token)
        {
            self.stats.on_game_over(self.engine.state().score);
        }
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let view = View {
            canvas: self.engine.renderer(),
            geometry: &self.geometry,
            notice: self.engine.notices().message(),
            stats: &self.stats,
            controls: self.engine.controls(),
        };
        terminal
            .draw(|frame| self.renderer.render(frame, &view))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

async fn wait_for(armed: &mut Option<ArmedTimer>) -> u64 {
    match armed {
        Some(timer) => {
            timer.sleep.as_mut().await;
            timer.token
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GridError, Phase, TimerKind};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> PlayMode {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        PlayMode::new(config, 40, 20).unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.engine.grid().bounds(), (19, 19));
        assert_eq!(mode.engine.phase(), Phase::AwaitingStart);
        assert_eq!(mode.engine.state().score, 0);
        assert!(mode.engine.notices().message().is_some());
    }

    #[test]
    fn test_surface_too_small() {
        assert!(PlayMode::new(GameConfig::default(), 1, 1).is_err());
    }

    #[test]
    fn test_surface_narrower_than_snake() {
        let err = PlayMode::new(GameConfig::default(), 6, 20).err().unwrap();
        assert_eq!(
            err.downcast_ref::<GridError>(),
            Some(&GridError::TooSmallForSnake {
                columns: 3,
                rows: 20
            })
        );
    }

    #[test]
    fn test_keys_drive_engine() {
        let mut mode = mode();
        mode.handle_event(press(KeyCode::Up)).unwrap();
        assert_eq!(mode.engine.state().speed, 2);

        mode.handle_event(press(KeyCode::Char(' '))).unwrap();
        assert_eq!(mode.engine.phase(), Phase::Running);
        assert!(mode.stats.run_started.is_some());

        mode.handle_event(press(KeyCode::Down)).unwrap();
        assert_eq!(mode.engine.state().speed, 2);
        assert_eq!(mode.engine.state().direction, crate::game::Direction::Down);

        mode.handle_event(press(KeyCode::Char('q'))).unwrap();
        assert!(mode.should_quit);
    }

    #[test]
    fn test_death_updates_stats() {
        let mut mode = mode();
        mode.engine.state_mut().score = 300;
        mode.handle_event(press(KeyCode::Char(' '))).unwrap();
        mode.handle_event(press(KeyCode::Up)).unwrap();

        let timer = mode.engine.pending_timer().unwrap();
        assert_eq!(timer.kind, TimerKind::Tick);
        mode.fire(timer.token);

        assert_eq!(mode.engine.phase(), Phase::Dying);
        assert_eq!(mode.stats.games_played, 1);
        assert_eq!(mode.stats.best_score, 300);
    }

    #[tokio::test]
    async fn test_sync_timer_tracks_engine() {
        let mut mode = mode();
        let mut armed = None;
        mode.sync_timer(&mut armed);
        assert!(armed.is_none());

        mode.handle_event(press(KeyCode::Char(' '))).unwrap();
        mode.sync_timer(&mut armed);
        let token = armed.as_ref().unwrap().token;
        assert_eq!(Some(token), mode.engine.pending_timer().map(|t| t.token));

        assert_eq!(wait_for(&mut armed).await, token);
    }
}
