use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    action::{Direction, Input},
    config::{GameConfig, SPEED_RANGE},
    grid::Grid,
    sink::{NoticeDuration, NoticeSink, RenderSink},
    state::{Cell, CollisionType, Controls, GameState, Phase, Snake},
};

pub const SETUP_NOTICE: &str = "Set the speed with ↑ or ↓ and start the game with Space.";
pub const CONTROLS_NOTICE: &str = "Press ←, ↑, → or ↓ to control the snake.";
pub const DEATH_NOTICE: &str = "Ouch!";

/// Scores that earn a short congratulation
const MILESTONES: [(u32, &str); 4] = [
    (100, "Not bad!"),
    (1000, "Woah!"),
    (5000, "Unreal!"),
    (10000, "You are fantastic!"),
];

/// What a deferred callback does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Advance the snake one cell
    Tick,
    /// One step of the death blink; the step after the last one restarts
    Blink(u8),
}

/// The single pending deferred callback.
///
/// The driver waits `delay` and hands `token` back to [`GameEngine::fire`].
/// Every schedule or cancel bumps the token, so a timer the engine has moved
/// past is recognised and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub kind: TimerKind,
    pub delay: Duration,
    pub token: u64,
}

/// Information about a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepInfo {
    /// Whether the head landed on the rabbit
    pub ate_rabbit: bool,
    /// Set when the tick killed the snake
    pub collision: Option<CollisionType>,
}

/// What [`GameEngine::fire`] ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    /// Token did not match the pending timer
    Stale,
    Tick(StepInfo),
    Blink(u8),
    /// The blink sequence finished and a fresh game awaits start
    Restarted,
}

/// The game state machine.
///
/// `AwaitingStart -> Running -> Dying -> AwaitingStart`. Input goes through
/// [`handle`](Self::handle), time through [`fire`](Self::fire). Both run to
/// completion on the caller's thread and are never interleaved, which is the
/// only thing keeping the shared state consistent. Do not hand the engine to
/// another thread mid-session.
pub struct GameEngine<N: NoticeSink, R: RenderSink> {
    config: GameConfig,
    grid: Grid,
    state: GameState,
    rng: StdRng,
    notices: N,
    renderer: R,
    pending: Option<Timer>,
    next_token: u64,
}

impl<N: NoticeSink, R: RenderSink> GameEngine<N, R> {
    /// Create an engine over a fixed grid and start the first session.
    ///
    /// `grid` must be large enough for [`Snake::initial`]; boards built
    /// through [`Geometry::fit`](super::Geometry::fit) always are.
    pub fn new(config: GameConfig, grid: Grid, notices: N, renderer: R) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (max_x, max_y) = grid.bounds();
        info!("Grid is {}x{} cells", max_x + 1, max_y + 1);

        let mut engine = Self {
            state: GameState::new(config.initial_speed),
            config,
            grid,
            rng,
            notices,
            renderer,
            pending: None,
            next_token: 0,
        };
        engine.init();
        engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access to the state record, for setting up test scenarios
    /// only.
    ///
    /// Writes here bypass every rule the engine enforces: nothing stops a
    /// caller from putting the rabbit on the snake or changing the phase
    /// without running its enter and exit actions.
    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Input set the current phase listens to
    pub fn controls(&self) -> Controls {
        self.state.phase.controls()
    }

    pub fn pending_timer(&self) -> Option<Timer> {
        self.pending
    }

    pub fn notices(&self) -> &N {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut N {
        &mut self.notices
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Apply one input event. Returns false when the current phase ignores it.
    pub fn handle(&mut self, input: Input) -> bool {
        match (self.state.phase, input) {
            (Phase::AwaitingStart, Input::SpeedUp) => self.adjust_speed(1),
            (Phase::AwaitingStart, Input::SpeedDown) => self.adjust_speed(-1),
            (Phase::AwaitingStart, Input::Start) => {
                self.transition(Phase::Running);
                true
            }
            (Phase::Running, Input::Turn(direction)) => {
                self.turn(direction);
                true
            }
            _ => false,
        }
    }

    /// Run the pending timer if `token` still names it
    pub fn fire(&mut self, token: u64) -> Fired {
        let timer = match self.pending {
            Some(timer) if timer.token == token => timer,
            _ => {
                debug!("Ignoring stale timer {}", token);
                return Fired::Stale;
            }
        };
        self.pending = None;

        match timer.kind {
            TimerKind::Tick => Fired::Tick(self.tick()),
            TimerKind::Blink(step) if step >= self.config.blink_steps => {
                self.transition(Phase::AwaitingStart);
                Fired::Restarted
            }
            TimerKind::Blink(step) => {
                self.blink(step);
                Fired::Blink(step)
            }
        }
    }

    /// Reset the session, keeping the speed, and wait for the start trigger
    fn init(&mut self) {
        self.cancel_timer();
        self.state = GameState::new(self.state.speed);
        self.place_rabbit();
        self.render();
        self.notices.push(SETUP_NOTICE, NoticeDuration::Infinite);
    }

    fn transition(&mut self, to: Phase) {
        let from = self.state.phase;
        info!("Phase {:?} -> {:?}", from, to);

        // Leaving a phase drops whatever it had scheduled
        self.cancel_timer();
        self.state.phase = to;

        match to {
            Phase::AwaitingStart => self.init(),
            Phase::Running => {
                self.notices.push(CONTROLS_NOTICE, NoticeDuration::Infinite);
                self.schedule(TimerKind::Tick, Duration::ZERO);
            }
            Phase::Dying => {
                self.notices.push(DEATH_NOTICE, NoticeDuration::Infinite);
                self.schedule(TimerKind::Blink(0), self.config.blink_interval());
            }
        }
    }

    fn adjust_speed(&mut self, delta: i8) -> bool {
        let next = i16::from(self.state.speed) + i16::from(delta);
        match u8::try_from(next) {
            Ok(speed) if SPEED_RANGE.contains(&speed) => {
                self.state.speed = speed;
                self.render();
                true
            }
            _ => false,
        }
    }

    /// A 180-degree turn flips the snake so the old tail leads
    fn turn(&mut self, direction: Direction) {
        if self.state.direction.is_opposite(direction) {
            self.state.snake.reverse();
        }
        self.state.direction = direction;
    }

    /// Advance the snake one cell and schedule the next tick
    fn tick(&mut self) -> StepInfo {
        let new_head = self.state.snake.head().moved_in_direction(self.state.direction);
        let ate_rabbit = new_head == self.state.rabbit;
        if ate_rabbit {
            self.eat_rabbit();
        }

        let moved = self.state.snake.advanced(self.state.direction, ate_rabbit);

        let collision = if moved.head_hits_body() {
            Some(CollisionType::SelfCollision)
        } else if !self.grid.contains(new_head) {
            Some(CollisionType::Wall)
        } else {
            None
        };

        if let Some(cause) = collision {
            info!(
                "Snake died ({:?}) at {:?} with score {}",
                cause, new_head, self.state.score
            );
            self.transition(Phase::Dying);
            return StepInfo {
                ate_rabbit,
                collision,
            };
        }

        self.state.snake = moved;
        if ate_rabbit {
            self.place_rabbit();
        }
        self.render();
        self.schedule(TimerKind::Tick, self.config.frame_time(self.state.speed));

        StepInfo {
            ate_rabbit,
            collision: None,
        }
    }

    fn eat_rabbit(&mut self) {
        self.state.score += self.config.rabbit_reward;
        let score = self.state.score;
        debug!("Rabbit eaten, score {}", score);

        if let Some((_, message)) = MILESTONES.iter().find(|(at, _)| *at == score) {
            self.notices
                .push(message, NoticeDuration::For(self.config.short_notice()));
        }

        if score % self.config.speed_up_every == 0 && self.state.speed < *SPEED_RANGE.end() {
            self.state.speed += 1;
            info!("Speed up to {} at score {}", self.state.speed, score);
        }
    }

    fn place_rabbit(&mut self) {
        match find_free_cell(&mut self.rng, &self.grid, &self.state.snake) {
            Some(cell) => self.state.rabbit = cell,
            None => warn!("No free cell left for the rabbit"),
        }
    }

    /// Even steps show an empty board, odd steps the final position
    fn blink(&mut self, step: u8) {
        if step % 2 == 0 {
            self.render_blank();
        } else {
            self.render();
        }
        self.schedule(TimerKind::Blink(step + 1), self.config.blink_interval());
    }

    fn render(&mut self) {
        self.grid.clear();
        self.grid.mark(self.state.rabbit);
        self.grid.mark_occupied(self.state.snake.cells().iter().copied());

        self.renderer.clear_highlights();
        for cell in self.grid.occupied_cells() {
            self.renderer.activate(cell);
        }
        self.renderer.render(self.state.status());
    }

    fn render_blank(&mut self) {
        self.grid.clear();
        self.renderer.clear_highlights();
        self.renderer.render(self.state.status());
    }

    fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        self.next_token += 1;
        self.pending = Some(Timer {
            kind,
            delay,
            token: self.next_token,
        });
    }

    fn cancel_timer(&mut self) {
        if self.pending.take().is_some() {
            self.next_token += 1;
        }
    }
}

/// Pick a uniformly random cell of `grid` not covered by `snake`.
///
/// Random draws are retried a bounded number of times; after that the free
/// cells are enumerated and one is chosen among them. `None` only when the
/// snake covers the whole board.
pub fn find_free_cell<G: Rng>(rng: &mut G, grid: &Grid, snake: &Snake) -> Option<Cell> {
    let (max_x, max_y) = grid.bounds();
    let attempts = grid.cell_count() * 4;

    for _ in 0..attempts {
        let cell = Cell::new(rng.gen_range(0..=max_x), rng.gen_range(0..=max_y));
        if !snake.contains(cell) {
            return Some(cell);
        }
    }

    warn!("Random placement failed {} times, scanning for free cells", attempts);
    let free: Vec<Cell> = grid
        .cells()
        .map(|(cell, _)| cell)
        .filter(|cell| !snake.contains(*cell))
        .collect();
    free.choose(rng).copied()
}
