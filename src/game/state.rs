use super::action::Direction;

/// A cell on the game grid, 0-indexed from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell one unit in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The snake, head at index 0. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Cell>,
}

impl Snake {
    /// Build a snake from its segments, head first.
    ///
    /// Returns `None` for an empty body.
    pub fn from_cells<I, C>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let body: Vec<Cell> = cells.into_iter().map(Into::into).collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    /// The starting snake: four cells along the top row, heading right
    pub fn initial() -> Self {
        Self {
            body: vec![
                Cell::new(3, 0),
                Cell::new(2, 0),
                Cell::new(1, 0),
                Cell::new(0, 0),
            ],
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a snake built through this API
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Turn the snake around: the tail becomes the head
    pub fn reverse(&mut self) {
        self.body.reverse();
    }

    /// Body after advancing one cell in `direction`.
    ///
    /// The new head is prepended and every segment shifts down by one. The
    /// old tail is dropped unless `keep_tail` is set, which is how the snake
    /// grows. Nothing is checked here; the result may overlap itself or
    /// leave the board.
    pub fn advanced(&self, direction: Direction, keep_tail: bool) -> Snake {
        let new_head = self.head().moved_in_direction(direction);
        let kept = if keep_tail {
            self.body.len()
        } else {
            self.body.len() - 1
        };

        let mut body = Vec::with_capacity(kept + 1);
        body.push(new_head);
        body.extend_from_slice(&self.body[..kept]);
        Snake { body }
    }

    /// True when the head shares a cell with any other segment
    pub fn head_hits_body(&self) -> bool {
        let head = self.head();
        self.body[1..].contains(&head)
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::initial()
    }
}

/// Top-level phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingStart,
    Running,
    Dying,
}

/// Input set a phase listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    /// Speed adjustment and the start trigger
    Setup,
    /// Turning the snake
    Steering,
    /// Nothing but quitting
    Locked,
}

impl Phase {
    pub fn controls(&self) -> Controls {
        match self {
            Phase::AwaitingStart => Controls::Setup,
            Phase::Running => Controls::Steering,
            Phase::Dying => Controls::Locked,
        }
    }
}

/// Why a running game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the board
    Wall,
    /// Head landed on the snake's own body
    SelfCollision,
}

/// Values shown next to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    pub score: u32,
    pub speed: u8,
}

/// The single owned state record of a session.
///
/// Input handlers and the tick routine both reach it through `&mut` on the
/// engine; everything runs on one thread, one call at a time, so there is
/// no locking anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub snake: Snake,
    pub direction: Direction,
    pub rabbit: Cell,
    pub score: u32,
    pub speed: u8,
    pub phase: Phase,
}

impl GameState {
    /// Fresh session state keeping only `speed` from before
    pub fn new(speed: u8) -> Self {
        Self {
            snake: Snake::initial(),
            direction: Direction::Right,
            rabbit: Cell::new(0, 0),
            score: 0,
            speed,
            phase: Phase::AwaitingStart,
        }
    }

    pub fn status(&self) -> Status {
        Status {
            score: self.score,
            speed: self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::from_cells(cells.iter().copied()).unwrap()
    }

    #[test]
    fn test_cell_movement() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.moved_by(1, 0), Cell::new(6, 5));
        assert_eq!(cell.moved_by(-1, 0), Cell::new(4, 5));
        assert_eq!(cell.moved_in_direction(Direction::Down), Cell::new(5, 6));
        assert_eq!(cell.moved_in_direction(Direction::Up), Cell::new(5, 4));
    }

    #[test]
    fn test_initial_snake() {
        let snake = Snake::initial();
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Cell::new(3, 0));
        assert_eq!(snake.tail(), Cell::new(0, 0));
    }

    #[test]
    fn test_empty_snake_rejected() {
        assert!(Snake::from_cells(Vec::<Cell>::new()).is_none());
    }

    #[test]
    fn test_advance_drops_tail() {
        let moved = Snake::initial().advanced(Direction::Right, false);
        assert_eq!(moved, snake(&[(4, 0), (3, 0), (2, 0), (1, 0)]));
    }

    #[test]
    fn test_advance_keeps_tail_when_growing() {
        let moved = Snake::initial().advanced(Direction::Right, true);
        assert_eq!(moved, snake(&[(4, 0), (3, 0), (2, 0), (1, 0), (0, 0)]));
    }

    #[test]
    fn test_single_cell_snake_advances() {
        let moved = snake(&[(2, 2)]).advanced(Direction::Up, false);
        assert_eq!(moved, snake(&[(2, 1)]));
    }

    #[test]
    fn test_reverse() {
        let mut s = Snake::initial();
        s.reverse();
        assert_eq!(s.head(), Cell::new(0, 0));
        assert_eq!(s.tail(), Cell::new(3, 0));
    }

    #[test]
    fn test_head_hits_body() {
        assert!(!Snake::initial().head_hits_body());
        assert!(snake(&[(1, 1), (1, 2), (2, 2), (2, 1), (1, 1)]).head_hits_body());
    }

    #[test]
    fn test_phase_controls() {
        assert_eq!(Phase::AwaitingStart.controls(), Controls::Setup);
        assert_eq!(Phase::Running.controls(), Controls::Steering);
        assert_eq!(Phase::Dying.controls(), Controls::Locked);
    }

    #[test]
    fn test_new_state_keeps_speed() {
        let state = GameState::new(7);
        assert_eq!(state.speed, 7);
        assert_eq!(state.score, 0);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.phase, Phase::AwaitingStart);
        assert_eq!(state.snake, Snake::initial());
    }
}
