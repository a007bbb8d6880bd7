use crate::game::{Cell, Grid, RenderSink, Status};

/// Frame buffer the engine draws into.
///
/// Highlights accumulate in a back buffer and only become visible when the
/// engine calls `render`, so the terminal never shows a half-built frame.
#[derive(Debug, Clone)]
pub struct TerminalCanvas {
    width: usize,
    height: usize,
    back: Vec<bool>,
    front: Vec<bool>,
    status: Status,
    dirty: bool,
}

impl TerminalCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            back: vec![false; width * height],
            front: vec![false; width * height],
            status: Status::default(),
            dirty: false,
        }
    }

    /// Canvas with one point per grid cell
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.width(), grid.height())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `cell` was lit in the last presented frame
    pub fn is_active(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|idx| self.front[idx])
    }

    /// Score and speed of the last presented frame
    pub fn status(&self) -> Status {
        self.status
    }

    /// True once per presented frame
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let (x, y) = (usize::try_from(cell.x).ok()?, usize::try_from(cell.y).ok()?);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }
}

impl RenderSink for TerminalCanvas {
    fn clear_highlights(&mut self) {
        self.back.fill(false);
    }

    /// Cells outside the canvas are ignored
    fn activate(&mut self, cell: Cell) {
        if let Some(idx) = self.index(cell) {
            self.back[idx] = true;
        }
    }

    fn render(&mut self, status: Status) {
        self.front.copy_from_slice(&self.back);
        self.status = status;
        self.dirty = true;
    }
}
