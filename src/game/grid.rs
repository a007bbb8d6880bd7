use thiserror::Error;

use super::state::{Cell, Snake};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell pitch along {axis} must be positive")]
    ZeroPitch { axis: &'static str },
    #[error("surface {extent} is too small along {axis} for a cell of pitch {pitch}")]
    SurfaceTooSmall {
        axis: &'static str,
        extent: u16,
        pitch: u16,
    },
    #[error("a {columns}x{rows} board cannot hold the starting snake")]
    TooSmallForSnake { columns: i32, rows: i32 },
}

/// Size of one drawn point plus the gap after it, along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPitch {
    pub point: u16,
    pub spacing: u16,
}

impl CellPitch {
    pub fn new(point: u16, spacing: u16) -> Self {
        Self { point, spacing }
    }

    pub fn step(&self) -> u16 {
        self.point + self.spacing
    }
}

/// Where the board sits on its drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub max_x: i32,
    pub max_y: i32,
    pub offset_x: u16,
    pub offset_y: u16,
    pub pitch_x: CellPitch,
    pub pitch_y: CellPitch,
}

impl Geometry {
    /// Fit as many cells as the surface allows and center them.
    ///
    /// Fails when the resulting board cannot hold [`Snake::initial`].
    pub fn fit(
        width: u16,
        height: u16,
        pitch_x: CellPitch,
        pitch_y: CellPitch,
    ) -> Result<Self, GridError> {
        let (max_x, offset_x) = fit_axis("x", width, pitch_x)?;
        let (max_y, offset_y) = fit_axis("y", height, pitch_y)?;

        let start = Snake::initial();
        if start.cells().iter().any(|cell| cell.x > max_x || cell.y > max_y) {
            return Err(GridError::TooSmallForSnake {
                columns: max_x + 1,
                rows: max_y + 1,
            });
        }

        Ok(Self {
            max_x,
            max_y,
            offset_x,
            offset_y,
            pitch_x,
            pitch_y,
        })
    }

    /// Surface position of the top-left corner of a cell
    pub fn origin_of(&self, cell: Cell) -> (u16, u16) {
        (
            self.offset_x + self.pitch_x.step() * cell.x as u16,
            self.offset_y + self.pitch_y.step() * cell.y as u16,
        )
    }
}

fn fit_axis(axis: &'static str, extent: u16, pitch: CellPitch) -> Result<(i32, u16), GridError> {
    let step = pitch.step();
    if pitch.point == 0 || step == 0 {
        return Err(GridError::ZeroPitch { axis });
    }
    if extent < step {
        return Err(GridError::SurfaceTooSmall {
            axis,
            extent,
            pitch: step,
        });
    }

    let max = (extent - step) / step;
    let offset = (extent - (max * step + pitch.point)) / 2;
    Ok((i32::from(max), offset))
}

/// Board bounds plus the per-frame occupancy matrix.
///
/// Bounds are inclusive: valid cells are `[0, max_x] x [0, max_y]`. They are
/// fixed at construction. The matrix is indexed `[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    max_x: i32,
    max_y: i32,
    matrix: Vec<Vec<bool>>,
}

impl Grid {
    pub fn new(max_x: i32, max_y: i32) -> Self {
        assert!(max_x >= 0 && max_y >= 0, "grid needs at least one cell");
        Self {
            max_x,
            max_y,
            matrix: vec![vec![false; max_x as usize + 1]; max_y as usize + 1],
        }
    }

    pub fn from_geometry(geometry: &Geometry) -> Self {
        Self::new(geometry.max_x, geometry.max_y)
    }

    /// Inclusive upper bounds `(max_x, max_y)`
    pub fn bounds(&self) -> (i32, i32) {
        (self.max_x, self.max_y)
    }

    pub fn width(&self) -> usize {
        self.max_x as usize + 1
    }

    pub fn height(&self) -> usize {
        self.max_y as usize + 1
    }

    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..=self.max_x).contains(&cell.x) && (0..=self.max_y).contains(&cell.y)
    }

    /// Mark every cell unoccupied
    pub fn clear(&mut self) {
        for row in &mut self.matrix {
            row.fill(false);
        }
    }

    /// Mark one cell occupied. The caller guarantees it is in bounds.
    pub fn mark(&mut self, cell: Cell) {
        debug_assert!(self.contains(cell), "{cell:?} is outside the grid");
        self.matrix[cell.y as usize][cell.x as usize] = true;
    }

    /// Mark many cells occupied
    pub fn mark_occupied<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Cell>,
    {
        for cell in cells {
            self.mark(cell);
        }
    }

    /// Every cell with its occupancy, row by row
    pub fn cells(&self) -> impl Iterator<Item = (Cell, bool)> + '_ {
        self.matrix.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &occupied)| (Cell::new(x as i32, y as i32), occupied))
        })
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells()
            .filter_map(|(cell, occupied)| occupied.then_some(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4, 2);
        assert_eq!(grid.bounds(), (4, 2));
        assert_eq!(grid.cell_count(), 15);
        assert_eq!(grid.occupied_cells().count(), 0);
    }

    #[test]
    fn test_mark_and_clear() {
        let mut grid = Grid::new(3, 3);
        grid.mark(Cell::new(1, 2));
        grid.mark_occupied([Cell::new(0, 0), Cell::new(3, 3)]);

        let occupied: Vec<Cell> = grid.occupied_cells().collect();
        assert_eq!(
            occupied,
            vec![Cell::new(0, 0), Cell::new(1, 2), Cell::new(3, 3)]
        );

        grid.clear();
        assert_eq!(grid.occupied_cells().count(), 0);
    }

    #[test]
    fn test_cells_are_row_major() {
        let grid = Grid::new(1, 1);
        let cells: Vec<Cell> = grid.cells().map(|(cell, _)| cell).collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let grid = Grid::new(9, 4);
        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(9, 4)));
        assert!(!grid.contains(Cell::new(10, 4)));
        assert!(!grid.contains(Cell::new(9, 5)));
        assert!(!grid.contains(Cell::new(-1, 0)));
    }

    #[test]
    fn test_geometry_fit() {
        // 200px wide with 8px points and 1px gaps: 22 cells, 197px drawn
        let pitch = CellPitch::new(8, 1);
        let geometry = Geometry::fit(200, 100, pitch, pitch).unwrap();
        assert_eq!(geometry.max_x, 21);
        assert_eq!(geometry.offset_x, 1);
        assert_eq!(geometry.max_y, 10);
        assert_eq!(geometry.offset_y, 1);
        assert_eq!(geometry.origin_of(Cell::new(1, 1)), (10, 10));
    }

    #[test]
    fn test_geometry_terminal_pitch() {
        let geometry =
            Geometry::fit(40, 20, CellPitch::new(1, 1), CellPitch::new(1, 0)).unwrap();
        assert_eq!(geometry.max_x, 19);
        assert_eq!(geometry.max_y, 19);
        assert_eq!(geometry.offset_x, 0);
        assert_eq!(geometry.offset_y, 0);
    }

    #[test]
    fn test_geometry_rejects_tiny_surface() {
        let err = Geometry::fit(1, 20, CellPitch::new(1, 1), CellPitch::new(1, 0)).unwrap_err();
        assert_eq!(
            err,
            GridError::SurfaceTooSmall {
                axis: "x",
                extent: 1,
                pitch: 2
            }
        );
    }

    #[test]
    fn test_geometry_rejects_board_narrower_than_snake() {
        // 6 columns at pitch 2 leave 3 cells, one short of the starting snake
        let err = Geometry::fit(6, 20, CellPitch::new(1, 1), CellPitch::new(1, 0)).unwrap_err();
        assert_eq!(
            err,
            GridError::TooSmallForSnake {
                columns: 3,
                rows: 20
            }
        );

        let geometry =
            Geometry::fit(8, 1, CellPitch::new(1, 1), CellPitch::new(1, 0)).unwrap();
        assert_eq!(geometry.max_x, 3);
        assert_eq!(geometry.max_y, 0);
    }

    #[test]
    fn test_geometry_rejects_zero_pitch() {
        let err = Geometry::fit(10, 10, CellPitch::new(0, 0), CellPitch::new(1, 0)).unwrap_err();
        assert_eq!(err, GridError::ZeroPitch { axis: "x" });
    }
}
