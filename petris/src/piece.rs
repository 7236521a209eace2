use serde::{Deserialize, Serialize};

/// Index into the renderer's palette
pub type ColorIndex = u8;

/// Side of the square frame every piece lives in
pub const FRAME: usize = 4;

/// Row-major 4x4 frame, indexed `[y][x]`
pub type Grid<T> = [[T; FRAME]; FRAME];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Block(ColorIndex),
    // Answer for coordinates outside the board, never stored in it
    Wall,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_occupied(&self) -> bool {
        !self.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Rotate a frame by 90 degrees about its center.
///
/// The rotation is done over the whole 4x4 frame, not over the tight bounding
/// box of the filled cells, so asymmetric pieces wander inside the frame from
/// one orientation to the next. Four rotations in the same direction always
/// give back the original grid.
pub fn rotate<T: Copy>(grid: &Grid<T>, rotation: Rotation) -> Grid<T> {
    let last = FRAME - 1;
    std::array::from_fn(|row| {
        std::array::from_fn(|col| match rotation {
            // (x, y) -> (3 - y, x)
            Rotation::Clockwise => grid[last - col][row],
            // (x, y) -> (y, 3 - x)
            Rotation::CounterClockwise => grid[col][last - row],
        })
    })
}

/// Topmost frame row holding an occupied cell
pub fn first_occupied_row(cells: &Grid<Cell>) -> Option<usize> {
    cells
        .iter()
        .position(|row| row.iter().any(Cell::is_occupied))
}

/// The falling piece: a colored frame and the board position of its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    cells: Grid<Cell>,
    x: isize,
    y: isize,
}

impl ActivePiece {
    pub fn new(cells: Grid<Cell>, x: isize, y: isize) -> Self {
        Self { cells, x, y }
    }

    /// Paint a boolean shape with a single color
    pub fn from_shape(shape: &Grid<bool>, color: ColorIndex, x: isize, y: isize) -> Self {
        let cells = shape.map(|row| row.map(|filled| if filled { Cell::Block(color) } else { Cell::Empty }));
        Self::new(cells, x, y)
    }

    pub fn cells(&self) -> &Grid<Cell> {
        &self.cells
    }

    pub fn x(&self) -> isize {
        self.x
    }

    pub fn y(&self) -> isize {
        self.y
    }

    pub fn set_cells(&mut self, cells: Grid<Cell>) {
        self.cells = cells;
    }

    pub fn shift(&mut self, dx: isize, dy: isize) {
        self.x += dx;
        self.y += dy;
    }

    /// The frame as it would look after rotating, position unchanged
    pub fn rotated(&self, rotation: Rotation) -> Grid<Cell> {
        rotate(&self.cells, rotation)
    }

    /// Occupied cells in board coordinates
    pub fn blocks(&self) -> impl Iterator<Item = (isize, isize, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(row, line)| {
            line.iter().enumerate().filter_map(move |(col, cell)| {
                cell.is_occupied()
                    .then(|| (self.x + col as isize, self.y + row as isize, *cell))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const L_SHAPE: Grid<bool> = [
        [false, false, false, false],
        [false, false, true, false],
        [true, true, true, false],
        [false, false, false, false],
    ];

    #[test]
    fn test_four_rotations_are_identity() {
        for rotation in [Rotation::Clockwise, Rotation::CounterClockwise] {
            let mut grid = L_SHAPE;
            for _ in 0..4 {
                grid = rotate(&grid, rotation);
            }
            assert_eq!(grid, L_SHAPE);
        }
    }

    #[test]
    fn test_rotations_are_inverse() {
        let there = rotate(&L_SHAPE, Rotation::Clockwise);
        assert_ne!(there, L_SHAPE);
        assert_eq!(rotate(&there, Rotation::CounterClockwise), L_SHAPE);
    }

    #[test]
    fn test_clockwise_turns_bar_vertical() {
        let bar = [
            [false; 4],
            [true; 4],
            [false; 4],
            [false; 4],
        ];
        let rotated = rotate(&bar, Rotation::Clockwise);
        for row in rotated {
            assert_eq!(row, [false, false, true, false]);
        }
        let rotated = rotate(&bar, Rotation::CounterClockwise);
        for row in rotated {
            assert_eq!(row, [false, true, false, false]);
        }
    }

    #[test]
    fn test_fixed_frame_drift() {
        // A 2x2 block sitting top-left of the frame moves to the top-right corner
        let mut block = [[false; 4]; 4];
        block[0][0] = true;
        block[0][1] = true;
        block[1][0] = true;
        block[1][1] = true;
        let rotated = rotate(&block, Rotation::Clockwise);
        assert!(rotated[0][2] && rotated[0][3] && rotated[1][2] && rotated[1][3]);
        assert!(!rotated[0][0]);
    }

    #[test]
    fn test_blocks_in_board_coordinates() {
        let piece = ActivePiece::from_shape(&L_SHAPE, 3, 2, -1);
        let mut blocks: Vec<_> = piece.blocks().map(|(x, y, _)| (x, y)).collect();
        blocks.sort();
        assert_eq!(blocks, vec![(2, 1), (3, 1), (4, 0), (4, 1)]);
        assert!(piece.blocks().all(|(_, _, cell)| cell == Cell::Block(3)));
    }

    #[test]
    fn test_first_occupied_row() {
        let piece = ActivePiece::from_shape(&L_SHAPE, 0, 0, 0);
        assert_eq!(first_occupied_row(piece.cells()), Some(1));
        assert_eq!(first_occupied_row(&[[Cell::Empty; 4]; 4]), None);
    }
}
