use serde::{Deserialize, Serialize};

use crate::piece::{ActivePiece, Cell, Grid};

/// Fixed-size well of placed blocks
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Board {
    // Board width
    cols: usize,
    // Board height
    rows: usize,
    // Row-major cells, only ever Empty or Block
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(cols: usize, rows: usize) -> Self {
        Board {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    fn index(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(y * self.cols + x)
    }

    /// Cell at the given position. Anything outside the board is a wall,
    /// so all four borders, the top included, block a piece.
    pub fn block_at(&self, x: isize, y: isize) -> Cell {
        match self.index(x, y) {
            Some(index) => self.cells[index],
            None => Cell::Wall,
        }
    }

    /// Store a cell; out-of-bounds positions and walls are ignored
    pub fn set_cell(&mut self, x: isize, y: isize, cell: Cell) {
        if cell == Cell::Wall {
            return;
        }
        if let Some(index) = self.index(x, y) {
            self.cells[index] = cell;
        }
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.cols..(y + 1) * self.cols]
    }

    /// Check if a frame at the given origin hits a wall or a placed block
    pub fn overlaps(&self, cells: &Grid<Cell>, x: isize, y: isize) -> bool {
        cells.iter().enumerate().any(|(row, line)| {
            line.iter().enumerate().any(|(col, cell)| {
                cell.is_occupied() && self.block_at(x + col as isize, y + row as isize).is_occupied()
            })
        })
    }

    /// Copy the piece into the board. Cells hanging off the board are dropped.
    pub fn place(&mut self, piece: &ActivePiece) {
        for (x, y, cell) in piece.blocks() {
            self.set_cell(x, y, cell);
        }
    }

    fn row_is_full(&self, y: usize) -> bool {
        self.row(y).iter().all(Cell::is_occupied)
    }

    // Shift every line above `y` down by one, the top line comes back empty
    fn collapse_row(&mut self, y: usize) {
        let cols = self.cols;
        self.cells.copy_within(0..y * cols, cols);
        self.cells[..cols].fill(Cell::Empty);
    }

    /// Remove full lines, scanning from the bottom up. After a collapse the
    /// same row is tested again since new content was shifted into it.
    /// Returns the number of removed lines.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.rows;
        while y > 0 {
            if self.row_is_full(y - 1) {
                self.collapse_row(y - 1);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }
}
