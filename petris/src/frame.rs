use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{ActivePiece, Cell};
use crate::session::SessionState;

pub const GAME_OVER_TEXT: &str = "Game Over !";

/// Drawing primitives the game needs from a display
pub trait Renderer {
    /// Paint the empty well
    fn draw_background(&mut self) {}

    /// Paint one cell at pixel position (x, y). Empty cells should draw nothing.
    fn draw_block(&mut self, x: u32, y: u32, cell: Cell);

    /// Overlay shown once the game is over
    fn draw_game_over(&mut self, text: &str);
}

/// What the player sees: placed blocks with the falling piece on top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub cols: usize,
    pub rows: usize,
    pub cells: Vec<Cell>,
    pub score: u64,
    pub level: u64,
    pub state: SessionState,
}

impl Frame {
    pub fn compose(
        board: &Board,
        active: Option<&ActivePiece>,
        score: u64,
        level: u64,
        state: SessionState,
    ) -> Self {
        let mut well = board.clone();
        if let Some(piece) = active {
            well.place(piece);
        }
        let cells = (0..well.rows()).flat_map(|y| well.row(y).to_vec()).collect();
        Frame {
            cols: well.cols(),
            rows: well.rows(),
            cells,
            score,
            level,
            state,
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        if x >= self.cols || y >= self.rows {
            return Cell::Wall;
        }
        self.cells[y * self.cols + x]
    }

    pub fn is_game_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    /// Redraw the whole well through a renderer, one block of `block_size` pixels per cell
    pub fn draw(&self, renderer: &mut impl Renderer, block_size: u32) {
        renderer.draw_background();
        for y in 0..self.rows {
            for x in 0..self.cols {
                renderer.draw_block(x as u32 * block_size, y as u32 * block_size, self.cell(x, y));
            }
        }
        if self.is_game_over() {
            renderer.draw_game_over(GAME_OVER_TEXT);
        }
    }
}
