use rand::Rng;

use crate::catalog::PieceShape;
use crate::piece::{first_occupied_row, rotate, ActivePiece, ColorIndex, Rotation};

/// Horizontal origin that centers the 4-wide frame
pub fn spawn_x(board_width: usize) -> isize {
    board_width as isize / 2 - 2
}

/// Draw the next piece.
///
/// Shape and color are uniform over the catalog and palette. The piece is
/// then turned clockwise 0 to 3 times, uniformly, centered horizontally, and
/// lifted so its first occupied row sits on board row 0. Overlap with the
/// board is left to the caller.
pub fn spawn(
    catalog: &[PieceShape],
    palette_size: usize,
    board_width: usize,
    rng: &mut impl Rng,
) -> ActivePiece {
    let shape = &catalog[rng.random_range(0..catalog.len())];
    let color = rng.random_range(0..palette_size) as ColorIndex;
    let turns = rng.random_range(0..4);

    let mut piece = ActivePiece::from_shape(&shape.cells, color, spawn_x(board_width), 0);
    for _ in 0..turns {
        piece.set_cells(rotate(piece.cells(), Rotation::Clockwise));
    }

    let first_row = first_occupied_row(piece.cells()).unwrap_or(0);
    piece.shift(0, -(first_row as isize));

    tracing::trace!(shape = shape.name, color, turns, "spawned piece");
    piece
}
