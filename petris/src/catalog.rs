use crate::piece::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceShape {
    pub name: &'static str,
    pub cells: Grid<bool>,
}

const O: bool = false;
const X: bool = true;

/// The six shapes pieces are drawn from. There is no T piece.
pub const CATALOG: [PieceShape; 6] = [
    PieceShape {
        name: "mirrored L",
        cells: [
            [O, O, O, O],
            [X, X, X, O],
            [O, O, X, O],
            [O, O, O, O],
        ],
    },
    PieceShape {
        name: "L",
        cells: [
            [O, O, O, O],
            [O, O, X, O],
            [X, X, X, O],
            [O, O, O, O],
        ],
    },
    PieceShape {
        name: "bar",
        cells: [
            [O, O, O, O],
            [X, X, X, X],
            [O, O, O, O],
            [O, O, O, O],
        ],
    },
    PieceShape {
        name: "block",
        cells: [
            [O, O, O, O],
            [O, X, X, O],
            [O, X, X, O],
            [O, O, O, O],
        ],
    },
    PieceShape {
        name: "Z",
        cells: [
            [O, O, O, O],
            [X, X, O, O],
            [O, X, X, O],
            [O, O, O, O],
        ],
    },
    PieceShape {
        name: "S",
        cells: [
            [O, O, O, O],
            [O, X, X, O],
            [X, X, O, O],
            [O, O, O, O],
        ],
    },
];
