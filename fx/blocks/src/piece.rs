//! The seven tetrominoes.

use rand::distributions::{Distribution, Standard};
use rand::Rng;

use ledmatrix::Row;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Piece {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Piece {
    pub const ALL: [Piece; 7] = [
        Piece::I,
        Piece::J,
        Piece::L,
        Piece::O,
        Piece::S,
        Piece::T,
        Piece::Z,
    ];

    /// Rows 8 and 9 of the active layer for a piece entering at the spawn
    /// anchor (column 8, row 8).
    pub fn spawn_rows(self) -> [Row; 2] {
        match self {
            Piece::I => [0x03C0, 0x0000],
            Piece::J => [0x0380, 0x0080],
            Piece::L => [0x0380, 0x0200],
            Piece::O => [0x0180, 0x0180],
            Piece::S => [0x0180, 0x0300],
            Piece::T => [0x0380, 0x0100],
            Piece::Z => [0x0300, 0x0180],
        }
    }

    /// Rows 3 and 4 of the overlay when this piece is next.
    pub fn preview_rows(self) -> [Row; 2] {
        match self {
            Piece::I => [0x000F, 0x0000],
            Piece::J => [0x000E, 0x0002],
            Piece::L => [0x000E, 0x0008],
            Piece::O => [0x0006, 0x0006],
            Piece::S => [0x0006, 0x000C],
            Piece::T => [0x000E, 0x0004],
            Piece::Z => [0x000C, 0x0006],
        }
    }
}

/// Uniform over the seven pieces.
impl Distribution<Piece> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Piece {
        Piece::ALL[rng.gen_range(0, Piece::ALL.len())]
    }
}
