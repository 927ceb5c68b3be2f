//! Rotation about the anchor.
//!
//! Every piece but I keeps all of its orientations inside the 3x3 box around
//! the anchor, so a quarter turn is a fixed permutation of those nine cells.
//! Cells are numbered row-major, `k = (di + 1) * 3 + (dj + 1)`, and the cell
//! that lands at `k` comes from `SOURCE[k]`. I gets a two-state toggle
//! instead.

use ledmatrix::Row;

use crate::board::Board;
use crate::piece::Piece;

/// Source cell for each destination cell of a quarter turn. Corners trade
/// places with corners and edges with edges; the center stays put.
const SOURCE: [usize; 9] = [2, 5, 8, 1, 4, 7, 0, 3, 6];

fn column(x: usize) -> Row {
    1 << x
}

impl Board {
    /// Rotates the active piece a quarter turn if the result fits. Otherwise
    /// nothing changes.
    pub fn rotate(&mut self, piece: Piece) -> bool {
        match piece {
            Piece::I => self.toggle_bar(),
            _ => self.turn_in_box(),
        }
    }

    fn turn_in_box(&mut self) -> bool {
        let x = usize::from(self.anchor.x);
        let y = usize::from(self.anchor.y);

        let mut cells = [false; 9];
        for (k, cell) in cells.iter_mut().enumerate() {
            let row = self.active.get(y + k / 3 - 1).copied().unwrap_or(0);
            *cell = row & column(x + k % 3 - 1) != 0;
        }

        let mut turned = [false; 9];
        for (k, cell) in turned.iter_mut().enumerate() {
            *cell = cells[SOURCE[k]];
        }

        let collides = turned.iter().enumerate().any(|(k, &set)| {
            set && self.solid(y + k / 3 - 1) & column(x + k % 3 - 1) != 0
        });
        if collides {
            return false;
        }

        for di in 0..3 {
            let mut row = 0;
            for dj in 0..3 {
                if turned[di * 3 + dj] {
                    row |= column(x + dj - 1);
                }
            }
            if let Some(dst) = self.active.get_mut(y + di - 1) {
                *dst = row;
            }
        }
        true
    }

    /// Upright, I fills column `x` from row `y - 1` to `y + 2`. Lying down,
    /// it fills row `y` from column `x - 2` to `x + 1`.
    fn toggle_bar(&mut self) -> bool {
        let x = usize::from(self.anchor.x);
        let y = usize::from(self.anchor.y);

        if self.active[y - 1] == column(x) {
            let lying = 0xF << (x - 2);
            if self.solid(y) & lying != 0 {
                return false;
            }
            for r in y - 1..=y + 2 {
                self.active[r] = 0;
            }
            self.active[y] = lying;
        } else {
            let rows = y - 1..=y + 2;
            if rows.clone().any(|r| self.solid(r) & column(x) != 0) {
                return false;
            }
            for r in rows {
                self.active[r] = column(x);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::fresh;
    use crate::board::{Direction, FULL, WALLS};

    /// A piece three rows into an empty field, away from the ceiling.
    fn lowered(piece: Piece) -> Board {
        let mut board = fresh(piece);
        for _ in 0..3 {
            assert!(board.drop_one());
        }
        board
    }

    #[test]
    fn permutation_is_a_quarter_turn() {
        let mut k = 0;
        for _ in 0..4 {
            k = SOURCE[k];
        }
        assert_eq!(k, 0);
        for start in 0..9 {
            let mut k = start;
            for _ in 0..4 {
                k = SOURCE[k];
            }
            assert_eq!(k, start);
        }
        assert_eq!(SOURCE[4], 4);
    }

    #[test]
    fn t_turns_as_tabulated() {
        let mut board = lowered(Piece::T);
        assert_eq!(board.anchor.y, 11);
        assert_eq!(board.active[11], 0x0380);
        assert_eq!(board.active[12], 0x0100);

        assert!(board.rotate(Piece::T));
        assert_eq!(board.active[10], 0x0100);
        assert_eq!(board.active[11], 0x0300);
        assert_eq!(board.active[12], 0x0100);
        assert!(board.layers_disjoint());
    }

    #[test]
    fn four_turns_restore_every_piece() {
        for &p in Piece::ALL.iter().filter(|&&p| p != Piece::I) {
            let mut board = lowered(p);
            let start = board.active;
            for turn in 0..4 {
                assert!(board.rotate(p), "{:?} turn {}", p, turn);
                assert!(board.layers_disjoint());
            }
            assert_eq!(board.active, start, "{:?}", p);
        }
    }

    #[test]
    fn blocked_turn_changes_nothing() {
        let mut board = lowered(Piece::T);
        // The T's stem would swing up into row 10 at the anchor column.
        board.terrain[10] |= 0x0100;
        let before = board.active;
        assert!(!board.rotate(Piece::T));
        assert_eq!(board.active, before);
    }

    #[test]
    fn ceiling_blocks_turn_at_spawn() {
        // At spawn the box's top row is the separator.
        let mut board = fresh(Piece::T);
        assert_eq!(board.terrain[7], FULL);
        let before = board.active;
        assert!(!board.rotate(Piece::T));
        assert_eq!(board.active, before);
    }

    #[test]
    fn floor_blocks_turn_into_nothing() {
        let mut board = fresh(Piece::T);
        while board.drop_one() {}
        // Stem is on row 31; a turn needs rows 29..=31 only, so it fits.
        assert_eq!(board.anchor.y, 30);
        assert!(board.rotate(Piece::T));

        // Flat on the floor, the box reaches past the buffer.
        let mut board = fresh(Piece::I);
        while board.drop_one() {}
        assert_eq!(board.anchor.y, 31);
        assert!(!board.rotate(Piece::I));
    }

    #[test]
    fn bar_toggles_and_returns() {
        let mut board = lowered(Piece::I);
        let lying = board.active;
        assert_eq!(lying[11], 0x03C0);

        assert!(board.rotate(Piece::I));
        for r in 10..=13 {
            assert_eq!(board.active[r], 0x0100, "row {}", r);
        }
        assert_eq!(board.active[11 + 3], 0);
        assert!(board.layers_disjoint());

        assert!(board.rotate(Piece::I));
        assert_eq!(board.active, lying);
    }

    #[test]
    fn bar_needs_room_to_lie_down() {
        let mut board = lowered(Piece::I);
        assert!(board.rotate(Piece::I));
        // Upright at column 8; lying down would reach columns 6-9.
        while board.shift(Direction::Left) {}
        assert_eq!(board.anchor.x, 13);
        let upright = board.active;
        assert!(!board.rotate(Piece::I));
        assert_eq!(board.active, upright);
        assert_eq!(board.terrain[11], WALLS);
    }
}
