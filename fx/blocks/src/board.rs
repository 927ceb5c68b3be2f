//! The two-layer board and the collision and movement engine.
//!
//! Both layers are full 32-row frames so that indices line up with the
//! display. Only rows `FIELD_TOP..ROWS` are ever played on; the rows above
//! belong to the overlay and stay empty in both layers, apart from the
//! separator row in `terrain`.

use core::ops::RangeInclusive;

use ledmatrix::{Frame, Row, ROWS};

use crate::piece::Piece;

/// First playable row.
pub const FIELD_TOP: usize = 8;
/// Solid row between the overlay and the field. Also the ceiling that stops
/// pieces rotating upward out of the field.
pub const SEPARATOR: usize = FIELD_TOP - 1;
/// Last row in the buffer.
pub const BOTTOM: usize = ROWS - 1;

/// An empty playable row: two wall columns on each side.
pub const WALLS: Row = 0xC003;
/// A complete line.
pub const FULL: Row = 0xFFFF;

/// Where new pieces enter.
pub const SPAWN: Anchor = Anchor { x: 8, y: 8 };

/// Reference cell of the active piece. `x` is a bit index, `y` a row index.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Anchor {
    pub x: u8,
    pub y: u8,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Towards bit 15.
    Left,
    /// Towards bit 0.
    Right,
}

#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) terrain: Frame,
    pub(crate) active: Frame,
    pub(crate) anchor: Anchor,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// A board with nothing in either layer, as shown before play and after
    /// game over.
    pub fn new() -> Self {
        Board {
            terrain: [0; ROWS],
            active: [0; ROWS],
            anchor: SPAWN,
        }
    }

    /// Sets up an empty field: walls on every playable row, the separator,
    /// and no active piece.
    pub fn reset(&mut self) {
        for (i, row) in self.terrain.iter_mut().enumerate() {
            *row = match i {
                SEPARATOR => FULL,
                i if i >= FIELD_TOP => WALLS,
                _ => 0,
            };
        }
        self.active = [0; ROWS];
        self.anchor = SPAWN;
    }

    /// Empties both layers.
    pub fn clear(&mut self) {
        *self = Board::new();
    }

    pub fn terrain(&self) -> &Frame {
        &self.terrain
    }

    pub fn active(&self) -> &Frame {
        &self.active
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Checks that no cell is set in both layers.
    pub fn layers_disjoint(&self) -> bool {
        self.terrain
            .iter()
            .zip(self.active.iter())
            .all(|(t, a)| t & a == 0)
    }

    /// Terrain at `row`, treating rows past the bottom as solid.
    pub(crate) fn solid(&self, row: usize) -> Row {
        self.terrain.get(row).copied().unwrap_or(FULL)
    }

    /// Rows that can hold part of the active piece.
    pub(crate) fn footprint(&self) -> RangeInclusive<usize> {
        let y = usize::from(self.anchor.y);
        y.saturating_sub(2)..=usize::min(y + 2, BOTTOM)
    }

    pub fn can_descend(&self) -> bool {
        if self.active[BOTTOM] != 0 {
            return false;
        }
        (SEPARATOR..BOTTOM).all(|i| self.active[i] & self.terrain[i + 1] == 0)
    }

    /// Moves the active piece down one row, if it fits.
    pub fn drop_one(&mut self) -> bool {
        if !self.can_descend() {
            return false;
        }
        for i in (FIELD_TOP..ROWS).rev() {
            self.active[i] = self.active[i - 1];
        }
        self.active[SEPARATOR] = 0;
        self.anchor.y += 1;
        true
    }

    /// Makes the active piece part of the terrain. The active layer keeps its
    /// copy until the next spawn clears it.
    pub(crate) fn lock(&mut self) {
        for i in FIELD_TOP..ROWS {
            self.terrain[i] |= self.active[i];
        }
    }

    pub fn can_shift(&self, dir: Direction) -> bool {
        self.footprint().all(|r| {
            let blocked = match dir {
                Direction::Left => self.terrain[r] >> 1,
                Direction::Right => self.terrain[r] << 1,
            };
            self.active[r] & blocked == 0
        })
    }

    /// Slides the active piece one column, if it fits.
    pub fn shift(&mut self, dir: Direction) -> bool {
        if !self.can_shift(dir) {
            return false;
        }
        for r in self.footprint() {
            match dir {
                Direction::Left => self.active[r] <<= 1,
                Direction::Right => self.active[r] >>= 1,
            }
        }
        match dir {
            Direction::Left => self.anchor.x += 1,
            Direction::Right => self.anchor.x -= 1,
        }
        true
    }

    /// Removes the current piece and, if `piece` fits at the spawn point,
    /// puts it there. Returns `false` without writing the new piece if the
    /// spawn rows are already occupied.
    pub(crate) fn place(&mut self, piece: Piece) -> bool {
        for r in self.footprint() {
            self.active[r] = 0;
        }
        self.anchor = SPAWN;

        let rows = piece.spawn_rows();
        let top = usize::from(SPAWN.y);
        if rows
            .iter()
            .zip(&self.terrain[top..])
            .any(|(p, t)| p & t != 0)
        {
            return false;
        }
        self.active[top..top + rows.len()].copy_from_slice(&rows);
        true
    }
}
