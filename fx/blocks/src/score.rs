//! Line clearing, the score, and its on-screen digits.

use font_3x5::Glyph;
use ledmatrix::Frame;

use crate::board::{BOTTOM, FIELD_TOP, FULL, WALLS};

/// Lines cleared this session, plus everything derived from it.
#[derive(Clone, Debug)]
pub struct Score {
    points: u16,
    glyphs: Glyph,
}

impl Default for Score {
    fn default() -> Self {
        Score::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Score::with_points(0)
    }

    pub fn with_points(points: u16) -> Self {
        Score {
            points,
            glyphs: font_3x5::three_digits(points),
        }
    }

    pub fn points(&self) -> u16 {
        self.points
    }

    /// Speeds up the descent; grows by 3 per line and stops at 99.
    pub fn level(&self) -> u16 {
        u16::min(self.points, 33) * 3
    }

    /// Rows 1 to 5 of the overlay.
    pub fn glyphs(&self) -> &Glyph {
        &self.glyphs
    }

    pub fn increment(&mut self) {
        *self = Score::with_points(self.points.wrapping_add(1));
    }

    /// Takes back a point, stopping at zero.
    pub fn decrement(&mut self) {
        *self = Score::with_points(self.points.saturating_sub(1));
    }
}

/// Removes every complete line from `terrain`, dropping the rows above it,
/// and scores one point per line. Returns the number of lines removed.
///
/// After a removal the same index is tested again, since the row that fell
/// into it may also be complete.
pub fn clear_lines(terrain: &mut Frame, score: &mut Score) -> u8 {
    let mut cleared = 0;
    let mut i = BOTTOM;
    while i >= FIELD_TOP {
        if terrain[i] == FULL {
            for j in (FIELD_TOP + 1..=i).rev() {
                terrain[j] = terrain[j - 1];
            }
            terrain[FIELD_TOP] = WALLS;
            score.increment();
            cleared += 1;
        } else {
            i -= 1;
        }
    }
    cleared
}
