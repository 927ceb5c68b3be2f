//! Building the displayed frame from the board and overlay.

use font_3x5::Glyph;
use ledmatrix::{Frame, Row};

use crate::board::Board;

/// First overlay row of the next-piece preview.
pub const PREVIEW_TOP: usize = 3;
/// First overlay row of the score digits.
pub const SCORE_TOP: usize = 1;

/// Overwrites `frame` with both board layers, then ORs in the preview and
/// score. Depends on nothing but its inputs, so recomposing is always safe.
pub fn compose(
    board: &Board,
    preview: &[Row; 2],
    score: &Glyph,
    frame: &mut Frame,
) {
    let layers = board.terrain().iter().zip(board.active().iter());
    for (dst, (t, a)) in frame.iter_mut().zip(layers) {
        *dst = t | a;
    }
    for (dst, p) in frame[PREVIEW_TOP..].iter_mut().zip(preview.iter()) {
        *dst |= p;
    }
    for (dst, g) in frame[SCORE_TOP..].iter_mut().zip(score.iter()) {
        *dst |= g;
    }
}
