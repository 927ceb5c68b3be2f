//! Falling-block puzzle game on a 16x32 bit-row display.
//!
//! The board is two stacked layers of 16-bit rows: the settled terrain,
//! including the side walls, and the piece in motion. Every question the game
//! asks (can it fall, can it slide, does it fit after rotating, is the line
//! full) is answered with shifts and masks across whole rows.
//!
//! The top eight rows are an overlay showing the score and the next piece,
//! closed off from the playfield by a solid separator row. [`Game`] owns all
//! of it, advances on [`Game::poll`], and composes a [`Frame`] that the
//! application publishes to the display driver.
//!
//! [`Frame`]: ../ledmatrix/frame/type.Frame.html

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod compose;
pub mod game;
pub mod input;
pub mod piece;
pub mod rotate;
pub mod score;
pub mod tuning;

pub use board::{Anchor, Board, Direction};
pub use game::{Game, Phase, Update};
pub use input::{Button, Buttons};
pub use piece::Piece;
pub use score::Score;
pub use tuning::Tuning;
