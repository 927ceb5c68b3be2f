//! A 3x5 digit font for 16-bit-wide row displays, and a banner or two.
//!
//! Glyphs are five rows tall and three columns wide. They come pre-shifted
//! into three fixed cells so a three-digit number is drawn by OR-ing one glyph
//! from each table into the same five rows. Bit 15 is the leftmost column.

#![cfg_attr(not(test), no_std)]

/// Five rows of one glyph, top first.
pub type Glyph = [u16; 5];

/// Glyph for a blank cell.
pub const BLANK: Glyph = [0; 5];

/// Digit patterns in the low three bits of each row. Bit 2 is the left
/// column.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

const fn placed(shift: u32) -> [Glyph; 10] {
    let mut out = [BLANK; 10];
    let mut d = 0;
    while d < 10 {
        let mut r = 0;
        while r < 5 {
            out[d][r] = (DIGITS[d][r] as u16) << shift;
            r += 1;
        }
        d += 1;
    }
    out
}

/// Digits in the hundreds cell, columns 13-15.
pub static HUNDREDS: [Glyph; 10] = placed(13);
/// Digits in the tens cell, columns 9-11.
pub static TENS: [Glyph; 10] = placed(9);
/// Digits in the units cell, columns 5-7.
pub static UNITS: [Glyph; 10] = placed(5);

/// "PLAY", spanning all 16 columns.
pub const PLAY: [u16; 5] = [0xE8EA, 0xA8AA, 0xE8E4, 0x88A4, 0x8EA4];

/// Renders `value` (mod 1000) as three glyph cells merged into five rows.
pub fn three_digits(value: u16) -> Glyph {
    let h = HUNDREDS[usize::from(value / 100 % 10)];
    let t = TENS[usize::from(value / 10 % 10)];
    let u = UNITS[usize::from(value % 10)];
    let mut rows = BLANK;
    for i in 0..5 {
        rows[i] = h[i] | t[i] | u[i];
    }
    rows
}
