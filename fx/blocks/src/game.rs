//! The game: title screen, play, and the game-over sequence.
//!
//! Nothing here blocks. The application calls [`Game::poll`] whenever the
//! tick clock moves, passing the current instant and the held buttons; every
//! wait is a comparison between that instant and a mark the game recorded
//! earlier.

use rand::{Rng, RngCore};

use ledmatrix::{Frame, Instant, Row, ROWS};

use crate::board::{Board, Direction, FULL};
use crate::compose::compose;
use crate::input::{Button, Buttons};
use crate::piece::Piece;
use crate::score::{clear_lines, Score};
use crate::tuning::Tuning;

/// Banner shown on the title screen, starting at this row.
pub const BANNER_TOP: usize = 14;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Showing the banner until Rotate is pressed.
    Title,
    /// Start pressed; waiting out the start delay.
    Starting,
    Playing,
    /// Blinking the whole display.
    GameOver,
    /// Final score on screen. Stays here until reset.
    Halted,
}

/// What a call to [`Game::poll`] did.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Update {
    /// The frame changed and should be published.
    pub redraw: bool,
    /// Lines cleared by pieces locking during this poll.
    pub cleared: u8,
    /// Phase entered during this poll, if any.
    pub entered: Option<Phase>,
}

pub struct Game<R> {
    rng: R,
    tuning: Tuning,
    phase: Phase,

    board: Board,
    current: Piece,
    next: Piece,
    preview: [Row; 2],
    score: Score,
    frame: Frame,

    /// Last automatic descent.
    fall_mark: Instant,
    /// Last accepted button, and the reference for phase timers.
    input_mark: Instant,
    /// Game-over blink steps completed.
    blink_step: u8,
}

impl<R: RngCore> Game<R> {
    /// Creates a game on its title screen. Pieces are drawn from `rng`.
    pub fn new(rng: R, tuning: Tuning) -> Self {
        let mut frame = [0; ROWS];
        frame[BANNER_TOP..BANNER_TOP + font_3x5::PLAY.len()]
            .copy_from_slice(&font_3x5::PLAY);
        Game {
            rng,
            tuning,
            phase: Phase::Title,
            board: Board::new(),
            current: Piece::I,
            next: Piece::I,
            preview: [0; 2],
            score: Score::new(),
            frame,
            fall_mark: Instant::from_ticks(0),
            input_mark: Instant::from_ticks(0),
            blink_step: 0,
        }
    }

    /// Replaces the piece source. Firmware uses this to seed from entropy
    /// gathered at the start press, before the first piece is drawn.
    pub fn reseed(&mut self, rng: R) {
        self.rng = rng;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn current(&self) -> Piece {
        self.current
    }

    pub fn next(&self) -> Piece {
        self.next
    }

    /// Advances the game to `now`, acting on `held`.
    pub fn poll(&mut self, now: Instant, held: Buttons) -> Update {
        let mut update = Update::default();
        match self.phase {
            Phase::Title => {
                if held.contains(Button::Rotate) {
                    self.input_mark = now;
                    self.enter(Phase::Starting, &mut update);
                }
            }
            Phase::Starting => {
                if now.ticks_since(self.input_mark) >= self.tuning.start_delay {
                    self.begin(now, &mut update);
                }
            }
            Phase::Playing => self.play(now, held, &mut update),
            Phase::GameOver => self.blink(now, &mut update),
            Phase::Halted => (),
        }
        update
    }

    fn enter(&mut self, phase: Phase, update: &mut Update) {
        self.phase = phase;
        update.entered = Some(phase);
    }

    fn begin(&mut self, now: Instant, update: &mut Update) {
        self.board.reset();
        self.score = Score::new();
        self.next = self.rng.gen();
        self.fall_mark = now;
        self.input_mark = now;
        self.enter(Phase::Playing, update);
        self.spawn(now, update);
    }

    fn play(&mut self, now: Instant, held: Buttons, update: &mut Update) {
        let level = self.score.level();

        if now.ticks_since(self.fall_mark) > self.tuning.descent_period(level) {
            self.fall_mark = now;
            self.descend(now, update);
        }
        if self.phase != Phase::Playing {
            return;
        }

        if now.ticks_since(self.input_mark) > self.tuning.input_window(level) {
            if let Some(button) = held.first() {
                self.input_mark = now;
                match button {
                    Button::Left => self.slide(Direction::Left, update),
                    Button::Down => self.descend(now, update),
                    Button::Right => self.slide(Direction::Right, update),
                    Button::Rotate => {
                        if self.board.rotate(self.current) {
                            self.redraw(update);
                        }
                    }
                }
            }
        }
    }

    fn slide(&mut self, dir: Direction, update: &mut Update) {
        if self.board.shift(dir) {
            self.redraw(update);
        }
    }

    /// Moves the piece down a row, or locks it, clears lines, and spawns the
    /// next one.
    pub(crate) fn descend(&mut self, now: Instant, update: &mut Update) {
        if self.board.drop_one() {
            self.redraw(update);
            return;
        }
        self.board.lock();
        let cleared = clear_lines(&mut self.board.terrain, &mut self.score);
        update.cleared += cleared;
        self.spawn(now, update);
    }

    /// Brings in the next piece, or ends the game if there is no room.
    pub(crate) fn spawn(&mut self, now: Instant, update: &mut Update) {
        self.current = self.next;
        self.next = self.rng.gen();
        if self.board.place(self.current) {
            self.preview = self.next.preview_rows();
            self.redraw(update);
        } else {
            self.blink_step = 0;
            self.input_mark = now;
            self.enter(Phase::GameOver, update);
        }
    }

    /// One blink step per interval: solid on odd steps, blank on even ones.
    /// One interval after the last blank, the game finishes.
    fn blink(&mut self, now: Instant, update: &mut Update) {
        if now.ticks_since(self.input_mark) < self.tuning.blink_ticks {
            return;
        }
        self.input_mark = now;
        self.blink_step += 1;

        if self.blink_step > self.tuning.blinks * 2 {
            self.finish(update);
            return;
        }
        let fill = if self.blink_step % 2 == 1 { FULL } else { 0 };
        self.frame = [fill; ROWS];
        update.redraw = true;
    }

    fn finish(&mut self, update: &mut Update) {
        self.score.decrement();
        self.board.clear();
        self.preview = [0; 2];
        self.redraw(update);
        self.enter(Phase::Halted, update);
    }

    fn redraw(&mut self, update: &mut Update) {
        compose(&self.board, &self.preview, self.score.glyphs(), &mut self.frame);
        update.redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{SPAWN, WALLS};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn at(t: u32) -> Instant {
        Instant::from_ticks(t)
    }

    /// Overlay rows 1-5 without the preview, which shares rows 3 and 4.
    fn score_rows(frame: &Frame) -> [Row; 5] {
        let mut rows = [0; 5];
        for (dst, src) in rows.iter_mut().zip(&frame[1..6]) {
            *dst = src & !0x000F;
        }
        rows
    }

    fn new_game(seed: u64) -> Game<SmallRng> {
        Game::new(SmallRng::seed_from_u64(seed), Tuning::default())
    }

    /// A game that entered play at tick 250.
    fn playing(seed: u64) -> Game<SmallRng> {
        let mut game = new_game(seed);
        game.poll(at(0), Button::Rotate.into());
        let update = game.poll(at(250), Buttons::NONE);
        assert_eq!(update.entered, Some(Phase::Playing));
        game
    }

    #[test]
    fn title_screen() {
        let mut game = new_game(1);
        assert_eq!(game.phase(), Phase::Title);
        assert_eq!(game.frame()[14..19], font_3x5::PLAY);
        assert_eq!(game.frame().iter().filter(|&&r| r != 0).count(), 5);

        // Other buttons don't start the game.
        let update = game.poll(at(10), Button::Left.into());
        assert_eq!(update, Update::default());
        assert_eq!(game.phase(), Phase::Title);
    }

    #[test]
    fn start_waits_for_delay() {
        let mut game = new_game(2);
        let update = game.poll(at(100), Button::Rotate.into());
        assert_eq!(update.entered, Some(Phase::Starting));

        let update = game.poll(at(349), Buttons::NONE);
        assert_eq!(update, Update::default());

        let update = game.poll(at(350), Buttons::NONE);
        assert_eq!(update.entered, Some(Phase::Playing));
        assert!(update.redraw);

        let board = game.board();
        assert_eq!(board.anchor(), SPAWN);
        assert_eq!(board.active()[8..10], game.current().spawn_rows());
        assert_eq!(board.terrain()[7], FULL);
        assert_eq!(game.score().points(), 0);

        let frame = game.frame();
        assert_eq!(frame[3] & 0x000F, game.next().preview_rows()[0]);
        assert_eq!(frame[4] & 0x000F, game.next().preview_rows()[1]);
        assert_eq!(score_rows(frame), font_3x5::three_digits(0));
    }

    #[test]
    fn automatic_descent_period() {
        let mut game = playing(3);
        // Period is 1000 ticks at level 0, measured from 250.
        let update = game.poll(at(1250), Buttons::NONE);
        assert!(!update.redraw);
        assert_eq!(game.board().anchor().y, 8);

        let update = game.poll(at(1251), Buttons::NONE);
        assert!(update.redraw);
        assert_eq!(game.board().anchor().y, 9);

        game.poll(at(2251), Buttons::NONE);
        assert_eq!(game.board().anchor().y, 9);
        game.poll(at(2252), Buttons::NONE);
        assert_eq!(game.board().anchor().y, 10);
    }

    #[test]
    fn input_window() {
        let mut game = playing(4);
        let x = game.board().anchor().x;

        // The window is 250 ticks from the start of play.
        game.poll(at(500), Button::Left.into());
        assert_eq!(game.board().anchor().x, x);

        let update = game.poll(at(501), Button::Left.into());
        assert!(update.redraw);
        assert_eq!(game.board().anchor().x, x + 1);

        // Holding the button repeats only once per window.
        game.poll(at(600), Button::Left.into());
        assert_eq!(game.board().anchor().x, x + 1);
        game.poll(at(752), Button::Left.into());
        assert_eq!(game.board().anchor().x, x + 2);
    }

    #[test]
    fn one_button_per_window() {
        let mut game = playing(5);
        let x = game.board().anchor().x;
        let y = game.board().anchor().y;

        // Left wins over Right and Down.
        let held = Buttons::from(Button::Right)
            .with(Button::Left)
            .with(Button::Down);
        game.poll(at(501), held);
        assert_eq!(game.board().anchor().x, x + 1);
        assert_eq!(game.board().anchor().y, y);

        game.poll(at(752), Button::Down.into());
        assert_eq!(game.board().anchor().y, y + 1);

        game.poll(at(1003), Button::Right.into());
        assert_eq!(game.board().anchor().x, x);
    }

    #[test]
    fn soft_drop_locks_and_spawns() {
        // Slow enough that only the button moves the piece.
        let tuning = Tuning {
            descent_base: 10_000,
            debounce_divisor: 100,
            ..Tuning::default()
        };
        let mut game = Game::new(SmallRng::seed_from_u64(6), tuning);
        game.poll(at(0), Button::Rotate.into());
        game.poll(at(250), Buttons::NONE);

        let mut t = 250;
        while game.board().can_descend() {
            t += 201;
            let update = game.poll(at(t), Button::Down.into());
            assert!(update.redraw);
            assert_eq!(update.cleared, 0);
            assert!(game.board().layers_disjoint());
        }
        let landed = *game.board().active();
        assert_ne!(landed[31], 0);

        t += 201;
        game.poll(at(t), Button::Down.into());
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.board().anchor(), SPAWN);
        for i in 24..32 {
            assert_eq!(game.board().terrain()[i], WALLS | landed[i]);
            assert_eq!(game.board().active()[i], 0);
        }
    }

    #[test]
    fn layers_stay_disjoint_under_random_play() {
        for seed in 0..4 {
            let mut game = playing(seed);
            let mut buttons = SmallRng::seed_from_u64(seed ^ 0x5EED);
            let mut t = 250;
            while game.phase() == Phase::Playing && t < 400_000 {
                t += 7;
                let held = Buttons::from_port(buttons.gen());
                game.poll(at(t), held);
                let board = game.board();
                assert!(board.layers_disjoint());
                if game.phase() == Phase::Playing {
                    for &row in &board.terrain()[8..] {
                        assert_eq!(row & WALLS, WALLS);
                    }
                    for &row in &board.active()[..] {
                        assert_eq!(row & WALLS, 0);
                    }
                    assert_eq!(board.terrain()[7], FULL);
                }
            }
        }
    }

    #[test]
    fn lock_reports_clears() {
        let mut game = playing(7);
        // Fill row 31 except where an upright I will land.
        game.board.terrain[31] = FULL & !0x0100;
        game.current = Piece::I;
        game.board.place(Piece::I);
        game.board.drop_one();
        game.board.drop_one();
        assert!(game.board.rotate(Piece::I));
        while game.board.drop_one() {}
        assert_eq!(game.board.active[31], 0x0100);

        let mut update = Update::default();
        game.descend(at(300), &mut update);
        assert_eq!(game.board().active()[31], 0);
        assert_eq!(update.cleared, 1);
        assert_eq!(game.score().points(), 1);
        assert_eq!(game.score().level(), 3);
        assert_eq!(game.board().terrain()[31], WALLS | 0x0100);
        assert_eq!(game.board().terrain()[29], WALLS | 0x0100);
        assert_eq!(game.board().terrain()[28], WALLS);
        assert_eq!(score_rows(game.frame()), font_3x5::three_digits(1));
    }

    fn force_game_over(game: &mut Game<SmallRng>, t: u32) -> Update {
        // Occupy the whole spawn area.
        game.board.terrain[8] |= 0x03C0;
        game.board.terrain[9] |= 0x03C0;
        let mut update = Update::default();
        game.spawn(at(t), &mut update);
        update
    }

    #[test]
    fn spawn_overlap_ends_game() {
        let mut game = playing(8);
        game.score = Score::with_points(5);

        let update = force_game_over(&mut game, 1000);
        assert_eq!(update.entered, Some(Phase::GameOver));
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(game.board().layers_disjoint());

        // Blink: wait, solid, wait, blank, five times over.
        let mut t = 1000;
        assert!(!game.poll(at(t + 499), Buttons::NONE).redraw);
        for blink in 0..5 {
            t += 500;
            let update = game.poll(at(t), Buttons::NONE);
            assert!(update.redraw, "blink {}", blink);
            assert_eq!(*game.frame(), [FULL; ROWS]);
            t += 500;
            game.poll(at(t), Buttons::NONE);
            assert_eq!(*game.frame(), [0; ROWS]);
        }
        assert_eq!(game.phase(), Phase::GameOver);

        t += 500;
        let update = game.poll(at(t), Buttons::NONE);
        assert_eq!(update.entered, Some(Phase::Halted));
        assert_eq!(game.score().points(), 4);
        assert_eq!(*game.board().terrain(), [0; ROWS]);
        assert_eq!(*game.board().active(), [0; ROWS]);

        let frame = game.frame();
        assert_eq!(frame[1..6], font_3x5::three_digits(4));
        assert_eq!(frame[1], 0xEEA0);
        assert_eq!(frame[0], 0);
        assert!(frame[6..].iter().all(|&r| r == 0));

        // Halted ignores everything from here on.
        let update = game.poll(at(t + 100_000), Buttons::from_port(0));
        assert_eq!(update, Update::default());
    }

    #[test]
    fn game_over_at_zero_keeps_zero() {
        let mut game = playing(9);
        force_game_over(&mut game, 0);
        let mut t = 0;
        while game.phase() != Phase::Halted {
            t += 500;
            game.poll(at(t), Buttons::NONE);
        }
        assert_eq!(game.score().points(), 0);
        assert_eq!(game.frame()[1..6], font_3x5::three_digits(0));
    }

    #[test]
    fn clock_wrap_during_play() {
        let mut game = new_game(10);
        let start = u32::max_value() - 300;
        game.poll(at(start), Button::Rotate.into());
        game.poll(at(start).after(250), Buttons::NONE);
        assert_eq!(game.phase(), Phase::Playing);

        let y = game.board().anchor().y;
        game.poll(at(start).after(1251), Buttons::NONE);
        assert_eq!(game.board().anchor().y, y + 1);
    }
}
