//! Game session: status machine, spawning, gravity cadence, command handling.

use crate::piece::{Piece, RandomSource};
use crate::playfield::{self, Cell, Playfield, Tone};

/// Reaching this score ends the game with the bonus screen instead of a loss.
pub const BONUS_SCORE: u32 = 1024;

pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 9;
pub const DEFAULT_LEVEL: u32 = 3;

/// Ticks between automatic descents for a level. The external tick cadence
/// is fixed at 10 ms, so level 1 descends every 2 s and level 9 every 100 ms.
pub fn speed_for_level(level: u32) -> u64 {
    match level {
        1 => 200,
        2 => 150,
        3 => 100,
        4 => 70,
        5 => 55,
        6 => 40,
        7 => 25,
        8 => 15,
        _ => 10,
    }
}

/// Session status. Transitions are one-directional; `Over` and
/// `BonusEnding` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Preparing,
    Playing,
    Over,
    BonusEnding,
}

/// One cell as the render layer sees it: the settled grid with the falling
/// piece overlaid. Derived per call, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Empty,
    Settled(Tone),
    Falling(u8),
}

/// Owns the playfield, the current and next piece, and all counters. The
/// app loop is the only caller; every mutation happens on its thread.
pub struct Session {
    pub playfield: Playfield,
    pub current: Option<Piece>,
    pub next: Option<Piece>,
    pub status: Status,
    pub score: u32,
    pub level: u32,
    pub blocks: u32,
    speed: u64,
    ticks: u64,
    rng: Box<dyn RandomSource>,
}

impl Session {
    /// New session at the given level (clamped to 1..=9), waiting for its
    /// first tick.
    pub fn new(level: u32, rng: Box<dyn RandomSource>) -> Self {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        Self {
            playfield: Playfield::new(),
            current: None,
            next: None,
            status: Status::Preparing,
            score: 0,
            level,
            blocks: 0,
            speed: speed_for_level(level),
            ticks: 0,
            rng,
        }
    }

    pub fn finished(&self) -> bool {
        matches!(self.status, Status::Over | Status::BonusEnding)
    }

    /// One 10 ms tick. Spawns pieces as needed, then applies gravity when
    /// the per-level divider fires (immediately for a hard-dropped piece).
    pub fn tick(&mut self) {
        if self.finished() {
            return;
        }

        if self.next.is_none() {
            self.next = Some(Piece::spawn(self.rng.as_mut()));
        }

        if self.current.is_none() {
            let mut piece = self
                .next
                .take()
                .unwrap_or_else(|| Piece::spawn(self.rng.as_mut()));
            piece.reposition_to_spawn();
            self.current = Some(piece);
            self.next = Some(Piece::spawn(self.rng.as_mut()));
            self.blocks += 1;
            self.score += 1;
            if self.status == Status::Preparing {
                self.status = Status::Playing;
            }
        }

        // A hard-dropped piece skips the rest of the cadence window.
        if self.current.as_ref().is_some_and(|p| p.dropped) {
            self.ticks = self.ticks - (self.ticks % self.speed) + self.speed - 1;
        }

        if self.ticks % self.speed == self.speed - 1 {
            if let Some(mut piece) = self.current.take() {
                if self.playfield.can_move_down(&piece) {
                    piece.y -= 1;
                    self.current = Some(piece);
                } else {
                    let tone = if self.blocks % 2 == 0 {
                        Tone::Azure
                    } else {
                        Tone::Pale
                    };
                    self.playfield.lock(&piece, tone);
                    if piece.y >= playfield::SPAWN_Y {
                        // Never left the spawn rows: no room to fall.
                        self.status = Status::Over;
                        return;
                    }
                    let (_, delta) = self.playfield.clear_completed_rows();
                    self.score += delta;
                    if self.score >= BONUS_SCORE {
                        self.status = Status::BonusEnding;
                        return;
                    }
                }
            }
        }
        self.ticks += 1;
    }

    pub fn move_left(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        if let Some(piece) = self.current.as_mut() {
            if self.playfield.can_move_left(piece) {
                piece.x -= 1;
            }
        }
    }

    pub fn move_right(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        if let Some(piece) = self.current.as_mut() {
            if self.playfield.can_move_right(piece) {
                piece.x += 1;
            }
        }
    }

    pub fn soft_drop(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        if let Some(piece) = self.current.as_mut() {
            if self.playfield.can_move_down(piece) {
                piece.y -= 1;
            }
        }
    }

    /// Descend until blocked and flag the piece so the next tick locks it,
    /// regardless of where the cadence window stands.
    pub fn hard_drop(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        if let Some(piece) = self.current.as_mut() {
            while self.playfield.can_move_down(piece) {
                piece.y -= 1;
            }
            piece.dropped = true;
        }
    }

    pub fn rotate(&mut self, clockwise: bool) {
        if self.status != Status::Playing {
            return;
        }
        if let Some(piece) = self.current.as_mut() {
            if let Some((rotation, tile)) = self.playfield.can_rotate(piece, clockwise) {
                piece.rotation = rotation;
                piece.tile = tile;
            }
        }
    }

    /// Settled grid with the falling piece overlaid; pure derivation so the
    /// render layer never holds a second copy of piece state.
    pub fn cell_view(&self, row: usize, col: usize) -> CellView {
        if let Some(piece) = &self.current {
            if piece.occupies(None, 0, 0, row as i32, col as i32) {
                return CellView::Falling(piece.color);
            }
        }
        match self.playfield.cell(row, col) {
            Cell::Empty => CellView::Empty,
            Cell::Settled(tone) => CellView::Settled(tone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Lcg, PieceKind};
    use crate::playfield::{HEIGHT, SPAWN_X, SPAWN_Y, WIDTH};

    /// Random source that repeats one value: every spawn gets the same
    /// kind (`ALL[v % 7]`) and colour (`v % 6`).
    struct Always(u32);

    impl RandomSource for Always {
        fn next_u32(&mut self) -> u32 {
            self.0
        }
    }

    fn session_with(level: u32, value: u32) -> Session {
        Session::new(level, Box::new(Always(value)))
    }

    fn tick_until_current(session: &mut Session) {
        for _ in 0..1000 {
            if session.current.is_some() {
                return;
            }
            session.tick();
        }
        panic!("no piece spawned after 1000 ticks");
    }

    /// Slide the current piece so its window origin lands on `x`.
    fn steer_to(session: &mut Session, x: i32) {
        for _ in 0..WIDTH {
            let at = session.current.as_ref().map(|p| p.x);
            match at {
                Some(cur) if cur > x => session.move_left(),
                Some(cur) if cur < x => session.move_right(),
                _ => return,
            }
        }
    }

    #[test]
    fn first_tick_spawns_and_starts_playing() {
        let mut s = session_with(3, 0);
        assert_eq!(s.status, Status::Preparing);
        s.tick();
        assert_eq!(s.status, Status::Playing);
        assert!(s.current.is_some());
        assert!(s.next.is_some());
        assert_eq!(s.blocks, 1);
        assert_eq!(s.score, 1);
    }

    #[test]
    fn level_is_clamped_and_speed_follows_the_table() {
        assert_eq!(Session::new(0, Box::new(Lcg::new(1))).level, 1);
        assert_eq!(Session::new(42, Box::new(Lcg::new(1))).level, 9);
        assert_eq!(speed_for_level(1), 200);
        assert_eq!(speed_for_level(5), 55);
        assert_eq!(speed_for_level(9), 10);
        assert_eq!(speed_for_level(14), 10);
    }

    #[test]
    fn soft_dropped_i_piece_locks_four_cells_in_one_column() {
        // Always(3) spawns I pieces (catalog order L S J I Z O T).
        let mut s = session_with(3, 3);
        tick_until_current(&mut s);
        assert_eq!(s.current.as_ref().map(|p| p.kind), Some(PieceKind::I));

        let mut drops = 0;
        while s
            .current
            .as_ref()
            .is_some_and(|p| s.playfield.can_move_down(p))
        {
            s.soft_drop();
            drops += 1;
            assert!(drops <= HEIGHT as i32, "soft drop never bottomed out");
        }
        assert_eq!(s.current.as_ref().map(|p| p.y), Some(0));

        s.hard_drop();
        s.tick();
        assert!(s.current.is_none());
        let col = (SPAWN_X + 1) as usize;
        for row in 0..4 {
            assert!(s.playfield.cell(row, col).is_settled());
        }
        let settled = (0..HEIGHT)
            .flat_map(|r| (0..WIDTH).map(move |c| (r, c)))
            .filter(|&(r, c)| s.playfield.cell(r, c).is_settled())
            .count();
        assert_eq!(settled, 4);
    }

    #[test]
    fn hard_drop_locks_on_the_very_next_tick_at_slow_cadence() {
        // Level 1: divider 200, so gravity alone would not fire for seconds.
        let mut s = session_with(1, 5);
        tick_until_current(&mut s);
        s.hard_drop();
        s.tick();
        assert!(s.current.is_none());
        assert!(s.playfield.cell(0, (SPAWN_X + 1) as usize).is_settled());
    }

    #[test]
    fn gravity_waits_for_the_cadence_divider() {
        let mut s = session_with(9, 5);
        tick_until_current(&mut s);
        let y0 = s.current.as_ref().map(|p| p.y).unwrap();
        // Level 9 divider is 10; a couple of ticks must not descend yet.
        s.tick();
        s.tick();
        assert_eq!(s.current.as_ref().map(|p| p.y), Some(y0));
        for _ in 0..10 {
            s.tick();
        }
        assert_eq!(s.current.as_ref().map(|p| p.y), Some(y0 - 1));
    }

    #[test]
    fn eight_o_pieces_fill_and_clear_the_bottom_two_rows() {
        // Always(5) spawns O pieces; each occupies a 2x2 at cols x+1..x+3.
        let mut s = session_with(9, 5);
        for target in (0..8).map(|i| -1 + 2 * i) {
            tick_until_current(&mut s);
            steer_to(&mut s, target);
            assert_eq!(s.current.as_ref().map(|p| p.x), Some(target));
            s.hard_drop();
            s.tick();
            assert!(s.current.is_none());
        }
        // Eight spawns scored 1 each, plus 8 for the double clear.
        assert_eq!(s.score, 16);
        for col in 0..WIDTH {
            assert!(!s.playfield.cell(0, col).is_settled());
            assert!(!s.playfield.cell(1, col).is_settled());
        }
        assert_eq!(s.status, Status::Playing);
    }

    #[test]
    fn completing_a_seeded_row_scores_a_single_clear() {
        let mut s = session_with(9, 5);
        for col in 0..WIDTH - 2 {
            s.playfield.settle(0, col, Tone::Pale);
        }
        tick_until_current(&mut s);
        let before = s.score;
        steer_to(&mut s, WIDTH as i32 - 3);
        s.hard_drop();
        s.tick();
        assert_eq!(s.score, before + 5);
        // The O's upper two cells survive and compact onto the floor row.
        assert!(s.playfield.cell(0, WIDTH - 2).is_settled());
        assert!(s.playfield.cell(0, WIDTH - 1).is_settled());
        assert!(!s.playfield.cell(1, WIDTH - 1).is_settled());
    }

    #[test]
    fn bonus_ending_triggers_exactly_at_the_threshold() {
        let mut s = session_with(9, 5);
        for col in 0..WIDTH - 2 {
            s.playfield.settle(0, col, Tone::Pale);
        }
        tick_until_current(&mut s);
        // Next single clear is worth 5: land one short of the threshold.
        s.score = BONUS_SCORE - 6;
        steer_to(&mut s, WIDTH as i32 - 3);
        s.hard_drop();
        s.tick();
        assert_eq!(s.score, BONUS_SCORE - 1);
        assert_eq!(s.status, Status::Playing);

        for col in 0..WIDTH - 2 {
            s.playfield.settle(0, col, Tone::Pale);
        }
        tick_until_current(&mut s);
        steer_to(&mut s, WIDTH as i32 - 3);
        s.hard_drop();
        s.tick();
        assert!(s.score >= BONUS_SCORE);
        assert_eq!(s.status, Status::BonusEnding);
    }

    #[test]
    fn locking_in_the_spawn_rows_ends_the_game() {
        // Always(3) spawns vertical I pieces.
        let mut s = session_with(9, 3);
        // A column of settled cells right up to the spawn window keeps the
        // fresh piece from ever descending.
        for row in 0..SPAWN_Y as usize {
            s.playfield.settle(row, (SPAWN_X + 1) as usize, Tone::Pale);
        }
        tick_until_current(&mut s);
        s.hard_drop();
        s.tick();
        assert_eq!(s.status, Status::Over);
    }

    #[test]
    fn terminal_states_accept_no_further_mutation() {
        let mut s = session_with(9, 3);
        for row in 0..SPAWN_Y as usize {
            s.playfield.settle(row, (SPAWN_X + 1) as usize, Tone::Pale);
        }
        tick_until_current(&mut s);
        s.hard_drop();
        s.tick();
        assert_eq!(s.status, Status::Over);

        let score = s.score;
        let blocks = s.blocks;
        for _ in 0..50 {
            s.tick();
            s.move_left();
            s.move_right();
            s.soft_drop();
            s.hard_drop();
            s.rotate(true);
        }
        assert_eq!(s.status, Status::Over);
        assert_eq!(s.score, score);
        assert_eq!(s.blocks, blocks);
    }

    #[test]
    fn commands_are_ignored_while_preparing() {
        let mut s = session_with(3, 5);
        s.move_left();
        s.soft_drop();
        s.rotate(true);
        assert_eq!(s.status, Status::Preparing);
        assert!(s.current.is_none());
    }

    #[test]
    fn cell_view_overlays_the_falling_piece_without_storing_it() {
        let mut s = session_with(1, 5);
        tick_until_current(&mut s);
        let piece = s.current.clone().unwrap();
        let (row, col) = ((piece.y + 2) as usize, (piece.x + 1) as usize);
        assert_eq!(s.cell_view(row, col), CellView::Falling(piece.color));
        // The grid itself stays empty underneath the overlay.
        assert_eq!(s.playfield.cell(row, col), Cell::Empty);
        s.move_right();
        assert_eq!(s.cell_view(row, col), CellView::Empty);
    }

    #[test]
    fn score_only_ever_increases() {
        let mut s = Session::new(9, Box::new(Lcg::new(1234)));
        let mut last = 0;
        for i in 0..5_000 {
            s.tick();
            if i % 7 == 0 {
                s.move_left();
            }
            if i % 11 == 0 {
                s.rotate(true);
            }
            if i % 13 == 0 {
                s.hard_drop();
            }
            assert!(s.score >= last);
            last = s.score;
            if s.finished() {
                break;
            }
        }
    }
}
