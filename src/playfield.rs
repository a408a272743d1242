//! Playfield grid, collision/placement oracle, locking and line clears.

use crate::piece::Piece;

/// Playfield size in cells. Row 0 is the floor, rows grow upward; column 0
/// is the left edge.
pub const WIDTH: usize = 16;
pub const HEIGHT: usize = 30;

/// Spawn origin: horizontal centre of the grid, window flush with the top.
pub const SPAWN_X: i32 = (WIDTH as i32 - 4) / 2;
pub const SPAWN_Y: i32 = HEIGHT as i32 - 4;

/// Line-clear score table, indexed by cleared-row count. A triple outscores
/// a quad; kept deliberately for score compatibility (see DESIGN.md).
const CLEAR_SCORES: [u32; 5] = [0, 5, 8, 12, 10];

/// Shade of a settled cell. Purely cosmetic; both tones behave identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Pale,
    Azure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Settled(Tone),
}

impl Cell {
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Settled(_))
    }
}

/// The settled-cell matrix. The falling piece is never stored here; its
/// overlay is derived on demand (see `Session::cell_view`).
#[derive(Debug, Clone)]
pub struct Playfield {
    cells: [[Cell; WIDTH]; HEIGHT],
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}

impl Playfield {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
        }
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Settled test with off-grid coordinates reading as empty.
    #[inline]
    pub fn settled(&self, row: i32, col: i32) -> bool {
        if row < 0 || row >= HEIGHT as i32 || col < 0 || col >= WIDTH as i32 {
            return false;
        }
        self.cells[row as usize][col as usize].is_settled()
    }

    /// Mark a cell settled directly. Used by tests and nothing else.
    #[cfg(test)]
    pub fn settle(&mut self, row: usize, col: usize, tone: Tone) {
        self.cells[row][col] = Cell::Settled(tone);
    }

    /// Can the piece shift one column left? Scans every playfield row so the
    /// window's empty padding composes with the boundary test; off-grid
    /// columns always block.
    pub fn can_move_left(&self, piece: &Piece) -> bool {
        for row in 0..HEIGHT as i32 {
            if piece.occupies(None, 0, -1, row, -1) {
                return false;
            }
            for col in 0..WIDTH as i32 {
                if self.settled(row, col) && piece.occupies(None, 0, -1, row, col) {
                    return false;
                }
            }
        }
        true
    }

    pub fn can_move_right(&self, piece: &Piece) -> bool {
        for row in 0..HEIGHT as i32 {
            if piece.occupies(None, 0, 1, row, WIDTH as i32) {
                return false;
            }
            for col in 0..WIDTH as i32 {
                if self.settled(row, col) && piece.occupies(None, 0, 1, row, col) {
                    return false;
                }
            }
        }
        true
    }

    /// Can the piece descend one row? The floor (row -1) always blocks.
    pub fn can_move_down(&self, piece: &Piece) -> bool {
        for col in 0..WIDTH as i32 {
            if piece.occupies(None, -1, 0, -1, col) {
                return false;
            }
            for row in 0..HEIGHT as i32 {
                if self.settled(row, col) && piece.occupies(None, -1, 0, row, col) {
                    return false;
                }
            }
        }
        true
    }

    /// Candidate rotation tested at the unchanged origin against both
    /// vertical edges and settled cells. No wall kick: if the rotated shape
    /// does not fit, the rotation is rejected outright.
    pub fn can_rotate(&self, piece: &Piece, clockwise: bool) -> Option<(crate::piece::Rotation, u16)> {
        let (rotation, tile) = piece.proposed_rotation(clockwise);
        for row in 0..HEIGHT as i32 {
            if piece.occupies(Some(tile), 0, 0, row, -1)
                || piece.occupies(Some(tile), 0, 0, row, WIDTH as i32)
            {
                return None;
            }
            for col in 0..WIDTH as i32 {
                if self.settled(row, col) && piece.occupies(Some(tile), 0, 0, row, col) {
                    return None;
                }
            }
        }
        Some((rotation, tile))
    }

    /// Permanently settle the piece's occupied cells. Window cells outside
    /// the grid are skipped; the oracle keeps them from holding piece cells
    /// in the first place.
    pub fn lock(&mut self, piece: &Piece, tone: Tone) {
        for ty in 0..4 {
            for tx in 0..4 {
                let row = piece.y + ty;
                let col = piece.x + tx;
                if row < 0 || row >= HEIGHT as i32 || col < 0 || col >= WIDTH as i32 {
                    continue;
                }
                if piece.occupies(None, 0, 0, row, col) {
                    self.cells[row as usize][col as usize] = Cell::Settled(tone);
                }
            }
        }
    }

    /// Remove every fully settled row, compacting survivors toward the
    /// floor in order. Returns (cleared rows, score delta).
    pub fn clear_completed_rows(&mut self) -> (u32, u32) {
        let mut fresh = [[Cell::Empty; WIDTH]; HEIGHT];
        let mut copied = 0;
        let mut cleared = 0u32;
        for row in 0..HEIGHT {
            if self.cells[row].iter().all(|c| c.is_settled()) {
                cleared += 1;
            } else {
                fresh[copied] = self.cells[row];
                copied += 1;
            }
        }
        self.cells = fresh;
        (cleared, CLEAR_SCORES[cleared.min(4) as usize])
    }
}
