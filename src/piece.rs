//! Piece catalog (bit-packed 4x4 shape masks), falling piece state, random source.

use crate::playfield;

/// Number of colour indices a piece can spawn with (see `Theme::piece_color`).
pub const COLOR_COUNT: u32 = 6;

/// Tetromino kinds, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    L,
    S,
    J,
    I,
    Z,
    O,
    T,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        Self::L,
        Self::S,
        Self::J,
        Self::I,
        Self::Z,
        Self::O,
        Self::T,
    ];

    /// Shape mask for a rotation state.
    ///
    /// Each mask covers a 4x4 window: bit `i` set means the cell at local row
    /// `i / 4`, local column `3 - (i % 4)` is part of the piece. Local row 0
    /// is the bottom of the window, so the leftmost nibble of each literal
    /// reads as the top row of the shape, most-significant bit = leftmost
    /// column.
    pub fn bitmap(self, rotation: Rotation) -> u16 {
        let maps: [u16; 4] = match self {
            // .#..  ....  ##..  ..#.
            // .#..  ###.  .#..  ###.
            // .##.  #...  .#..  ....
            Self::L => [
                0b0100_0100_0110_0000,
                0b0000_1110_1000_0000,
                0b1100_0100_0100_0000,
                0b0010_1110_0000_0000,
            ],
            // .##.  .#..  ....  #...
            // ##..  .##.  .##.  ##..
            // ....  ..#.  ##..  .#..
            Self::S => [
                0b0110_1100_0000_0000,
                0b0100_0110_0010_0000,
                0b0000_0110_1100_0000,
                0b1000_1100_0100_0000,
            ],
            // .#..  #...  .##.  ....
            // .#..  ###.  .#..  ###.
            // ##..  ....  .#..  ..#.
            Self::J => [
                0b0100_0100_1100_0000,
                0b1000_1110_0000_0000,
                0b0110_0100_0100_0000,
                0b0000_1110_0010_0000,
            ],
            // .#..  ....  ..#.  ....
            // .#..  ####  ..#.  ....
            // .#..  ....  ..#.  ####
            // .#..  ....  ..#.  ....
            Self::I => [
                0b0100_0100_0100_0100,
                0b0000_1111_0000_0000,
                0b0010_0010_0010_0010,
                0b0000_0000_1111_0000,
            ],
            // ##..  ..#.  ....  .#..
            // .##.  .##.  ##..  ##..
            // ....  .#..  .##.  #...
            Self::Z => [
                0b1100_0110_0000_0000,
                0b0010_0110_0100_0000,
                0b0000_1100_0110_0000,
                0b0100_1100_1000_0000,
            ],
            // .##. in all four rotation states
            // .##.
            Self::O => [
                0b0110_0110_0000_0000,
                0b0110_0110_0000_0000,
                0b0110_0110_0000_0000,
                0b0110_0110_0000_0000,
            ],
            // ###.  ..#.  ....  #...
            // .#..  .##.  .#..  ##..
            // ....  ..#.  ###.  #...
            Self::T => [
                0b1110_0100_0000_0000,
                0b0010_0110_0010_0000,
                0b0000_0100_1110_0000,
                0b1000_1100_1000_0000,
            ],
        };
        maps[rotation as usize]
    }
}

/// Rotation state, cyclic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    R0 = 0,
    R90 = 1,
    R180 = 2,
    R270 = 3,
}

impl Rotation {
    pub fn clockwise(self) -> Self {
        match self {
            Self::R0 => Self::R90,
            Self::R90 => Self::R180,
            Self::R180 => Self::R270,
            Self::R270 => Self::R0,
        }
    }

    pub fn counter_clockwise(self) -> Self {
        match self {
            Self::R0 => Self::R270,
            Self::R90 => Self::R0,
            Self::R180 => Self::R90,
            Self::R270 => Self::R180,
        }
    }
}

/// Source of uniformly distributed integers. Injected so tests can seed the
/// spawn sequence deterministically.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;
}

/// Linear congruential generator; the high half of the state gives usable
/// low-order bits for small moduli.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed from the system clock.
    pub fn from_entropy() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos().wrapping_add(d.as_secs() as u32))
            .unwrap_or(0x1357_9bdf);
        Self::new(nanos | 1)
    }
}

impl RandomSource for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        self.state >> 16
    }
}

/// The falling piece: a catalog entry plus position and rotation.
///
/// The 4x4 window covers columns `x..x+4` and rows `y..y+4`, rows counted
/// upward from the playfield floor. `tile` caches the resolved bitmap for
/// the current rotation.
#[derive(Debug, Clone)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
    pub tile: u16,
    pub color: u8,
    pub dropped: bool,
}

impl Piece {
    /// New piece with random kind and colour at the spawn position.
    pub fn spawn(rng: &mut dyn RandomSource) -> Self {
        let kind = PieceKind::ALL[(rng.next_u32() % 7) as usize];
        let color = (rng.next_u32() % COLOR_COUNT) as u8;
        Self {
            kind,
            rotation: Rotation::R0,
            x: playfield::SPAWN_X,
            y: playfield::SPAWN_Y,
            tile: kind.bitmap(Rotation::R0),
            color,
            dropped: false,
        }
    }

    /// Put the piece back at the spawn position (top centre, rotation kept).
    pub fn reposition_to_spawn(&mut self) {
        self.x = playfield::SPAWN_X;
        self.y = playfield::SPAWN_Y;
    }

    /// Next rotation state and its bitmap; commits nothing.
    pub fn proposed_rotation(&self, clockwise: bool) -> (Rotation, u16) {
        let rotation = if clockwise {
            self.rotation.clockwise()
        } else {
            self.rotation.counter_clockwise()
        };
        (rotation, self.kind.bitmap(rotation))
    }

    /// Does the piece, shifted by (`dy`, `dx`) and optionally re-tiled,
    /// occupy the absolute grid cell (`row`, `col`)?
    ///
    /// Cells outside the shifted 4x4 window are never occupied, which lets
    /// boundary checks (column -1, column W, row -1) share this one test.
    pub fn occupies(&self, tile_override: Option<u16>, dy: i32, dx: i32, row: i32, col: i32) -> bool {
        let tx = col - (self.x + dx);
        let ty = row - (self.y + dy);
        if !(0..4).contains(&tx) || !(0..4).contains(&ty) {
            return false;
        }
        let tile = tile_override.unwrap_or(self.tile);
        tile & (1 << (ty * 4 + (3 - tx))) != 0
    }
}
