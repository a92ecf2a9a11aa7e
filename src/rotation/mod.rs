//! Rotation systems: shape tables, wall-kick tables, and spawn geometry.
//!
//! A rotation system is immutable once constructed and is shared between a
//! game state and its pieces through an `Arc`. The engine ships SRS; other
//! systems can be registered under their own names (see `registry`).

pub mod srs;

pub use srs::Srs;

use crate::error::EngineError;
use crate::game::piece::{PieceState, PieceType, Rotation};

/// Upper bound on the number of offsets a kick table may carry.
pub const MAX_WALL_KICK_TESTS: usize = 16;

/// An ordered list of (dx, dy) offsets to try when a rotation collides.
///
/// The offsets reference immutable per-system tables; looking one up by
/// index is bounds-checked so a caller iterating `0..len()` never has to
/// reason about table sizes per piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallKickData {
    offsets: &'static [(i32, i32)],
}

impl WallKickData {
    pub const fn new(offsets: &'static [(i32, i32)]) -> Self {
        assert!(offsets.len() <= MAX_WALL_KICK_TESTS);
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The offset at `index`, or `WallKickIndexOutOfRange`.
    pub fn offset(&self, index: usize) -> Result<(i32, i32), EngineError> {
        self.offsets
            .get(index)
            .copied()
            .ok_or(EngineError::WallKickIndexOutOfRange {
                index,
                len: self.offsets.len(),
            })
    }

    pub fn offsets(&self) -> &[(i32, i32)] {
        self.offsets
    }
}

/// The capability set every rotation system provides.
///
/// Kick tables are indexed by the rotation the piece is leaving; the
/// direction is picked by the method. Implementations carry no mutable
/// state and may be shared freely across threads.
pub trait RotationSystem: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// 16-bit occupancy mask of the 4x4 shape for `(piece, rotation)`,
    /// bit `y * 4 + x`.
    fn shape(&self, piece: PieceType, rotation: Rotation) -> u16;

    fn clockwise_wall_kicks(&self, piece: PieceType, from: Rotation) -> WallKickData;

    fn counter_clockwise_wall_kicks(&self, piece: PieceType, from: Rotation) -> WallKickData;

    fn rotate_180_wall_kicks(&self, piece: PieceType, from: Rotation) -> WallKickData;

    /// Where a freshly dealt piece enters the board. The y names the row
    /// the top of the shape occupies; spawning lowers the piece so its
    /// whole shape fits under that row.
    fn initial_state(&self, piece: PieceType, board_width: i32, board_height: i32) -> PieceState;

    /// Whether 180-degree rotations come with a real kick table.
    fn supports_180(&self) -> bool;

    fn clone_system(&self) -> Box<dyn RotationSystem>;
}
