use crate::error::EngineError;

/// The move alphabet a game state understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MoveKind {
    Left,
    Right,
    Down,
    Up,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Rotate180,
    Hold,
}

impl MoveKind {
    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            MoveKind::RotateCw | MoveKind::RotateCcw | MoveKind::Rotate180
        )
    }
}

/// A move, optionally carrying the wall-kick test to apply.
///
/// The engine does not iterate kick tables on the caller's behalf: a
/// rotation with index `i` applies exactly offset `i` of the matching
/// table and succeeds or fails on that alone. Callers wanting standard
/// kick behaviour try indices `0..table.len()` in order and keep the
/// first move that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Move {
    kind: MoveKind,
    wall_kick_index: Option<usize>,
}

impl Move {
    pub fn new(kind: MoveKind) -> Self {
        Self {
            kind,
            wall_kick_index: None,
        }
    }

    /// A rotation move that applies the kick-table offset at `index`.
    /// Attaching an index to anything but a rotation is refused.
    pub fn with_kick(kind: MoveKind, index: usize) -> Result<Self, EngineError> {
        if !kind.is_rotation() {
            return Err(EngineError::WallKickOnNonRotation(index));
        }
        Ok(Self {
            kind,
            wall_kick_index: Some(index),
        })
    }

    pub fn kind(self) -> MoveKind {
        self.kind
    }

    pub fn wall_kick_index(self) -> Option<usize> {
        self.wall_kick_index
    }

    pub fn is_rotation(self) -> bool {
        self.kind.is_rotation()
    }
}

impl From<MoveKind> for Move {
    fn from(kind: MoveKind) -> Self {
        Move::new(kind)
    }
}
