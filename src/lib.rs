//! A headless Tetris engine.
//!
//! The crate is a pure, synchronous state transformer: it represents a
//! playfield and a falling tetromino, applies rule-bound moves including
//! SRS wall kicks, locks pieces and clears lines, and enumerates every
//! reachable landing position for a piece, classifying T-spins on the
//! way. Rendering, input, piece-queue randomisation and scoring are the
//! caller's business.
//!
//! The usual flow: look a rotation system up in the [`registry`], build a
//! [`GameState`], feed its next-queue, spawn, then either drive the game
//! move by move or ask a [`SearchAlgorithm`] for all landing positions
//! and replay the chosen path.

pub mod error;
pub mod game;
pub mod registry;
pub mod rotation;
pub mod search;

pub use error::EngineError;
pub use game::board::{Board, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH, MIN_BOARD_SIZE};
pub use game::hold::Hold;
pub use game::moves::{Move, MoveKind};
pub use game::piece::{Piece, PieceState, PieceType, Position, Rotation};
pub use game::GameState;
pub use rotation::{RotationSystem, Srs, WallKickData, MAX_WALL_KICK_TESTS};
pub use search::{
    LandingPosition, PathSearch, SearchAlgorithm, SearchConfig, TSpinSearch, TSpinType,
};
