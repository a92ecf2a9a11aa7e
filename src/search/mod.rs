//! Placement search: enumerating every reachable landing position for a
//! piece and classifying T-spin outcomes.

pub mod path;
pub mod tspin;

pub use path::PathSearch;
pub use tspin::{classify_t_spin, TSpinSearch};

use crate::game::moves::Move;
use crate::game::piece::Piece;
use crate::game::GameState;

/// Knobs controlling the search move alphabet and which landings are
/// reported. The trailing three are only consulted by `TSpinSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchConfig {
    pub allow_hard_drop: bool,
    pub allow_soft_drop: bool,
    pub allow_rotate_180: bool,
    /// Gravity-locked variant: every explored move is followed by the
    /// hard-drop collapse.
    pub is_20g: bool,
    /// Only record landings whose final move was a rotation.
    pub last_rotation_only: bool,
    pub require_last_rotation: bool,
    pub allow_mini_tspins: bool,
    pub prioritize_tspins: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            allow_hard_drop: true,
            allow_soft_drop: true,
            allow_rotate_180: false,
            is_20g: false,
            last_rotation_only: false,
            require_last_rotation: false,
            allow_mini_tspins: true,
            prioritize_tspins: false,
        }
    }
}

/// T-spin classification of a landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum TSpinType {
    None = 0,
    Regular = 1,
    Mini = 2,
}

/// A position where the piece can rest, plus how to get there.
#[derive(Debug, Clone)]
pub struct LandingPosition {
    /// The landed piece.
    pub piece: Piece,
    /// Moves from the search root that reach the landing; replaying them
    /// against a clone of the input state reproduces `piece`.
    pub path: Vec<Move>,
    pub t_spin: TSpinType,
    /// Rows a lock at this position would clear.
    pub lines_cleared: Option<u32>,
    pub valid: bool,
}

/// A pluggable landing-position search.
///
/// Implementations are pure: they read the game state and piece, never
/// mutate them, and report everything through their return values.
pub trait SearchAlgorithm: Send + Sync {
    fn name(&self) -> &str;

    fn config(&self) -> &SearchConfig;

    fn set_config(&mut self, config: SearchConfig);

    /// Every reachable landing position for `piece` on the game's board.
    /// With `max_depth > 0` the exploration stops expanding nodes at that
    /// depth (landings found on the frontier are still reported).
    fn find_landing_positions(
        &self,
        game: &GameState,
        piece: &Piece,
        max_depth: u32,
    ) -> Vec<LandingPosition>;

    /// Shortest move sequence taking `start` to `target`, empty when the
    /// target is unreachable.
    fn find_path(&self, game: &GameState, start: &Piece, target: &Piece) -> Vec<Move>;

    fn can_place_piece(&self, game: &GameState, piece: &Piece) -> bool {
        game.board().piece_fits(piece)
    }

    fn clone_algorithm(&self) -> Box<dyn SearchAlgorithm>;
}
