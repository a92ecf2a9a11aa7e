//! Three-corner T-spin classification and the T-spin-aware search.

use super::{path, LandingPosition, SearchAlgorithm, SearchConfig, TSpinType};
use crate::game::board::Board;
use crate::game::moves::Move;
use crate::game::piece::{Piece, PieceType, Rotation};
use crate::game::GameState;

/// Classifies a landed piece under the three-corner rule.
///
/// Only T pieces reached by a final rotation qualify. The four diagonal
/// corners around the piece's position are examined; a corner outside the
/// board counts as occupied. Three or more occupied corners make a
/// regular T-spin; exactly two make a mini when they are the pair the
/// current rotation faces.
pub fn classify_t_spin(board: &Board, piece: &Piece, last_move: Option<Move>) -> TSpinType {
    if piece.piece_type() != PieceType::T {
        return TSpinType::None;
    }
    if !last_move.is_some_and(|mv| mv.is_rotation()) {
        return TSpinType::None;
    }

    let position = piece.position();
    let occupied = |dx: i32, dy: i32| {
        let (x, y) = (position.x + dx, position.y + dy);
        x < 0 || x >= board.width() || y < 0 || y >= board.height() || board.is_filled(x, y)
    };

    let top_left = occupied(-1, 1);
    let top_right = occupied(1, 1);
    let bottom_left = occupied(-1, -1);
    let bottom_right = occupied(1, -1);

    let count = [top_left, top_right, bottom_left, bottom_right]
        .iter()
        .filter(|&&corner| corner)
        .count();
    if count >= 3 {
        return TSpinType::Regular;
    }
    if count == 2 {
        let front_pair = match piece.rotation() {
            Rotation::R0 => top_left && top_right,
            Rotation::R90 => top_right && bottom_right,
            Rotation::R180 => bottom_left && bottom_right,
            Rotation::R270 => top_left && bottom_left,
        };
        if front_pair {
            return TSpinType::Mini;
        }
    }
    TSpinType::None
}

/// `PathSearch` with T-spin-oriented reporting: landings can be limited
/// to rotation-finishing ones, minis can be demoted, and spins can be
/// sorted to the front.
#[derive(Debug, Clone, Default)]
pub struct TSpinSearch {
    config: SearchConfig,
}

impl TSpinSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl SearchAlgorithm for TSpinSearch {
    fn name(&self) -> &str {
        "TSpinSearch"
    }

    fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    fn find_landing_positions(
        &self,
        game: &GameState,
        piece: &Piece,
        max_depth: u32,
    ) -> Vec<LandingPosition> {
        let mut landings = path::collect_landings(game, piece, max_depth, &self.config);

        if self.config.require_last_rotation {
            landings.retain(|landing| landing.path.last().is_some_and(|mv| mv.is_rotation()));
        }
        if !self.config.allow_mini_tspins {
            for landing in landings.iter_mut() {
                if landing.t_spin == TSpinType::Mini {
                    landing.t_spin = TSpinType::None;
                }
            }
        }
        if self.config.prioritize_tspins {
            landings.sort_by_key(|landing| match landing.t_spin {
                TSpinType::Regular => 0,
                TSpinType::Mini => 1,
                TSpinType::None => 2,
            });
        }
        landings
    }

    fn find_path(&self, game: &GameState, start: &Piece, target: &Piece) -> Vec<Move> {
        path::search_path(game, start, target, &self.config)
    }

    fn clone_algorithm(&self) -> Box<dyn SearchAlgorithm> {
        Box::new(self.clone())
    }
}
