//! Game state: the board, the falling piece, the hold slot and the
//! next-piece queue, plus the move machinery that ties them together.

pub mod board;
pub mod hold;
pub mod moves;
pub mod piece;

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use log::debug;

use self::board::Board;
use self::hold::Hold;
use self::moves::{Move, MoveKind};
use self::piece::{Piece, PieceState, PieceType, Position};
use crate::error::EngineError;
use crate::rotation::RotationSystem;

/// A single-player field and its falling piece.
///
/// The engine is a pure synchronous state transformer: the caller feeds
/// piece types into the next-queue, spawns, applies moves and locks. Every
/// recoverable failure returns `false` and leaves the state untouched.
#[derive(Clone)]
pub struct GameState {
    board: Board,
    current: Option<Piece>,
    hold: Hold,
    next_queue: VecDeque<PieceType>,
    lines_cleared: u32,
    game_over: bool,
    rotation_system: Arc<dyn RotationSystem>,
}

impl GameState {
    pub fn new(
        width: i32,
        height: i32,
        rotation_system: Arc<dyn RotationSystem>,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            board: Board::new(width, height)?,
            current: None,
            hold: Hold::new(),
            next_queue: VecDeque::new(),
            lines_cleared: 0,
            game_over: false,
            rotation_system,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn held_piece(&self) -> Option<PieceType> {
        self.hold.piece()
    }

    pub fn set_held_piece(&mut self, piece: Option<PieceType>) {
        self.hold.set_piece(piece);
    }

    pub fn hold_used(&self) -> bool {
        self.hold.used_this_turn()
    }

    pub fn set_hold_used(&mut self, used: bool) {
        self.hold.set_used(used);
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn set_lines_cleared(&mut self, lines: u32) {
        self.lines_cleared = lines;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
    }

    pub fn rotation_system(&self) -> &Arc<dyn RotationSystem> {
        &self.rotation_system
    }

    /// Swaps the rotation system; the current piece re-derives its shape
    /// under the new one.
    pub fn set_rotation_system(&mut self, rotation_system: Arc<dyn RotationSystem>) {
        self.rotation_system = Arc::clone(&rotation_system);
        if let Some(piece) = self.current.as_mut() {
            piece.set_rotation_system(rotation_system);
        }
    }

    pub fn next_queue(&self) -> &VecDeque<PieceType> {
        &self.next_queue
    }

    pub fn push_next(&mut self, piece: PieceType) {
        self.next_queue.push_back(piece);
    }

    pub fn extend_next<I: IntoIterator<Item = PieceType>>(&mut self, pieces: I) {
        self.next_queue.extend(pieces);
    }

    /// Whether every cell of the piece is in bounds and empty.
    pub fn can_place(&self, piece: &Piece) -> bool {
        self.board.piece_fits(piece)
    }

    /// Applies one move to the current piece.
    ///
    /// The candidate state is computed, tested against the board, and
    /// committed only when it fits; on any failure the piece is left
    /// bitwise unchanged and `false` comes back. Rotations apply the kick
    /// offset named by the move's wall-kick index, if it carries one.
    pub fn apply_move(&mut self, mv: Move) -> bool {
        if self.game_over {
            return false;
        }
        if mv.kind() == MoveKind::Hold {
            return self.hold_current_piece();
        }
        let Some(current) = self.current.as_ref() else {
            return false;
        };
        let Some(state) = self.moved_state(current, mv) else {
            return false;
        };

        let mut candidate = current.clone();
        candidate.set_state(state);
        if !self.board.piece_fits(&candidate) {
            return false;
        }
        self.current = Some(candidate);
        true
    }

    fn moved_state(&self, piece: &Piece, mv: Move) -> Option<PieceState> {
        let mut state = piece.state();
        match mv.kind() {
            MoveKind::Left => state.position.x -= 1,
            MoveKind::Right => state.position.x += 1,
            MoveKind::Down | MoveKind::SoftDrop => state.position.y -= 1,
            MoveKind::Up => state.position.y += 1,
            MoveKind::HardDrop => {
                let distance = self.drop_distance(piece)?;
                state.position.y -= distance;
            }
            MoveKind::RotateCw | MoveKind::RotateCcw | MoveKind::Rotate180 => {
                let from = state.rotation;
                state.rotation = match mv.kind() {
                    MoveKind::RotateCw => from.cw(),
                    MoveKind::RotateCcw => from.ccw(),
                    _ => from.flip(),
                };
                if let Some(index) = mv.wall_kick_index() {
                    let kicks = match mv.kind() {
                        MoveKind::RotateCw => self
                            .rotation_system
                            .clockwise_wall_kicks(state.piece_type, from),
                        MoveKind::RotateCcw => self
                            .rotation_system
                            .counter_clockwise_wall_kicks(state.piece_type, from),
                        _ => self.rotation_system.rotate_180_wall_kicks(state.piece_type, from),
                    };
                    let (dx, dy) = kicks.offset(index).ok()?;
                    state.position.x += dx;
                    state.position.y += dy;
                }
            }
            MoveKind::Hold => return None,
        }
        Some(state)
    }

    /// How far straight down the piece can travel before resting: the
    /// descent stops one cell above the first collision. A piece whose
    /// only violation is poking above the board top (the spawn overshoot)
    /// is allowed to fall into the field first.
    fn drop_distance(&self, piece: &Piece) -> Option<i32> {
        let origin = piece.position();
        let mut probe = piece.clone();
        let mut best = None;
        for distance in 0..=self.board.height() + 4 {
            probe.set_position(Position::new(origin.x, origin.y - distance));
            if self.board.piece_fits(&probe) {
                best = Some(distance);
            } else if best.is_some() || !self.overshoots_top(&probe) {
                break;
            }
        }
        best
    }

    fn overshoots_top(&self, piece: &Piece) -> bool {
        piece.absolute_cells().iter().all(|&(x, y)| {
            x >= 0
                && x < self.board.width()
                && y >= 0
                && (y >= self.board.height() || !self.board.is_filled(x, y))
        })
    }

    /// The position the current piece would rest at after a hard drop.
    pub fn drop_position(&self) -> Option<Position> {
        let piece = self.current.as_ref()?;
        let distance = self.drop_distance(piece)?;
        Some(piece.position().translated(0, -distance))
    }

    /// Installs a fresh piece of the given type at its spawn state. When
    /// the spawn placement collides the game is over and `false` comes
    /// back.
    pub fn spawn_piece(&mut self, piece_type: PieceType) -> bool {
        let state =
            self.rotation_system
                .initial_state(piece_type, self.board.width(), self.board.height());
        let mut piece = Piece::new(state, Arc::clone(&self.rotation_system));
        // The spawn row names the top of the shape; drop the piece so the
        // whole shape sits at or below it.
        let position = state.position.translated(0, -(piece.height() - 1));
        piece.set_position(position);

        if !self.board.piece_fits(&piece) {
            debug!("spawn of {piece_type} blocked at {position:?}; game over");
            self.game_over = true;
            return false;
        }
        self.current = Some(piece);
        true
    }

    /// Pops the head of the next-queue and spawns it. `false` when the
    /// queue is empty.
    pub fn spawn_next_piece(&mut self) -> bool {
        match self.next_queue.pop_front() {
            Some(piece_type) => self.spawn_piece(piece_type),
            None => false,
        }
    }

    /// Stamps the current piece into the board, clears any completed rows
    /// and re-arms the hold slot. Returns the number of rows cleared.
    pub fn lock_current_piece(&mut self) -> u32 {
        let Some(piece) = self.current.take() else {
            return 0;
        };
        for (x, y) in piece.absolute_cells() {
            self.board.fill_cell(x, y);
        }
        let cleared = self.board.clear_filled_rows();
        self.lines_cleared += cleared;
        self.hold.reset_turn();
        debug!("locked {}, cleared {cleared} line(s)", piece.piece_type());
        cleared
    }

    /// Stashes the current piece, swapping with any previously held type.
    ///
    /// Allowed once per turn. The first hold of a turn pulls its
    /// replacement from the next-queue; a later hold swaps with the slot.
    /// On failure the slot is restored and `false` comes back.
    pub fn hold_current_piece(&mut self) -> bool {
        if self.game_over || self.hold.used_this_turn() {
            return false;
        }
        let Some(current) = self.current.as_ref() else {
            return false;
        };
        let current_type = current.piece_type();

        match self.hold.piece() {
            None => {
                let Some(next) = self.next_queue.pop_front() else {
                    return false;
                };
                self.hold.set_piece(Some(current_type));
                if !self.spawn_piece(next) {
                    self.hold.set_piece(None);
                    return false;
                }
            }
            Some(held) => {
                self.hold.set_piece(Some(current_type));
                if !self.spawn_piece(held) {
                    self.hold.set_piece(Some(held));
                    return false;
                }
            }
        }
        self.hold.set_used(true);
        true
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}x{} board | current: {} | held: {} | next: {} | lines: {} | game over: {}",
            self.board.width(),
            self.board.height(),
            self.current
                .as_ref()
                .map_or('-', |piece| piece.piece_type().as_char()),
            self.hold.piece().map_or('-', PieceType::as_char),
            if self.next_queue.is_empty() {
                "-".to_string()
            } else {
                self.next_queue.iter().map(|p| p.as_char()).collect()
            },
            self.lines_cleared,
            self.game_over,
        )?;

        let piece_cells = self
            .current
            .as_ref()
            .map(|piece| piece.absolute_cells())
            .unwrap_or([(-1, -1); 4]);
        for y in (0..self.board.height()).rev() {
            for x in 0..self.board.width() {
                let glyph = if piece_cells.contains(&(x, y)) {
                    '@'
                } else if self.board.is_filled(x, y) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("board", &(self.board.width(), self.board.height()))
            .field("current", &self.current.as_ref().map(|p| p.state()))
            .field("held", &self.hold.piece())
            .field("next_queue", &self.next_queue)
            .field("lines_cleared", &self.lines_cleared)
            .field("game_over", &self.game_over)
            .field("rotation_system", &self.rotation_system.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::piece::Rotation;
    use super::*;
    use crate::rotation::Srs;

    fn game() -> GameState {
        GameState::new(10, 20, Arc::new(Srs)).expect("valid dimensions")
    }

    fn state_of(game: &GameState) -> PieceState {
        game.current_piece().expect("active piece").state()
    }

    #[test]
    fn test_spawn_t_fits_empty_board() {
        let mut g = game();
        assert!(g.spawn_piece(PieceType::T));
        assert!(!g.is_game_over());

        let piece = g.current_piece().expect("spawned");
        assert_eq!(piece.position(), Position::new(3, 18));
        let mut cells = piece.absolute_cells();
        cells.sort();
        assert_eq!(cells, [(3, 19), (4, 18), (4, 19), (5, 19)]);
    }

    #[test]
    fn test_spawn_next_pops_queue() {
        let mut g = game();
        assert!(!g.spawn_next_piece());
        g.push_next(PieceType::I);
        g.extend_next([PieceType::O]);
        assert!(g.spawn_next_piece());
        assert_eq!(state_of(&g).piece_type, PieceType::I);
        assert_eq!(g.next_queue().len(), 1);
    }

    #[test]
    fn test_blocked_spawn_sets_game_over() {
        let mut g = game();
        for y in 0..20 {
            g.board_mut().fill_row(y);
        }
        assert!(!g.spawn_piece(PieceType::O));
        assert!(g.is_game_over());
        assert!(g.current_piece().is_none());
        // A finished game ignores all further moves.
        assert!(!g.apply_move(Move::new(MoveKind::Left)));
    }

    #[test]
    fn test_translation_moves() {
        let mut g = game();
        g.spawn_piece(PieceType::T);
        let start = state_of(&g).position;

        assert!(g.apply_move(Move::new(MoveKind::Left)));
        assert!(g.apply_move(Move::new(MoveKind::Down)));
        let moved = state_of(&g).position;
        assert_eq!(moved, start.translated(-1, -1));

        assert!(g.apply_move(Move::new(MoveKind::Right)));
        assert!(g.apply_move(Move::new(MoveKind::Up)));
        assert_eq!(state_of(&g).position, start);
    }

    #[test]
    fn test_blocked_move_leaves_piece_unchanged() {
        let mut g = game();
        g.spawn_piece(PieceType::T);
        let before = state_of(&g);

        // Walk into the left wall.
        for _ in 0..3 {
            assert!(g.apply_move(Move::new(MoveKind::Left)));
        }
        assert!(!g.apply_move(Move::new(MoveKind::Left)));
        assert_eq!(state_of(&g).position, Position::new(0, before.position.y));
    }

    #[test]
    fn test_hard_drop_rests_on_floor() {
        let mut g = game();
        g.spawn_piece(PieceType::O);
        assert!(g.apply_move(Move::new(MoveKind::Right)));
        assert!(g.apply_move(Move::new(MoveKind::HardDrop)));
        assert_eq!(state_of(&g).position, Position::new(4, 0));

        assert_eq!(g.lock_current_piece(), 0);
        assert_eq!(g.board().filled_cell_count(), 4);
        assert!(g.current_piece().is_none());
    }

    #[test]
    fn test_hard_drop_stops_on_stack() {
        let mut g = game();
        g.board_mut().fill_row(0);
        g.board_mut().fill_row(1);
        g.spawn_piece(PieceType::I);
        assert!(g.apply_move(Move::new(MoveKind::HardDrop)));
        assert_eq!(state_of(&g).position.y, 2);
    }

    #[test]
    fn test_drop_position_matches_hard_drop() {
        let mut g = game();
        g.board_mut().fill_row(0);
        g.spawn_piece(PieceType::S);
        let predicted = g.drop_position().expect("active piece");
        assert!(g.apply_move(Move::new(MoveKind::HardDrop)));
        assert_eq!(state_of(&g).position, predicted);
    }

    #[test]
    fn test_pure_rotation() {
        let mut g = game();
        g.spawn_piece(PieceType::T);
        assert!(g.apply_move(Move::new(MoveKind::RotateCw)));
        assert_eq!(state_of(&g).rotation, Rotation::R90);
        assert!(g.apply_move(Move::new(MoveKind::RotateCcw)));
        assert_eq!(state_of(&g).rotation, Rotation::R0);
        assert!(g.apply_move(Move::new(MoveKind::Rotate180)));
        assert_eq!(state_of(&g).rotation, Rotation::R180);
    }

    #[test]
    fn test_wall_kick_against_left_wall() {
        let mut g = game();
        g.spawn_piece(PieceType::I);
        // Walk to the left wall and halfway down: (0, 10), horizontal.
        for _ in 0..3 {
            assert!(g.apply_move(Move::new(MoveKind::Left)));
        }
        for _ in 0..9 {
            assert!(g.apply_move(Move::new(MoveKind::Down)));
        }
        assert_eq!(state_of(&g).position, Position::new(0, 10));

        // Kick test 1 offsets by (-2, 0): off the board, refused.
        let kicked_out = Move::with_kick(MoveKind::RotateCw, 1).expect("rotation");
        assert!(!g.apply_move(kicked_out));
        assert_eq!(state_of(&g).position, Position::new(0, 10));
        assert_eq!(state_of(&g).rotation, Rotation::R0);

        // Kick test 2 offsets by (1, 0): fits, committed.
        let kicked_in = Move::with_kick(MoveKind::RotateCw, 2).expect("rotation");
        assert!(g.apply_move(kicked_in));
        assert_eq!(state_of(&g).position, Position::new(1, 10));
        assert_eq!(state_of(&g).rotation, Rotation::R90);
    }

    #[test]
    fn test_out_of_range_kick_index_fails_the_move() {
        let mut g = game();
        g.spawn_piece(PieceType::T);
        let before = state_of(&g);
        let mv = Move::with_kick(MoveKind::RotateCw, 12).expect("rotation");
        assert!(!g.apply_move(mv));
        assert_eq!(state_of(&g), before);
    }

    #[test]
    fn test_lock_clears_lines_and_counts() {
        let mut g = game();
        for x in 0..8 {
            g.board_mut().fill_cell(x, 0);
        }
        g.spawn_piece(PieceType::O);
        // O spawns spanning columns 3..=4; walk right so it fills 8..=9.
        for _ in 0..5 {
            assert!(g.apply_move(Move::new(MoveKind::Right)));
        }
        assert!(g.apply_move(Move::new(MoveKind::HardDrop)));
        assert_eq!(g.lock_current_piece(), 1);
        assert_eq!(g.lines_cleared(), 1);
        // The O's upper half survives the clear on row 0.
        assert_eq!(g.board().filled_cell_count(), 2);
    }

    #[test]
    fn test_hold_first_time_pulls_from_queue() {
        let mut g = game();
        g.extend_next([PieceType::L]);
        g.spawn_piece(PieceType::T);

        assert!(g.hold_current_piece());
        assert_eq!(g.held_piece(), Some(PieceType::T));
        assert!(g.hold_used());
        assert_eq!(state_of(&g).piece_type, PieceType::L);

        // Second hold in the same turn is refused.
        assert!(!g.apply_move(Move::new(MoveKind::Hold)));
    }

    #[test]
    fn test_hold_swaps_after_lock_rearms() {
        let mut g = game();
        g.extend_next([PieceType::L, PieceType::J]);
        g.spawn_piece(PieceType::T);
        assert!(g.hold_current_piece());

        g.apply_move(Move::new(MoveKind::HardDrop));
        g.lock_current_piece();
        assert!(!g.hold_used());
        assert!(g.spawn_next_piece());

        // Swap J with the held T.
        assert!(g.hold_current_piece());
        assert_eq!(g.held_piece(), Some(PieceType::J));
        assert_eq!(state_of(&g).piece_type, PieceType::T);
    }

    #[test]
    fn test_hold_with_empty_queue_is_refused() {
        let mut g = game();
        g.spawn_piece(PieceType::T);
        assert!(!g.hold_current_piece());
        assert_eq!(g.held_piece(), None);
        assert!(!g.hold_used());
        assert_eq!(state_of(&g).piece_type, PieceType::T);
    }

    #[test]
    fn test_client_setters() {
        let mut g = game();
        g.set_held_piece(Some(PieceType::Z));
        g.set_hold_used(true);
        g.set_lines_cleared(7);
        assert_eq!(g.held_piece(), Some(PieceType::Z));
        assert!(g.hold_used());
        assert_eq!(g.lines_cleared(), 7);

        g.set_game_over(true);
        assert!(!g.apply_move(Move::new(MoveKind::Left)));
        g.set_game_over(false);
        assert!(!g.is_game_over());
    }

    #[test]
    fn test_display_mentions_dimensions() {
        let mut g = game();
        g.extend_next([PieceType::I]);
        g.spawn_piece(PieceType::T);
        let dump = g.to_string();
        assert!(dump.contains("10x20"));
        assert!(dump.lines().count() > 20);
    }
}
