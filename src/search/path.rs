//! Breadth-first exploration of the reachable piece states.

use std::collections::{HashSet, VecDeque};

use log::debug;

use super::{tspin, LandingPosition, SearchAlgorithm, SearchConfig, TSpinType};
use crate::game::board::Board;
use crate::game::moves::{Move, MoveKind};
use crate::game::piece::{Piece, PieceState, PieceType};
use crate::game::GameState;

/// One explored state. Nodes live in a flat arena and point back at their
/// parents by index; walking those links reproduces the move path.
struct Node {
    state: PieceState,
    parent: Option<usize>,
    last_move: Option<Move>,
    depth: u32,
}

struct Exploration {
    nodes: Vec<Node>,
    landings: Vec<usize>,
    target_index: Option<usize>,
}

/// BFS over `(type, position, rotation)` states.
///
/// Rotations here are pure: no kick tables are consulted, a rotated state
/// is kept only when it fits as-is. Because every state is enqueued at
/// most once, the parent chain of any node is a shortest move path to it.
fn explore(
    game: &GameState,
    root: &Piece,
    max_depth: u32,
    config: &SearchConfig,
    target: Option<PieceState>,
) -> Exploration {
    let board = game.board();
    let mut exploration = Exploration {
        nodes: Vec::new(),
        landings: Vec::new(),
        target_index: None,
    };
    if !board.piece_fits(root) {
        return exploration;
    }

    let mut alphabet = vec![MoveKind::Left, MoveKind::Right];
    if config.allow_soft_drop {
        alphabet.push(MoveKind::Down);
    }
    alphabet.push(MoveKind::RotateCw);
    alphabet.push(MoveKind::RotateCcw);
    if config.allow_rotate_180 {
        alphabet.push(MoveKind::Rotate180);
    }
    if config.allow_hard_drop {
        alphabet.push(MoveKind::HardDrop);
    }

    let root_state = root.state();
    let mut probe = root.clone();
    exploration.nodes.push(Node {
        state: root_state,
        parent: None,
        last_move: None,
        depth: 0,
    });
    let mut visited = HashSet::from([root_state]);
    let mut queue = VecDeque::from([0usize]);
    if target == Some(root_state) {
        exploration.target_index = Some(0);
        return exploration;
    }

    'bfs: while let Some(index) = queue.pop_front() {
        let (state, depth, last_move) = {
            let node = &exploration.nodes[index];
            (node.state, node.depth, node.last_move)
        };

        // A landing is a state whose one-down translation collides.
        probe.set_state(state);
        probe.set_position(state.position.translated(0, -1));
        if !board.piece_fits(&probe) {
            let record = !config.last_rotation_only
                || last_move.is_some_and(|mv| mv.is_rotation());
            if record {
                exploration.landings.push(index);
            }
        }

        if max_depth > 0 && depth >= max_depth {
            continue;
        }

        for &kind in &alphabet {
            let mut next = state;
            match kind {
                MoveKind::Left => next.position.x -= 1,
                MoveKind::Right => next.position.x += 1,
                MoveKind::Down => next.position.y -= 1,
                MoveKind::RotateCw => next.rotation = state.rotation.cw(),
                MoveKind::RotateCcw => next.rotation = state.rotation.ccw(),
                MoveKind::Rotate180 => next.rotation = state.rotation.flip(),
                MoveKind::HardDrop => {}
                _ => continue,
            }
            probe.set_state(next);
            if !board.piece_fits(&probe) {
                continue;
            }
            if kind == MoveKind::HardDrop || config.is_20g {
                next = settle(board, &mut probe, next);
            }
            if !visited.insert(next) {
                continue;
            }

            let child = exploration.nodes.len();
            exploration.nodes.push(Node {
                state: next,
                parent: Some(index),
                last_move: Some(Move::new(kind)),
                depth: depth + 1,
            });
            if target == Some(next) {
                exploration.target_index = Some(child);
                break 'bfs;
            }
            queue.push_back(child);
        }
    }

    exploration
}

/// Slides a fitting state straight down until it rests.
fn settle(board: &Board, probe: &mut Piece, state: PieceState) -> PieceState {
    let mut settled = state;
    loop {
        let below = settled.position.translated(0, -1);
        probe.set_position(below);
        if board.piece_fits(probe) {
            settled.position = below;
        } else {
            probe.set_position(settled.position);
            return settled;
        }
    }
}

/// Emits `last_move` from each parent link, root to node.
fn reconstruct_path(nodes: &[Node], mut index: usize) -> Vec<Move> {
    let mut path = Vec::new();
    loop {
        let node = &nodes[index];
        match (node.parent, node.last_move) {
            (Some(parent), Some(mv)) => {
                path.push(mv);
                index = parent;
            }
            _ => break,
        }
    }
    path.reverse();
    path
}

/// Full rows a lock at the piece's position would produce.
fn lines_after_lock(board: &Board, piece: &Piece) -> u32 {
    let mut scratch = board.clone();
    for (x, y) in piece.absolute_cells() {
        scratch.fill_cell(x, y);
    }
    let mut full = 0;
    for y in 0..scratch.height() {
        if scratch.is_row_filled(y) {
            full += 1;
        }
    }
    full
}

pub(super) fn collect_landings(
    game: &GameState,
    piece: &Piece,
    max_depth: u32,
    config: &SearchConfig,
) -> Vec<LandingPosition> {
    let exploration = explore(game, piece, max_depth, config, None);
    let board = game.board();
    let mut template = piece.clone();

    let landings: Vec<LandingPosition> = exploration
        .landings
        .iter()
        .map(|&index| {
            let node = &exploration.nodes[index];
            template.set_state(node.state);
            let landed = template.clone();
            let t_spin = if landed.piece_type() == PieceType::T {
                tspin::classify_t_spin(board, &landed, node.last_move)
            } else {
                TSpinType::None
            };
            let lines_cleared = Some(lines_after_lock(board, &landed));
            LandingPosition {
                path: reconstruct_path(&exploration.nodes, index),
                piece: landed,
                t_spin,
                lines_cleared,
                valid: true,
            }
        })
        .collect();

    debug!(
        "search explored {} states, found {} landings",
        exploration.nodes.len(),
        landings.len()
    );
    landings
}

pub(super) fn search_path(
    game: &GameState,
    start: &Piece,
    target: &Piece,
    config: &SearchConfig,
) -> Vec<Move> {
    let exploration = explore(game, start, 0, config, Some(target.state()));
    exploration
        .target_index
        .map(|index| reconstruct_path(&exploration.nodes, index))
        .unwrap_or_default()
}

/// The stock landing-position search.
#[derive(Debug, Clone, Default)]
pub struct PathSearch {
    config: SearchConfig,
}

impl PathSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl SearchAlgorithm for PathSearch {
    fn name(&self) -> &str {
        "PathSearch"
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
        collect_landings(game, piece, max_depth, &self.config)
    }

    fn find_path(&self, game: &GameState, start: &Piece, target: &Piece) -> Vec<Move> {
        search_path(game, start, target, &self.config)
    }

    fn clone_algorithm(&self) -> Box<dyn SearchAlgorithm> {
        Box::new(self.clone())
    }
}
