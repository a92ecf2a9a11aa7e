//! The Super Rotation System: standard guideline shapes and kick tables.

use super::{RotationSystem, WallKickData};
use crate::game::piece::{PieceState, PieceType, Position, Rotation};

/// Shape bitmaps, one u16 per rotation, bit `y * 4 + x`.
///
/// Diagrams read with the first row at y = 0. Indexed R0, R90, R180, R270.

// .... / #### / .... / ....
const I_SHAPES: [u16; 4] = [0x00F0, 0x4444, 0x0F00, 0x2222];

// #... / ###. / ....
const J_SHAPES: [u16; 4] = [0x0071, 0x0226, 0x0470, 0x0322];

// ..#. / ###. / ....
const L_SHAPES: [u16; 4] = [0x0074, 0x0622, 0x0170, 0x0223];

// .##. / .##. / ....
const O_SHAPES: [u16; 4] = [0x0066, 0x0066, 0x0066, 0x0066];

// .##. / ##.. / ....
const S_SHAPES: [u16; 4] = [0x0036, 0x0462, 0x0360, 0x0231];

// .#.. / ###. / ....
const T_SHAPES: [u16; 4] = [0x0072, 0x0262, 0x0270, 0x0232];

// ##.. / .##. / ....
const Z_SHAPES: [u16; 4] = [0x0063, 0x0264, 0x0630, 0x0132];

/// J/L/S/T/Z clockwise kicks, indexed by the rotation being left.
static JLSTZ_CW_KICKS: [[(i32, i32); 5]; 4] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // R0 -> R90
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // R90 -> R180
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // R180 -> R270
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // R270 -> R0
];

/// J/L/S/T/Z counter-clockwise kicks.
static JLSTZ_CCW_KICKS: [[(i32, i32); 5]; 4] = [
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // R0 -> R270
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // R90 -> R0
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // R180 -> R90
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // R270 -> R180
];

/// The I piece kicks differently around its long axis.
static I_CW_KICKS: [[(i32, i32); 5]; 4] = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // R0 -> R90
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // R90 -> R180
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // R180 -> R270
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // R270 -> R0
];

static I_CCW_KICKS: [[(i32, i32); 5]; 4] = [
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // R0 -> R270
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // R90 -> R0
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // R180 -> R90
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // R270 -> R180
];

/// O never leaves its cell, and SRS has no real 180 kicks.
static IDENTITY_KICKS: [(i32, i32); 1] = [(0, 0)];

/// The Super Rotation System.
#[derive(Debug, Clone, Copy, Default)]
pub struct Srs;

impl RotationSystem for Srs {
    fn name(&self) -> &str {
        "SRS"
    }

    fn shape(&self, piece: PieceType, rotation: Rotation) -> u16 {
        let shapes = match piece {
            PieceType::I => &I_SHAPES,
            PieceType::J => &J_SHAPES,
            PieceType::L => &L_SHAPES,
            PieceType::O => &O_SHAPES,
            PieceType::S => &S_SHAPES,
            PieceType::T => &T_SHAPES,
            PieceType::Z => &Z_SHAPES,
        };
        shapes[rotation.index()]
    }

    fn clockwise_wall_kicks(&self, piece: PieceType, from: Rotation) -> WallKickData {
        match piece {
            PieceType::O => WallKickData::new(&IDENTITY_KICKS),
            PieceType::I => WallKickData::new(&I_CW_KICKS[from.index()]),
            _ => WallKickData::new(&JLSTZ_CW_KICKS[from.index()]),
        }
    }

    fn counter_clockwise_wall_kicks(&self, piece: PieceType, from: Rotation) -> WallKickData {
        match piece {
            PieceType::O => WallKickData::new(&IDENTITY_KICKS),
            PieceType::I => WallKickData::new(&I_CCW_KICKS[from.index()]),
            _ => WallKickData::new(&JLSTZ_CCW_KICKS[from.index()]),
        }
    }

    fn rotate_180_wall_kicks(&self, _piece: PieceType, _from: Rotation) -> WallKickData {
        WallKickData::new(&IDENTITY_KICKS)
    }

    fn initial_state(&self, piece: PieceType, board_width: i32, board_height: i32) -> PieceState {
        PieceState::new(
            piece,
            Position::new((board_width - 4) / 2, (board_height - 1).min(21)),
            Rotation::R0,
        )
    }

    fn supports_180(&self) -> bool {
        false
    }

    fn clone_system(&self) -> Box<dyn RotationSystem> {
        Box::new(*self)
    }
}
