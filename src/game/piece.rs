use std::fmt;
use std::sync::Arc;

use crate::error::EngineError;
use crate::rotation::RotationSystem;

/// The 7 standard tetromino types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PieceType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceType {
    pub const ALL: [PieceType; 7] = [
        PieceType::I,
        PieceType::J,
        PieceType::L,
        PieceType::O,
        PieceType::S,
        PieceType::T,
        PieceType::Z,
    ];

    /// Single-letter name, as used in queue displays and notation.
    pub fn as_char(self) -> char {
        match self {
            PieceType::I => 'I',
            PieceType::J => 'J',
            PieceType::L => 'L',
            PieceType::O => 'O',
            PieceType::S => 'S',
            PieceType::T => 'T',
            PieceType::Z => 'Z',
        }
    }
}

impl TryFrom<char> for PieceType {
    type Error = EngineError;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        match letter.to_ascii_uppercase() {
            'I' => Ok(PieceType::I),
            'J' => Ok(PieceType::J),
            'L' => Ok(PieceType::L),
            'O' => Ok(PieceType::O),
            'S' => Ok(PieceType::S),
            'T' => Ok(PieceType::T),
            'Z' => Ok(PieceType::Z),
            _ => Err(EngineError::InvalidPieceType(letter)),
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Rotation state of a piece. Arithmetic is modulo 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn cw(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    pub fn ccw(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R270,
            Rotation::R90 => Rotation::R0,
            Rotation::R180 => Rotation::R90,
            Rotation::R270 => Rotation::R180,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R180,
            Rotation::R90 => Rotation::R270,
            Rotation::R180 => Rotation::R0,
            Rotation::R270 => Rotation::R90,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }
}

/// A cell position on the board. Origin (0, 0) is the bottom-left corner;
/// x grows to the right and y grows upward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The full identity of a falling piece: what it is, where it is, and how
/// it is rotated. This is the key the placement search deduplicates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PieceState {
    pub piece_type: PieceType,
    pub position: Position,
    pub rotation: Rotation,
}

impl PieceState {
    pub fn new(piece_type: PieceType, position: Position, rotation: Rotation) -> Self {
        Self {
            piece_type,
            position,
            rotation,
        }
    }
}

/// A piece bound to a rotation system.
///
/// The shape mask and everything derived from it (bounding size, cell
/// list, column profile) are recomputed whenever the state or the rotation
/// system changes. Cells are normalized so the filled part of the shape
/// has its bottom-left corner at the piece's position.
#[derive(Clone)]
pub struct Piece {
    state: PieceState,
    rotation_system: Arc<dyn RotationSystem>,
    shape: u16,
    width: i32,
    height: i32,
    cells: [(i32, i32); 4],
    column_heights: [i32; 4],
    column_bottoms: [i32; 4],
}

impl Piece {
    pub fn new(state: PieceState, rotation_system: Arc<dyn RotationSystem>) -> Self {
        let mut piece = Self {
            state,
            rotation_system,
            shape: 0,
            width: 0,
            height: 0,
            cells: [(0, 0); 4],
            column_heights: [0; 4],
            column_bottoms: [0; 4],
        };
        piece.derive_shape();
        piece
    }

    pub fn state(&self) -> PieceState {
        self.state
    }

    pub fn piece_type(&self) -> PieceType {
        self.state.piece_type
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    pub fn rotation(&self) -> Rotation {
        self.state.rotation
    }

    pub fn rotation_system(&self) -> &Arc<dyn RotationSystem> {
        &self.rotation_system
    }

    /// Raw 16-bit occupancy mask of the 4x4 shape, bit `y * 4 + x`.
    pub fn shape_mask(&self) -> u16 {
        self.shape
    }

    /// Width of the tight bounding box of the filled cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height of the tight bounding box of the filled cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Topmost filled cell + 1 for each shape column, 0 for empty columns.
    pub fn column_heights(&self) -> &[i32; 4] {
        &self.column_heights
    }

    /// Bottommost filled cell for each shape column, 0 for empty columns.
    pub fn column_bottoms(&self) -> &[i32; 4] {
        &self.column_bottoms
    }

    pub fn set_state(&mut self, state: PieceState) {
        self.state = state;
        self.derive_shape();
    }

    /// Moves the piece without touching type or rotation. Shape metadata
    /// is position-independent, so nothing needs re-deriving.
    pub fn set_position(&mut self, position: Position) {
        self.state.position = position;
    }

    pub fn set_rotation_system(&mut self, rotation_system: Arc<dyn RotationSystem>) {
        self.rotation_system = rotation_system;
        self.derive_shape();
    }

    /// The 4 filled cells with x in `0..width` and y in `0..height`,
    /// relative to the piece's bottom-left.
    pub fn filled_cells(&self) -> &[(i32, i32); 4] {
        &self.cells
    }

    /// The 4 filled cells translated by the piece's position.
    pub fn absolute_cells(&self) -> [(i32, i32); 4] {
        let Position { x, y } = self.state.position;
        self.cells.map(|(cx, cy)| (x + cx, y + cy))
    }

    fn derive_shape(&mut self) {
        let mask = self
            .rotation_system
            .shape(self.state.piece_type, self.state.rotation);
        self.shape = mask;

        let mut raw = [(0i32, 0i32); 4];
        let mut count = 0;
        for bit in 0..16i32 {
            if (mask >> bit) & 1 != 0 && count < 4 {
                raw[count] = (bit % 4, bit / 4);
                count += 1;
            }
        }
        debug_assert_eq!(count, 4, "shape mask must contain exactly 4 cells");

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (3, 3, 0, 0);
        for &(x, y) in &raw {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        self.width = max_x - min_x + 1;
        self.height = max_y - min_y + 1;
        self.cells = raw.map(|(x, y)| (x - min_x, y - min_y));

        self.column_heights = [0; 4];
        self.column_bottoms = [0; 4];
        for column in 0..4 {
            let mut top: Option<i32> = None;
            let mut bottom: Option<i32> = None;
            for &(x, y) in &self.cells {
                if x == column {
                    top = Some(top.map_or(y + 1, |t| t.max(y + 1)));
                    bottom = Some(bottom.map_or(y, |b| b.min(y)));
                }
            }
            self.column_heights[column as usize] = top.unwrap_or(0);
            self.column_bottoms[column as usize] = bottom.unwrap_or(0);
        }
    }
}

impl PartialEq for Piece {
    /// Pieces compare by state; the rotation system is shared configuration.
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Eq for Piece {}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Piece")
            .field("state", &self.state)
            .field("rotation_system", &self.rotation_system.name())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Srs;

    fn srs() -> Arc<dyn RotationSystem> {
        Arc::new(Srs)
    }

    #[test]
    fn test_rotation_cycle() {
        let r = Rotation::R0;
        assert_eq!(r.cw().cw().cw().cw(), Rotation::R0);
        assert_eq!(r.ccw().ccw().ccw().ccw(), Rotation::R0);
        assert_eq!(r.cw(), r.ccw().flip());
    }

    #[test]
    fn test_rotation_round_trips() {
        for r in [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270] {
            assert_eq!(r.cw().ccw(), r);
            assert_eq!(r.ccw().cw(), r);
            assert_eq!(r.flip().flip(), r);
        }
    }

    #[test]
    fn test_piece_type_letters() {
        for piece_type in PieceType::ALL {
            assert_eq!(PieceType::try_from(piece_type.as_char()), Ok(piece_type));
        }
        assert_eq!(
            PieceType::try_from('X'),
            Err(EngineError::InvalidPieceType('X'))
        );
    }

    #[test]
    fn test_t_piece_metadata() {
        let piece = Piece::new(
            PieceState::new(PieceType::T, Position::new(3, 19), Rotation::R0),
            srs(),
        );
        assert_eq!(piece.width(), 3);
        assert_eq!(piece.height(), 2);

        let mut cells = *piece.filled_cells();
        cells.sort();
        assert_eq!(cells, [(0, 1), (1, 0), (1, 1), (2, 1)]);

        assert_eq!(piece.column_heights()[..3], [2, 2, 2]);
        assert_eq!(piece.column_bottoms()[..3], [1, 0, 1]);
    }

    #[test]
    fn test_absolute_cells_translate_by_position() {
        let piece = Piece::new(
            PieceState::new(PieceType::T, Position::new(3, 19), Rotation::R0),
            srs(),
        );
        let mut cells = piece.absolute_cells();
        cells.sort();
        assert_eq!(cells, [(3, 20), (4, 19), (4, 20), (5, 20)]);
    }

    #[test]
    fn test_i_piece_is_flat_then_tall() {
        let mut piece = Piece::new(
            PieceState::new(PieceType::I, Position::new(0, 0), Rotation::R0),
            srs(),
        );
        assert_eq!((piece.width(), piece.height()), (4, 1));

        let mut state = piece.state();
        state.rotation = Rotation::R90;
        piece.set_state(state);
        assert_eq!((piece.width(), piece.height()), (1, 4));
    }

    #[test]
    fn test_o_piece_rotation_invariant() {
        let base = Piece::new(
            PieceState::new(PieceType::O, Position::new(4, 4), Rotation::R0),
            srs(),
        );
        for rotation in [Rotation::R90, Rotation::R180, Rotation::R270] {
            let other = Piece::new(
                PieceState::new(PieceType::O, Position::new(4, 4), rotation),
                srs(),
            );
            assert_eq!(base.filled_cells(), other.filled_cells());
        }
    }

    #[test]
    fn test_state_is_hashable_key() {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        let state = PieceState::new(PieceType::S, Position::new(2, 5), Rotation::R90);
        assert!(seen.insert(state));
        assert!(!seen.insert(state));
        assert!(seen.insert(PieceState::new(
            PieceType::S,
            Position::new(2, 5),
            Rotation::R270
        )));
    }
}
