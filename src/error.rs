use thiserror::Error;

/// Errors raised by construction and lookup paths.
///
/// Recoverable gameplay outcomes (a blocked move, a refused hold, a failed
/// spawn) are reported through boolean returns with the state untouched;
/// these variants cover the cases that are programming errors on the
/// caller's side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("board dimensions {width}x{height} are outside the supported range")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("no rotation system registered under `{0}`")]
    MissingRotationSystem(String),

    #[error("wall kick index {0} supplied for a non-rotation move")]
    WallKickOnNonRotation(usize),

    #[error("wall kick index {index} out of range for a table of {len} tests")]
    WallKickIndexOutOfRange { index: usize, len: usize },

    #[error("`{0}` does not name a tetromino")]
    InvalidPieceType(char),
}
