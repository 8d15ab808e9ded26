use thiserror::Error;

/// The full failure taxonomy of the engine.
///
/// Everything else that stops a generation run (empty frontier, exhausted
/// edge list, exhausted backtracking stack) is normal termination, not an
/// error.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Grid construction was given a non-positive width or height. Fatal,
    /// surfaced to the caller at construction time.
    #[error("invalid grid dimensions {width}x{height}, width and height must be positive")]
    InvalidDimension { width: isize, height: isize },

    /// A strategy asked the random source to pick from an empty candidate
    /// set. Unreachable given correct bounds logic.
    #[error("cannot choose uniformly from an empty sequence")]
    EmptyChoice,
}

pub type Result<T> = ::std::result::Result<T, MazeError>;
