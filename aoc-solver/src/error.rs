//! Errors raised while registering, parsing and solving puzzles

use thiserror::Error;

/// Error type for parsing puzzle input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input doesn't have the shape the parser expects
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// Something the puzzle needs is absent from the input
    #[error("Missing data: {0}")]
    MissingData(String),
    #[error("Parse error: {0}")]
    Other(String),
}

/// Error type for solving a specific part
#[derive(Debug, Error)]
pub enum SolveError {
    /// The solver has no implementation for this part
    #[error("Part {0} is not implemented")]
    PartNotImplemented(u8),
    /// The requested part number is out of range (0 or above the solver's part count)
    #[error("Part {0} is out of range")]
    PartOutOfRange(u8),
    /// The part's algorithm gave up
    #[error("Solve failed: {0}")]
    SolveFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SolveError {
    /// Wrap any error into [`SolveError::SolveFailed`]
    pub fn failed<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        SolveError::SolveFailed(err.into())
    }
}

/// Error from looking up, parsing or running a registered solver
#[derive(Debug, Error)]
pub enum SolverError {
    /// Nothing registered for this year and day
    #[error("Solver not found for year {0} day {1}")]
    NotFound(u16, u8),
    /// Year or day outside the supported range
    #[error("Invalid year {0} or day {1}")]
    InvalidYearDay(u16, u8),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("Solve error: {0}")]
    SolveError(#[from] SolveError),
}

/// Error type for registration failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Two solvers claim the same year and day
    #[error("Duplicate solver registration for year {0} day {1}")]
    DuplicateSolver(u16, u8),
    /// Year or day outside the supported range
    #[error("Invalid year {0} or day {1} for registration")]
    InvalidYearDay(u16, u8),
}
