//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;
use thiserror_ext::Arc as ArcDerive;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("HTTP client error: {0}")]
    Http(#[from] aoc_http_client::AocError),

    #[error("Registration error: {0}")]
    Registration(#[from] aoc_solver::RegistrationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Some answers differ from (or are missing in) the recorded ones
    #[error("{0} answer(s) did not match the recorded results")]
    AnswerMismatch(usize),

    /// Some solvers failed to parse or solve
    #[error("{0} solver(s) failed")]
    SolverFailures(usize),

    /// Executor error (wraps Arc for cheap cloning)
    #[error("{0}")]
    Executor(#[from] ArcExecutorError),
}

/// Executor-specific errors
#[derive(Error, Debug, ArcDerive)]
#[thiserror_ext(newtype(name = ArcExecutorError))]
pub enum ExecutorError {
    #[error("Input unavailable for {year}/{day:02}: {source}")]
    Input {
        year: u16,
        day: u8,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP client unavailable: {0}")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Channel send error")]
    ChannelSend,

    #[error("Thread pool creation failed: {0}")]
    ThreadPool(String),

    /// Multiple errors collected during parallel execution
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<ArcExecutorError>),
}

impl ArcExecutorError {
    /// Merge two errors into one `Multiple`, flattening either side that already is one
    pub fn combine(first: ArcExecutorError, second: ArcExecutorError) -> ArcExecutorError {
        let flatten = |e: ArcExecutorError| match e.inner() {
            ExecutorError::Multiple(v) => v.clone(),
            _ => vec![e],
        };
        let mut errors = flatten(first);
        errors.extend(flatten(second));
        ExecutorError::Multiple(errors).into()
    }

    pub fn combine_opt(
        existing: Option<ArcExecutorError>,
        new: ArcExecutorError,
    ) -> ArcExecutorError {
        match existing {
            Some(e) => Self::combine(e, new),
            None => new,
        }
    }
}

/// Input and answer store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: expected `part<N>: <answer>`", path.display())]
    Malformed { path: PathBuf, line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(msg: &str) -> ArcExecutorError {
        ExecutorError::ThreadPool(msg.to_string()).into()
    }

    fn count(e: &ArcExecutorError) -> usize {
        match e.inner() {
            ExecutorError::Multiple(v) => v.len(),
            _ => 1,
        }
    }

    #[test]
    fn combining_flattens() {
        let ab = ArcExecutorError::combine(leaf("a"), leaf("b"));
        assert_eq!(count(&ab), 2);
        let abc = ArcExecutorError::combine(ab.clone(), leaf("c"));
        assert_eq!(count(&abc), 3);
        let cab = ArcExecutorError::combine(leaf("c"), ab.clone());
        assert_eq!(count(&cab), 3);
        assert_eq!(count(&ArcExecutorError::combine(ab, abc)), 5);
    }

    #[test]
    fn combine_with_nothing() {
        let e = ArcExecutorError::combine_opt(None, leaf("a"));
        assert_eq!(e.to_string(), "Thread pool creation failed: a");
    }
}
