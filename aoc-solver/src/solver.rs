//! Core solver traits

use crate::error::{ParseError, SolveError};

/// Parses puzzle input into the data shared by every part of a solver.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError};
///
/// struct Calibration;
///
/// impl AocParser for Calibration {
///     type SharedData<'a> = Vec<&'a str>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         let lines: Vec<_> = input.lines().filter(|l| !l.is_empty()).collect();
///         if lines.is_empty() {
///             return Err(ParseError::MissingData("no calibration lines".into()));
///         }
///         Ok(lines)
///     }
/// }
///
/// assert_eq!(Calibration::parse("1abc2\npqr3stu8vwx").unwrap().len(), 2);
/// ```
pub trait AocParser {
    /// Parsed input plus any intermediate results one part leaves for another.
    ///
    /// Owned structs are the common case. Borrowing from the input (`&'a str`)
    /// works when no transformation is needed.
    type SharedData<'a>;

    /// Parse the raw puzzle input.
    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError>;
}

/// Solves part `N` of a puzzle.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
///
/// struct Depths;
///
/// impl AocParser for Depths {
///     type SharedData<'a> = Vec<u32>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
///             .collect()
///     }
/// }
///
/// impl PartSolver<1> for Depths {
///     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         Ok(shared.windows(2).filter(|w| w[1] > w[0]).count().to_string())
///     }
/// }
///
/// let mut shared = Depths::parse("1\n3\n2\n5").unwrap();
/// assert_eq!(<Depths as PartSolver<1>>::solve(&mut shared).unwrap(), "2");
/// ```
pub trait PartSolver<const N: u8>: AocParser {
    /// Solve this part using (and possibly updating) the shared data.
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError>;
}

/// A complete solver: parsing plus dispatch to each of its parts.
///
/// Usually derived with `#[derive(AocSolver)]`, which forwards part `N` to
/// `PartSolver<N>`.
pub trait Solver: AocParser {
    /// Number of parts this solver implements
    const PARTS: u8;

    /// Solve a specific part of the problem
    ///
    /// # Returns
    /// * `Ok(String)` - The answer for this part
    /// * `Err(SolveError::PartNotImplemented)` - The part is not implemented
    /// * `Err(SolveError::SolveFailed)` - An error occurred while solving
    fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError>;
}

/// Range-checked part dispatch, available on every [`Solver`].
pub trait SolverExt: Solver {
    /// Like [`Solver::solve_part`] but rejects part `0` and parts above
    /// [`Solver::PARTS`] with [`SolveError::PartOutOfRange`].
    fn solve_part_checked_range(
        shared: &mut Self::SharedData<'_>,
        part: u8,
    ) -> Result<String, SolveError> {
        if (1..=Self::PARTS).contains(&part) {
            Self::solve_part(shared, part)
        } else {
            Err(SolveError::PartOutOfRange(part))
        }
    }
}

impl<T: Solver + ?Sized> SolverExt for T {}
