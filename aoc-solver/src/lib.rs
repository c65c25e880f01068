//! Advent of Code solver framework
//!
//! Each puzzle is a type implementing [`AocParser`] (input to shared data)
//! and [`PartSolver<N>`] for every part. `#[derive(AocSolver)]` ties the
//! parts together into a [`Solver`], and `#[derive(AutoRegisterSolver)]`
//! submits it as a [`SolverPlugin`] so a [`SolverRegistry`] can find it at
//! runtime.
//!
//! ```
//! use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverRegistryBuilder};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2)]
//! struct Trebuchet;
//!
//! impl AocParser for Trebuchet {
//!     type SharedData<'a> = Vec<u32>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .lines()
//!             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Trebuchet {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().sum::<u32>().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Trebuchet {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().max().copied().unwrap_or_default().to_string())
//!     }
//! }
//!
//! let registry = SolverRegistryBuilder::new()
//!     .register::<Trebuchet>(2023, 1)
//!     .unwrap()
//!     .build();
//!
//! let mut solver = registry.create_solver(2023, 1, "12\n38\n15").unwrap();
//! assert_eq!(solver.solve(1).unwrap().answer, "65");
//! assert_eq!(solver.solve(2).unwrap().answer, "38");
//! ```

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance};
pub use registry::{
    FactoryInfo, RegisterableSolver, SolverFactory, SolverFactoryStorage, SolverPlugin,
    SolverRegistry, SolverRegistryBuilder, BASE_YEAR, CAPACITY, DAYS_PER_YEAR, MAX_YEARS,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Used by the code `AutoRegisterSolver` expands to
pub use inventory;

pub use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
