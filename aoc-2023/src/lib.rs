//! Advent of Code 2023 solutions with automatic registration
//!
//! Every day lives in [`solutions`] and registers itself through
//! `#[derive(AutoRegisterSolver)]`; the CLI links this crate and picks the
//! solvers up from the plugin inventory. [`utils`] holds the pieces shared
//! between days.

pub mod solutions;
pub mod utils;
