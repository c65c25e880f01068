//! CLI argument parsing using clap

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Parallelization level for solver execution
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ParallelizeBy {
    /// No parallelization; execute all solvers sequentially in order
    Sequential,
    /// Parallelize across years; days and parts run sequentially within each year
    Year,
    /// Parallelize across year/day combinations; parts run sequentially (default)
    #[default]
    Day,
    /// Parallelize across all year/day/part combinations
    Part,
}

/// Advent of Code 2023 solver runner
#[derive(Parser, Debug)]
#[command(name = "aoc", about = "Run Advent of Code 2023 solvers", version)]
pub struct Args {
    /// Puzzle year
    #[arg(short, long, default_value_t = 2023)]
    pub year: u16,

    /// Day to run (all registered days if omitted; the next new day with --new)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: Option<u8>,

    /// Part to run (runs all parts if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub part: Option<u8>,

    /// Only run solvers carrying all of these tags (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Where puzzle inputs are stored, as `{year}/day{dd}.txt`
    #[arg(long, default_value = "inputs")]
    pub inputs_dir: PathBuf,

    /// Where recorded answers are stored, as `{year}/day{dd}.txt`
    #[arg(long, default_value = "answers")]
    pub answers_dir: PathBuf,

    /// Record the answers as the expected results
    #[arg(short, long, conflicts_with = "test")]
    pub record: bool,

    /// Check the answers against the recorded results
    #[arg(short, long)]
    pub test: bool,

    /// Number of threads for parallel execution
    #[arg(long)]
    pub threads: Option<usize>,

    /// Parallelization level: sequential, year, day, or part
    #[arg(long, value_enum, default_value = "day")]
    pub parallelize_by: ParallelizeBy,

    /// Quiet mode - only output answers
    #[arg(short, long)]
    pub quiet: bool,

    /// More diagnostics on stderr (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Start a new day: wait for unlock, download the input, scaffold the solver
    #[arg(short, long, conflicts_with_all = ["record", "test", "part"])]
    pub new: bool,

    /// With --new, do not wait for the puzzle to unlock
    #[arg(long, requires = "new")]
    pub no_wait: bool,

    /// Solutions module directory that --new scaffolds into
    #[arg(long, default_value = "aoc-2023/src/solutions")]
    pub solutions_dir: PathBuf,
}
