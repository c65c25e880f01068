use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use nom::{character::complete::line_ending, multi::separated_list1};

use crate::utils::parse::{number_list, run_parser};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 9, tags = ["mirage-maintenance", "sequences"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = Vec<Vec<i64>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        run_parser(separated_list1(line_ending, number_list), input.trim_start())
    }
}

/// Next value of the sequence by repeated differencing
pub fn extrapolate(values: &[i64]) -> i64 {
    if values.iter().all(|&v| v == 0) {
        return 0;
    }
    let diffs: Vec<i64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    values.last().copied().unwrap_or(0) + extrapolate(&diffs)
}

/// Value before the first one
pub fn extrapolate_back(values: &[i64]) -> i64 {
    let reversed: Vec<i64> = values.iter().rev().copied().collect();
    extrapolate(&reversed)
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().map(|s| extrapolate(s)).sum::<i64>().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .iter()
            .map(|s| extrapolate_back(s))
            .sum::<i64>()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "0 3 6 9 12 15
1 3 6 10 15 21
10 13 16 21 30 45
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "114");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "2");
    }

    #[test]
    fn short_and_negative_sequences() {
        assert_eq!(extrapolate(&[5]), 5);
        assert_eq!(extrapolate(&[]), 0);
        assert_eq!(extrapolate(&[-1, -4, -9, -16]), -25);
        assert_eq!(extrapolate_back(&[10, 13, 16, 21, 30, 45]), 5);
    }
}
