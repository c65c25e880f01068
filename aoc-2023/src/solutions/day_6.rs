use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use nom::{
    bytes::complete::tag,
    character::complete::line_ending,
    sequence::{preceded, separated_pair},
};

use crate::utils::parse::{number_list, run_parser};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 6, tags = ["boat-race", "math"])]
pub struct Solver;

#[derive(Debug)]
pub struct Races {
    times: Vec<u64>,
    distances: Vec<u64>,
}

impl AocParser for Solver {
    type SharedData<'a> = Races;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let (times, distances) = run_parser(
            separated_pair(
                preceded(tag("Time:"), number_list),
                line_ending,
                preceded(tag("Distance:"), number_list),
            ),
            input.trim_start(),
        )?;
        if times.len() != distances.len() {
            return Err(ParseError::InvalidFormat(format!(
                "{} times but {} distances",
                times.len(),
                distances.len()
            )));
        }
        Ok(Races { times, distances })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let product: u64 = shared
            .times
            .iter()
            .zip(&shared.distances)
            .map(|(&t, &d)| winning_holds(t, d))
            .product();
        Ok(product.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let time = concat_digits(&shared.times).map_err(SolveError::failed)?;
        let distance = concat_digits(&shared.distances).map_err(SolveError::failed)?;
        Ok(winning_holds(time, distance).to_string())
    }
}

/// Read the numbers as if the spaces between them were not there
fn concat_digits(values: &[u64]) -> Result<u64, std::num::ParseIntError> {
    values
        .iter()
        .map(u64::to_string)
        .collect::<String>()
        .parse()
}

/// Number of hold times that travel strictly further than `record` in a race of `time` ms
pub fn winning_holds(time: u64, record: u64) -> u64 {
    let beats = |hold: u64| u128::from(hold) * u128::from(time - hold) > u128::from(record);

    // Start near the smaller root of hold * (time - hold) = record, then settle exactly.
    let disc = (time as f64).powi(2) - 4.0 * record as f64;
    if disc < 0.0 {
        return 0;
    }
    let mut lo = (((time as f64 - disc.sqrt()) / 2.0).floor().max(0.0) as u64).min(time);
    while lo > 0 && beats(lo - 1) {
        lo -= 1;
    }
    while lo <= time / 2 && !beats(lo) {
        lo += 1;
    }
    if lo > time / 2 {
        return 0;
    }
    // Distances are symmetric around time / 2.
    time - 2 * lo + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "Time:      7  15   30
Distance:  9  40  200
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "288");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "71503");
    }

    #[test]
    fn single_races() {
        assert_eq!(winning_holds(7, 9), 4);
        assert_eq!(winning_holds(15, 40), 8);
        assert_eq!(winning_holds(30, 200), 9);
        // Exactly matching the record does not win.
        assert_eq!(winning_holds(4, 4), 0);
        assert_eq!(winning_holds(3, 100), 0);
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        assert!(<Solver as AocParser>::parse("Time: 1 2\nDistance: 3\n").is_err());
    }
}
