use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::parse::lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 1, tags = ["trebuchet", "strings"])]
pub struct Solver;

const SPELLED: [&str; 9] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

impl AocParser for Solver {
    type SharedData<'a> = Vec<&'a str>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let lines: Vec<&str> = lines(input).collect();
        if lines.is_empty() {
            return Err(ParseError::MissingData("no calibration lines".into()));
        }
        Ok(lines)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(calibration_sum(shared, false).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(calibration_sum(shared, true).to_string())
    }
}

/// Sum of the two-digit calibration values; lines without any digit count as 0
pub fn calibration_sum(lines: &[&str], spelled: bool) -> u32 {
    lines.iter().map(|line| calibration_value(line, spelled)).sum()
}

pub fn calibration_value(line: &str, spelled: bool) -> u32 {
    let bytes = line.as_bytes();
    let first = (0..bytes.len()).find_map(|i| digit_at(bytes, i, spelled));
    let last = (0..bytes.len()).rev().find_map(|i| digit_at(bytes, i, spelled));
    match (first, last) {
        (Some(first), Some(last)) => first * 10 + last,
        _ => 0,
    }
}

// Spelled digits may overlap ("eightwo"), so every position is tried on its own.
fn digit_at(bytes: &[u8], i: usize, spelled: bool) -> Option<u32> {
    if bytes[i].is_ascii_digit() {
        return Some(u32::from(bytes[i] - b'0'));
    }
    if !spelled {
        return None;
    }
    SPELLED
        .iter()
        .position(|word| bytes[i..].starts_with(word.as_bytes()))
        .map(|idx| idx as u32 + 1)
}
