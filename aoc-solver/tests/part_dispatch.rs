//! Part dispatch generated by `#[derive(AocSolver)]` and range checking

use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, Solver, SolverExt};
use proptest::prelude::*;

/// Sum and product of a list of readings
#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
struct Readings;

impl AocParser for Readings {
    type SharedData<'a> = Vec<i64>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        input
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
            .collect()
    }
}

impl PartSolver<1> for Readings {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().sum::<i64>().to_string())
    }
}

impl PartSolver<2> for Readings {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().product::<i64>().to_string())
    }
}

/// Single part, borrowing from the input
#[derive(AocSolver)]
#[aoc_solver(max_parts = 1)]
struct OnlyFirst;

impl AocParser for OnlyFirst {
    type SharedData<'a> = &'a str;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        Ok(input.trim())
    }
}

impl PartSolver<1> for OnlyFirst {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.chars().rev().collect())
    }
}

#[derive(Debug)]
struct Cached {
    words: Vec<String>,
    longest: Option<usize>,
}

/// Part 1 leaves a result behind for part 2
#[derive(AocSolver)]
#[aoc_solver(max_parts = 2)]
struct Words;

impl AocParser for Words {
    type SharedData<'a> = Cached;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let words: Vec<String> = input.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return Err(ParseError::MissingData("no words".into()));
        }
        Ok(Cached {
            words,
            longest: None,
        })
    }
}

impl PartSolver<1> for Words {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let longest = shared.words.iter().map(String::len).max().unwrap_or(0);
        shared.longest = Some(longest);
        Ok(longest.to_string())
    }
}

impl PartSolver<2> for Words {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let longest = shared
            .longest
            .ok_or_else(|| SolveError::failed("part 1 has not run"))?;
        Ok(shared
            .words
            .iter()
            .filter(|w| w.len() == longest)
            .count()
            .to_string())
    }
}

#[test]
fn parts_constant_comes_from_attribute() {
    assert_eq!(<Readings as Solver>::PARTS, 2);
    assert_eq!(<OnlyFirst as Solver>::PARTS, 1);
}

#[test]
fn borrowed_shared_data() {
    let mut shared = OnlyFirst::parse("  stressed \n").unwrap();
    assert_eq!(OnlyFirst::solve_part(&mut shared, 1).unwrap(), "desserts");
    assert!(matches!(
        OnlyFirst::solve_part(&mut shared, 2),
        Err(SolveError::PartNotImplemented(2))
    ));
    assert!(matches!(
        OnlyFirst::solve_part_checked_range(&mut shared, 2),
        Err(SolveError::PartOutOfRange(2))
    ));
}

#[test]
fn later_part_sees_cached_result() {
    let mut shared = Words::parse("seed soil fertilizer water light").unwrap();
    assert!(matches!(
        Words::solve_part(&mut shared, 2),
        Err(SolveError::SolveFailed(_))
    ));
    assert_eq!(Words::solve_part(&mut shared, 1).unwrap(), "10");
    assert_eq!(shared.longest, Some(10));
    assert_eq!(Words::solve_part(&mut shared, 2).unwrap(), "1");
}

#[test]
fn parse_errors_surface() {
    assert_eq!(
        Readings::parse("1\nx\n").unwrap_err(),
        ParseError::InvalidFormat("x".into())
    );
    assert!(matches!(Words::parse("  "), Err(ParseError::MissingData(_))));
}

proptest! {
    #[test]
    fn dispatch_matches_direct_call(numbers in prop::collection::vec(-20i64..20, 1..8), part in 1u8..=2) {
        let input = numbers.iter().map(i64::to_string).collect::<Vec<_>>().join("\n");
        let mut via_dispatch = Readings::parse(&input).unwrap();
        let mut direct = Readings::parse(&input).unwrap();

        let dispatched = Readings::solve_part(&mut via_dispatch, part).unwrap();
        let expected = match part {
            1 => <Readings as PartSolver<1>>::solve(&mut direct),
            _ => <Readings as PartSolver<2>>::solve(&mut direct),
        }
        .unwrap();

        prop_assert_eq!(dispatched, expected);
    }

    #[test]
    fn unknown_parts_not_implemented(part in prop_oneof![Just(0u8), 3u8..=255]) {
        let mut shared = Readings::parse("1\n2").unwrap();
        match Readings::solve_part(&mut shared, part) {
            Err(SolveError::PartNotImplemented(p)) => prop_assert_eq!(p, part),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn checked_range_rejects_outside_parts(part in 0u8..=255) {
        let mut shared = Readings::parse("4\n5").unwrap();
        let result = Readings::solve_part_checked_range(&mut shared, part);
        if part == 0 || part > 2 {
            prop_assert!(matches!(result, Err(SolveError::PartOutOfRange(p)) if p == part));
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
