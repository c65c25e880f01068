use std::collections::HashSet;

use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use nom::{
    bytes::complete::tag,
    character::complete::{line_ending, space1},
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

use crate::utils::counter::Counter;
use crate::utils::parse::{number_list, run_parser, unsigned};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 4, tags = ["scratchcards", "counter"])]
pub struct Solver;

#[derive(Debug, Clone)]
pub struct Card {
    pub id: usize,
    pub winning: Vec<u32>,
    pub have: Vec<u32>,
}

impl Card {
    pub fn matches(&self) -> usize {
        let winning: HashSet<u32> = self.winning.iter().copied().collect();
        self.have.iter().filter(|n| winning.contains(n)).count()
    }
}

fn card(input: &str) -> IResult<&str, Card> {
    let (rest, id) = delimited(tuple((tag("Card"), space1)), unsigned, tag(":"))(input)?;
    let (rest, (winning, have)) =
        separated_pair(number_list, preceded(space1, tag("|")), number_list)(rest)?;
    Ok((rest, Card { id, winning, have }))
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<usize>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let cards = run_parser(separated_list1(line_ending, card), input.trim_start())?;
        Ok(cards.iter().map(Card::matches).collect())
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let points: u64 = shared
            .iter()
            .filter(|&&m| m > 0)
            .map(|&m| 1u64 << (m - 1))
            .sum();
        Ok(points.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(total_cards(shared).to_string())
    }
}

/// Cards held once every won copy has been scratched
pub fn total_cards(matches: &[usize]) -> u64 {
    let mut copies: Counter<usize> = (0..matches.len()).collect();
    for (card, &m) in matches.iter().enumerate() {
        let held = copies.get(&card);
        for won in card + 1..(card + 1 + m).min(matches.len()) {
            copies.add_count(won, held);
        }
    }
    copies.total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "Card 1: 41 48 83 86 17 | 83 86  6 31 17  9 48 53
Card 2: 13 32 20 16 61 | 61 30 68 82 17 32 24 19
Card 3:  1 21 53 59 44 | 69 82 63 72 16 21 14  1
Card 4: 41 92 73 84 69 | 59 84 76 51 58  5 54 83
Card 5: 87 83 26 28 32 | 88 30 70 12 93 22 82 36
Card 6: 31 18 13 56 72 | 74 77 10 23 35 67 36 11
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "13");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "30");
    }

    #[test]
    fn match_counts() {
        let matches = <Solver as AocParser>::parse(EXAMPLE).unwrap();
        assert_eq!(matches, vec![4, 2, 2, 1, 0, 0]);
    }

    #[test]
    fn wins_past_the_last_card_are_dropped() {
        assert_eq!(total_cards(&[3]), 1);
        assert_eq!(total_cards(&[1, 1]), 3);
    }
}
