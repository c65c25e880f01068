use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::counter::Counter;
use crate::utils::parse::lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 7, tags = ["camel-cards", "counter"])]
pub struct Solver;

const CARDS: &[u8; 13] = b"23456789TJQKA";
const JOKER: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandType {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    FullHouse,
    FourOfAKind,
    FiveOfAKind,
}

impl HandType {
    /// Classify from card counts sorted largest first
    fn from_counts(counts: &[u64]) -> HandType {
        match counts {
            [5, ..] => HandType::FiveOfAKind,
            [4, ..] => HandType::FourOfAKind,
            [3, 2, ..] => HandType::FullHouse,
            [3, ..] => HandType::ThreeOfAKind,
            [2, 2, ..] => HandType::TwoPair,
            [2, ..] => HandType::OnePair,
            _ => HandType::HighCard,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Hand {
    /// Card strengths, `2` is 0 and `A` is 12
    cards: [u8; 5],
    bid: u64,
}

impl Hand {
    pub fn hand_type(&self, jokers: bool) -> HandType {
        let mut counter: Counter<u8> = self.cards.iter().copied().collect();
        let wild = if jokers {
            counter.remove(&JOKER).unwrap_or(0)
        } else {
            0
        };
        let mut counts = counter.counts_desc();
        match counts.first_mut() {
            Some(top) => *top += wild,
            None => counts.push(wild),
        }
        HandType::from_counts(&counts)
    }

    fn sort_key(&self, jokers: bool) -> (HandType, [u8; 5]) {
        let mut strengths = self.cards;
        if jokers {
            for s in &mut strengths {
                // Jokers drop below `2`; everything else keeps its order.
                *s = if *s == JOKER { 0 } else { *s + 1 };
            }
        }
        (self.hand_type(jokers), strengths)
    }
}

fn parse_hand(line: &str) -> anyhow::Result<Hand> {
    let (cards, bid) = line
        .split_once(' ')
        .ok_or_else(|| anyhow!("expected `<cards> <bid>`"))?;
    if cards.len() != 5 {
        bail!("hand `{cards}` must have 5 cards");
    }
    let mut strengths = [0u8; 5];
    for (slot, c) in strengths.iter_mut().zip(cards.bytes()) {
        *slot = CARDS
            .iter()
            .position(|&k| k == c)
            .ok_or_else(|| anyhow!("unknown card {:?}", c as char))? as u8;
    }
    Ok(Hand {
        cards: strengths,
        bid: bid.trim().parse()?,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Hand>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        lines(input)
            .enumerate()
            .map(|(idx, line)| {
                parse_hand(line)
                    .map_err(|e| ParseError::InvalidFormat(format!("(line {}) {}", idx + 1, e)))
            })
            .collect()
    }
}

/// Total winnings: each bid times the rank of its hand
pub fn winnings(hands: &[Hand], jokers: bool) -> u64 {
    let mut ranked: Vec<_> = hands.iter().map(|h| (h.sort_key(jokers), h.bid)).collect();
    ranked.sort_unstable();
    ranked
        .iter()
        .zip(1..)
        .map(|((_, bid), rank)| bid * rank)
        .sum()
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(winnings(shared, false).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(winnings(shared, true).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "32T3K 765
T55J5 684
KK677 28
KTJJT 220
QQQJA 483
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "6440");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "5905");
    }

    #[test]
    fn hand_types() {
        let hand = |s: &str| parse_hand(&format!("{s} 1")).unwrap();
        assert_eq!(hand("KTJJT").hand_type(false), HandType::TwoPair);
        assert_eq!(hand("KTJJT").hand_type(true), HandType::FourOfAKind);
        assert_eq!(hand("JJJJJ").hand_type(true), HandType::FiveOfAKind);
        assert_eq!(hand("23456").hand_type(true), HandType::HighCard);
        assert_eq!(hand("2233J").hand_type(true), HandType::FullHouse);
    }

    #[test]
    fn bad_card_reports_line() {
        let err = <Solver as AocParser>::parse("AAAAA 1\nAAAAX 2\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidFormat("(line 2) unknown card 'X'".into())
        );
    }
}
