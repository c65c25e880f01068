use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, line_ending},
    combinator::value,
    multi::separated_list1,
    sequence::{delimited, separated_pair},
    IResult,
};

use crate::utils::parse::{run_parser, unsigned};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 2, tags = ["cube-conundrum", "nom"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Green,
    Blue,
}

/// Cube counts per colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cubes {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl Cubes {
    fn max(self, other: Cubes) -> Cubes {
        Cubes {
            red: self.red.max(other.red),
            green: self.green.max(other.green),
            blue: self.blue.max(other.blue),
        }
    }

    fn fits_in(self, bag: Cubes) -> bool {
        self.red <= bag.red && self.green <= bag.green && self.blue <= bag.blue
    }

    fn power(self) -> u32 {
        self.red * self.green * self.blue
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    pub id: u32,
    pub draws: Vec<Cubes>,
}

impl Game {
    /// Fewest cubes of each colour that make every draw possible
    pub fn minimum_bag(&self) -> Cubes {
        self.draws.iter().fold(Cubes::default(), |acc, d| acc.max(*d))
    }
}

const BAG: Cubes = Cubes {
    red: 12,
    green: 13,
    blue: 14,
};

fn color(input: &str) -> IResult<&str, Color> {
    alt((
        value(Color::Red, tag("red")),
        value(Color::Green, tag("green")),
        value(Color::Blue, tag("blue")),
    ))(input)
}

fn draw(input: &str) -> IResult<&str, Cubes> {
    let (rest, counts) =
        separated_list1(tag(", "), separated_pair(unsigned::<u32>, char(' '), color))(input)?;
    let cubes = counts
        .into_iter()
        .fold(Cubes::default(), |mut cubes, (n, color)| {
            match color {
                Color::Red => cubes.red += n,
                Color::Green => cubes.green += n,
                Color::Blue => cubes.blue += n,
            }
            cubes
        });
    Ok((rest, cubes))
}

fn game(input: &str) -> IResult<&str, Game> {
    let (rest, id) = delimited(tag("Game "), unsigned, tag(": "))(input)?;
    let (rest, draws) = separated_list1(tag("; "), draw)(rest)?;
    Ok((rest, Game { id, draws }))
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Game>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        run_parser(separated_list1(line_ending, game), input.trim_start())
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum: u32 = shared
            .iter()
            .filter(|g| g.minimum_bag().fits_in(BAG))
            .map(|g| g.id)
            .sum();
        Ok(sum.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum: u32 = shared.iter().map(|g| g.minimum_bag().power()).sum();
        Ok(sum.to_string())
    }
}
