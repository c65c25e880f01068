use std::collections::HashMap;

use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use nom::{
    bytes::complete::tag,
    character::complete::{alphanumeric1, line_ending, multispace1, one_of},
    multi::{many1, separated_list1},
    sequence::{delimited, separated_pair, tuple},
    IResult,
};

use crate::utils::math::lcm_all;
use crate::utils::parse::run_parser;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 8, tags = ["haunted-wasteland", "lcm"])]
pub struct Solver;

#[derive(Debug, Clone)]
pub struct Network<'a> {
    /// `true` for `R`
    turns: Vec<bool>,
    nodes: HashMap<&'a str, (&'a str, &'a str)>,
    order: Vec<&'a str>,
}

impl<'a> Network<'a> {
    /// Steps from `start` until a node satisfying `done` is reached
    pub fn steps(&self, start: &'a str, done: impl Fn(&str) -> bool) -> Result<u64, SolveError> {
        // Past this bound the walk is in a cycle that never finishes.
        let limit = (self.turns.len() * self.nodes.len()) as u64 + 1;
        let mut current = start;
        for (step, &right) in (0..limit).zip(self.turns.iter().cycle()) {
            if done(current) {
                return Ok(step);
            }
            let &(l, r) = self
                .nodes
                .get(current)
                .ok_or_else(|| SolveError::failed(format!("unknown node {current}")))?;
            current = if right { r } else { l };
        }
        Err(SolveError::failed(format!("no exit reachable from {start}")))
    }
}

fn node(input: &str) -> IResult<&str, (&str, (&str, &str))> {
    separated_pair(
        alphanumeric1,
        tag(" = "),
        delimited(
            tag("("),
            separated_pair(alphanumeric1, tag(", "), alphanumeric1),
            tag(")"),
        ),
    )(input)
}

fn network(input: &str) -> IResult<&str, Network<'_>> {
    let (rest, (turns, _, nodes)) = tuple((
        many1(one_of("LR")),
        multispace1,
        separated_list1(line_ending, node),
    ))(input)?;
    Ok((
        rest,
        Network {
            turns: turns.into_iter().map(|c| c == 'R').collect(),
            order: nodes.iter().map(|(name, _)| *name).collect(),
            nodes: nodes.into_iter().collect(),
        },
    ))
}

impl AocParser for Solver {
    type SharedData<'a> = Network<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        run_parser(network, input.trim_start())
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if !shared.nodes.contains_key("AAA") {
            return Err(SolveError::failed("network has no AAA node"));
        }
        Ok(shared.steps("AAA", |n| n == "ZZZ")?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        // Each ghost's path from its start is assumed to loop back onto the same exit.
        let cycles = shared
            .order
            .iter()
            .filter(|n| n.ends_with('A'))
            .map(|&start| shared.steps(start, |n| n.ends_with('Z')))
            .collect::<Result<Vec<_>, _>>()?;
        lcm_all(cycles)
            .map(|steps| steps.to_string())
            .ok_or_else(|| SolveError::failed("no start nodes ending in A"))
    }
}
