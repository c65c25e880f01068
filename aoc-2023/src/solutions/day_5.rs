use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{line_ending, multispace1, space1},
    multi::{many1, separated_list1},
    sequence::{terminated, tuple},
    IResult,
};

use crate::utils::parse::{number_list, run_parser, unsigned};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 5, tags = ["seed-almanac", "ranges"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub dst: i64,
    pub src: i64,
    pub len: i64,
}

/// One `x-to-y map:` section
#[derive(Debug, Clone)]
pub struct Mapping {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl Mapping {
    pub fn apply(&self, value: i64) -> i64 {
        self.rules
            .iter()
            .find(|r| (r.src..r.src + r.len).contains(&value))
            .map_or(value, |r| value - r.src + r.dst)
    }

    /// Map half-open ranges, splitting them where rules start or end
    pub fn apply_ranges(&self, ranges: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
        let mut mapped = Vec::new();
        let mut pending = ranges;
        for rule in &self.rules {
            let (src_start, src_end) = (rule.src, rule.src + rule.len);
            let shift = rule.dst - rule.src;
            let mut unmatched = Vec::new();
            for (start, end) in pending {
                let lo = start.max(src_start);
                let hi = end.min(src_end);
                if lo < hi {
                    mapped.push((lo + shift, hi + shift));
                    if start < lo {
                        unmatched.push((start, lo));
                    }
                    if hi < end {
                        unmatched.push((hi, end));
                    }
                } else {
                    unmatched.push((start, end));
                }
            }
            pending = unmatched;
        }
        mapped.extend(pending);
        mapped
    }
}

#[derive(Debug, Clone)]
pub struct Almanac {
    pub seeds: Vec<i64>,
    pub mappings: Vec<Mapping>,
}

fn rule(input: &str) -> IResult<&str, Rule> {
    let (rest, (dst, _, src, _, len)) =
        tuple((unsigned, space1, unsigned, space1, unsigned))(input)?;
    Ok((rest, Rule { dst, src, len }))
}

fn mapping(input: &str) -> IResult<&str, Mapping> {
    let (rest, name) = terminated(take_until(" map:"), tuple((tag(" map:"), line_ending)))(input)?;
    let (rest, rules) = separated_list1(line_ending, rule)(rest)?;
    Ok((
        rest,
        Mapping {
            name: name.to_string(),
            rules,
        },
    ))
}

fn almanac(input: &str) -> IResult<&str, Almanac> {
    let (rest, seeds) = tuple((tag("seeds:"), number_list))(input)?;
    let (rest, mappings) = many1(tuple((multispace1, mapping)))(rest)?;
    Ok((
        rest,
        Almanac {
            seeds: seeds.1,
            mappings: mappings.into_iter().map(|(_, m)| m).collect(),
        },
    ))
}

impl AocParser for Solver {
    type SharedData<'a> = Almanac;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        run_parser(almanac, input.trim_start())
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .seeds
            .iter()
            .map(|&seed| shared.mappings.iter().fold(seed, |v, m| m.apply(v)))
            .min()
            .map(|loc| loc.to_string())
            .ok_or_else(|| SolveError::failed("no seeds"))
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if shared.seeds.len() % 2 != 0 {
            return Err(SolveError::failed("seed ranges need an even number of values"));
        }
        let ranges: Vec<(i64, i64)> = shared
            .seeds
            .chunks(2)
            .map(|pair| (pair[0], pair[0] + pair[1]))
            .collect();
        shared
            .mappings
            .iter()
            .fold(ranges, |ranges, m| m.apply_ranges(ranges))
            .into_iter()
            .map(|(start, _)| start)
            .min()
            .map(|loc| loc.to_string())
            .ok_or_else(|| SolveError::failed("no seed ranges"))
    }
}
