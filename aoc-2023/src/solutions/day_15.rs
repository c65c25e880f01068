use anyhow::anyhow;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 15, tags = ["lens-library", "hashing"])]
pub struct Solver;

/// The HASH algorithm: running `(h + byte) * 17 mod 256`
pub fn hash(s: &str) -> u8 {
    s.bytes()
        .fold(0u8, |h, b| h.wrapping_add(b).wrapping_mul(17))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Remove,
    Insert(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    pub raw: &'a str,
    pub label: &'a str,
    pub op: Op,
}

fn parse_step(raw: &str) -> anyhow::Result<Step<'_>> {
    if let Some(label) = raw.strip_suffix('-') {
        return Ok(Step {
            raw,
            label,
            op: Op::Remove,
        });
    }
    let (label, focal) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("step `{raw}` has neither `=` nor `-`"))?;
    let focal: u8 = focal.parse()?;
    if !(1..=9).contains(&focal) {
        return Err(anyhow!("focal length {focal} out of range in `{raw}`"));
    }
    Ok(Step {
        raw,
        label,
        op: Op::Insert(focal),
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Step<'a>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let steps: Vec<Step<'a>> = input
            .trim()
            .split(',')
            .map(|s| s.trim_matches(|c| c == '\n' || c == '\r'))
            .enumerate()
            .map(|(idx, s)| {
                parse_step(s)
                    .map_err(|e| ParseError::InvalidFormat(format!("(step {}) {}", idx + 1, e)))
            })
            .collect::<Result<_, _>>()?;
        Ok(steps)
    }
}

/// Sum over lenses of `(box + 1) * (slot + 1) * focal length`
pub fn focusing_power(steps: &[Step<'_>]) -> usize {
    let mut boxes: Vec<Vec<(&str, u8)>> = vec![Vec::new(); 256];
    for step in steps {
        let lenses = &mut boxes[usize::from(hash(step.label))];
        let slot = lenses.iter().position(|(label, _)| *label == step.label);
        match (step.op, slot) {
            (Op::Remove, Some(i)) => {
                lenses.remove(i);
            }
            (Op::Remove, None) => {}
            (Op::Insert(focal), Some(i)) => lenses[i].1 = focal,
            (Op::Insert(focal), None) => lenses.push((step.label, focal)),
        }
    }
    boxes
        .iter()
        .enumerate()
        .flat_map(|(b, lenses)| {
            lenses
                .iter()
                .enumerate()
                .map(move |(slot, (_, focal))| (b + 1) * (slot + 1) * usize::from(*focal))
        })
        .sum()
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum: u64 = shared.iter().map(|s| u64::from(hash(s.raw))).sum();
        Ok(sum.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(focusing_power(shared).to_string())
    }
}
