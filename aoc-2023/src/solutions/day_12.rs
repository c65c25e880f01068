use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use rayon::prelude::*;

use crate::utils::dp_cache::{DpCache, DpProblem, VecBackend};
use crate::utils::parse::lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 12, tags = ["hot-springs", "dp", "rayon"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub springs: Vec<u8>,
    pub groups: Vec<usize>,
}

impl Row {
    /// Five copies of the springs joined by `?`, five copies of the groups
    pub fn unfold(&self, copies: usize) -> Row {
        let mut springs = Vec::with_capacity((self.springs.len() + 1) * copies);
        for i in 0..copies {
            if i > 0 {
                springs.push(b'?');
            }
            springs.extend_from_slice(&self.springs);
        }
        Row {
            springs,
            groups: self.groups.repeat(copies),
        }
    }

    pub fn arrangements(&self) -> u64 {
        let problem = Arrangements {
            springs: &self.springs,
            groups: &self.groups,
        };
        let capacity = (self.springs.len() + 1) * (self.groups.len() + 1);
        DpCache::new(VecBackend::with_capacity(capacity), problem).get(&0)
    }
}

/// Ways to place `groups[g..]` into `springs[i..]`, indexed by `i * (groups + 1) + g`
struct Arrangements<'a> {
    springs: &'a [u8],
    groups: &'a [usize],
}

impl Arrangements<'_> {
    fn index(&self, i: usize, g: usize) -> usize {
        i * (self.groups.len() + 1) + g
    }

    fn split(&self, index: usize) -> (usize, usize) {
        (index / (self.groups.len() + 1), index % (self.groups.len() + 1))
    }
}

impl DpProblem<usize, u64> for Arrangements<'_> {
    fn deps(&self, index: &usize) -> Vec<usize> {
        let (i, g) = self.split(*index);
        let n = self.springs.len();
        if i == n {
            return vec![];
        }
        let mut deps = Vec::with_capacity(2);
        let c = self.springs[i];
        if c != b'#' {
            deps.push(self.index(i + 1, g));
        }
        if c != b'.' {
            if let Some(&len) = self.groups.get(g) {
                let end = i + len;
                let fits = end <= n
                    && !self.springs[i..end].contains(&b'.')
                    && self.springs.get(end) != Some(&b'#');
                if fits {
                    // Skip the separator after the group as well.
                    deps.push(self.index((end + 1).min(n), g + 1));
                }
            }
        }
        deps
    }

    fn compute(&self, index: &usize, deps: Vec<u64>) -> u64 {
        let (i, g) = self.split(*index);
        if i == self.springs.len() {
            u64::from(g == self.groups.len())
        } else {
            deps.iter().sum()
        }
    }
}

fn parse_row(line: &str) -> anyhow::Result<Row> {
    let (springs, groups) = line
        .split_once(' ')
        .ok_or_else(|| anyhow!("expected `<springs> <groups>`"))?;
    if let Some(bad) = springs.bytes().find(|b| !b"?.#".contains(b)) {
        bail!("unknown spring {:?}", bad as char);
    }
    let groups = groups
        .split(',')
        .map(|g| g.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Row {
        springs: springs.as_bytes().to_vec(),
        groups,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Row>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        lines(input)
            .enumerate()
            .map(|(idx, line)| {
                parse_row(line)
                    .map_err(|e| ParseError::InvalidFormat(format!("(line {}) {}", idx + 1, e)))
            })
            .collect()
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .iter()
            .map(Row::arrangements)
            .sum::<u64>()
            .to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .par_iter()
            .map(|row| row.unfold(5).arrangements())
            .sum::<u64>()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "???.### 1,1,3
.??..??...?##. 1,1,3
?#?#?#?#?#?#?#? 1,3,1,6
????.#...#... 4,1,1
????.######..#####. 1,6,5
?###???????? 3,2,1
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "21");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "525152");
    }

    #[test]
    fn per_row_counts() {
        let rows = <Solver as AocParser>::parse(EXAMPLE).unwrap();
        let counts: Vec<u64> = rows.iter().map(Row::arrangements).collect();
        assert_eq!(counts, vec![1, 4, 1, 1, 4, 10]);
        let unfolded: Vec<u64> = rows.iter().map(|r| r.unfold(5).arrangements()).collect();
        assert_eq!(unfolded, vec![1, 16384, 1, 16, 2500, 506250]);
    }

    #[test]
    fn unfold_joins_with_unknowns() {
        let row = parse_row(".# 1").unwrap();
        assert_eq!(
            row.unfold(3),
            Row {
                springs: b".#?.#?.#".to_vec(),
                groups: vec![1, 1, 1],
            }
        );
    }

    #[test]
    fn impossible_rows_have_no_arrangements() {
        assert_eq!(parse_row("### 1").unwrap().arrangements(), 0);
        assert_eq!(parse_row("... 1").unwrap().arrangements(), 0);
    }

    #[test]
    fn bad_spring_is_rejected() {
        assert!(<Solver as AocParser>::parse("?x# 1\n").is_err());
    }
}
