use std::collections::HashMap;

use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::parse::lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 22, tags = ["sand-slabs", "simulation"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brick {
    pub min: [i64; 3],
    pub max: [i64; 3],
}

impl Brick {
    fn footprint(&self) -> impl Iterator<Item = (i64, i64)> + use<> {
        let (min, max) = (self.min, self.max);
        (min[0]..=max[0]).flat_map(move |x| (min[1]..=max[1]).map(move |y| (x, y)))
    }
}

/// Bricks after falling, with who rests on whom
#[derive(Debug, Default)]
pub struct Stack {
    pub bricks: Vec<Brick>,
    /// `supporters[i]`: bricks directly under brick `i`
    pub supporters: Vec<Vec<usize>>,
    /// `supported[i]`: bricks directly on top of brick `i`
    pub supported: Vec<Vec<usize>>,
}

fn parse_brick(line: &str) -> anyhow::Result<Brick> {
    let (a, b) = line
        .split_once('~')
        .ok_or_else(|| anyhow!("expected `x,y,z~x,y,z`"))?;
    let coords = |s: &str| -> anyhow::Result<[i64; 3]> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()?;
        <[i64; 3]>::try_from(values).map_err(|v| anyhow!("expected 3 coordinates, got {}", v.len()))
    };
    let (a, b) = (coords(a)?, coords(b)?);
    let brick = Brick {
        min: [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])],
        max: [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])],
    };
    if brick.min[2] < 1 {
        bail!("brick below the ground");
    }
    Ok(brick)
}

/// Let every brick fall as far as it can
pub fn settle(bricks: &[Brick]) -> Stack {
    let mut bricks = bricks.to_vec();
    bricks.sort_by_key(|b| b.min[2]);
    let n = bricks.len();
    let mut stack = Stack {
        bricks: Vec::with_capacity(n),
        supporters: vec![Vec::new(); n],
        supported: vec![Vec::new(); n],
    };
    // Highest occupied z and the brick there, per (x, y) column.
    let mut top: HashMap<(i64, i64), (i64, usize)> = HashMap::new();
    for (id, mut brick) in bricks.into_iter().enumerate() {
        let floor = brick
            .footprint()
            .filter_map(|xy| top.get(&xy).map(|&(z, _)| z))
            .max()
            .unwrap_or(0);
        let drop = brick.min[2] - floor - 1;
        brick.min[2] -= drop;
        brick.max[2] -= drop;

        let mut below: Vec<usize> = brick
            .footprint()
            .filter_map(|xy| top.get(&xy))
            .filter(|&&(z, _)| z == floor && floor > 0)
            .map(|&(_, other)| other)
            .collect();
        below.sort_unstable();
        below.dedup();
        for &other in &below {
            stack.supported[other].push(id);
        }
        stack.supporters[id] = below;

        for xy in brick.footprint() {
            top.insert(xy, (brick.max[2], id));
        }
        stack.bricks.push(brick);
    }
    stack
}

impl Stack {
    /// Whether removing brick `id` leaves every other brick in place
    pub fn is_removable(&self, id: usize) -> bool {
        self.supported[id]
            .iter()
            .all(|&above| self.supporters[above].len() > 1)
    }

    /// How many other bricks fall if brick `id` is removed
    pub fn chain_reaction(&self, id: usize) -> usize {
        let mut falling = vec![false; self.bricks.len()];
        falling[id] = true;
        let mut count = 0;
        // Bricks are stored bottom-up, so supporters are always decided first.
        for other in id + 1..self.bricks.len() {
            let under = &self.supporters[other];
            if !under.is_empty() && under.iter().all(|&s| falling[s]) {
                falling[other] = true;
                count += 1;
            }
        }
        count
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Stack;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let bricks = lines(input)
            .enumerate()
            .map(|(idx, line)| {
                parse_brick(line)
                    .map_err(|e| ParseError::InvalidFormat(format!("(line {}) {}", idx + 1, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(settle(&bricks))
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let count = (0..shared.bricks.len())
            .filter(|&id| shared.is_removable(id))
            .count();
        Ok(count.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let total: usize = (0..shared.bricks.len())
            .map(|id| shared.chain_reaction(id))
            .sum();
        Ok(total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "1,0,1~1,2,1
0,0,2~2,0,2
0,2,3~2,2,3
0,0,4~0,2,4
2,0,5~2,2,5
0,1,6~2,1,6
1,1,8~1,1,9
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "5");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "7");
    }

    #[test]
    fn bricks_come_to_rest() {
        let stack = <Solver as AocParser>::parse(EXAMPLE).unwrap();
        let g = stack.bricks[6];
        assert_eq!((g.min[2], g.max[2]), (5, 6));
        assert_eq!(stack.supporters[1], vec![0]);
        assert_eq!(stack.supporters[3], vec![1, 2]);
        assert_eq!(stack.supported[0], vec![1, 2]);
    }

    #[test]
    fn malformed_bricks() {
        assert!(parse_brick("1,0,1~1,2").is_err());
        assert!(parse_brick("1,0,0~1,2,0").is_err());
        assert!(parse_brick("1,0,1").is_err());
    }
}
