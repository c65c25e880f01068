use anyhow::anyhow;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;

use crate::utils::parse::lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 24, tags = ["never-tell-me-the-odds", "math"])]
pub struct Solver;

const TEST_AREA: (i128, i128) = (200_000_000_000_000, 400_000_000_000_000);
const VELOCITY_SEARCH: i128 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hailstone {
    pub pos: [i128; 3],
    pub vel: [i128; 3],
}

fn parse_hailstone(line: &str) -> anyhow::Result<Hailstone> {
    let (pos, vel) = line
        .split_once('@')
        .ok_or_else(|| anyhow!("expected `px, py, pz @ vx, vy, vz`"))?;
    let triple = |s: &str| -> anyhow::Result<[i128; 3]> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<i128>())
            .collect::<Result<Vec<_>, _>>()?;
        <[i128; 3]>::try_from(values).map_err(|v| anyhow!("expected 3 values, got {}", v.len()))
    };
    Ok(Hailstone {
        pos: triple(pos)?,
        vel: triple(vel)?,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Hailstone>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        lines(input)
            .enumerate()
            .map(|(idx, line)| {
                parse_hailstone(line)
                    .map_err(|e| ParseError::InvalidFormat(format!("(line {}) {}", idx + 1, e)))
            })
            .collect()
    }
}

/// Times `(t, u)` at which the XY paths of `a` and `b` cross, as fractions over `det`.
///
/// `None` for parallel paths.
fn crossing_xy(a: &Hailstone, b: &Hailstone) -> Option<(i128, i128, i128)> {
    let det = a.vel[0] * b.vel[1] - a.vel[1] * b.vel[0];
    if det == 0 {
        return None;
    }
    let dx = b.pos[0] - a.pos[0];
    let dy = b.pos[1] - a.pos[1];
    let t = dx * b.vel[1] - dy * b.vel[0];
    let u = dx * a.vel[1] - dy * a.vel[0];
    Some((t, u, det))
}

/// Whether the future XY paths of `a` and `b` cross inside `[min, max]` on both axes
fn crosses_inside(a: &Hailstone, b: &Hailstone, min: i128, max: i128) -> bool {
    let Some((mut t, mut u, mut det)) = crossing_xy(a, b) else {
        return false;
    };
    if det < 0 {
        (t, u, det) = (-t, -u, -det);
    }
    if t < 0 || u < 0 {
        return false;
    }
    // Compare x = pos + t/det * vel without dividing.
    (0..2).all(|axis| {
        let scaled = a.pos[axis] * det + t * a.vel[axis];
        min * det <= scaled && scaled <= max * det
    })
}

pub fn count_crossings(hail: &[Hailstone], min: i128, max: i128) -> usize {
    hail.iter()
        .tuple_combinations()
        .filter(|(a, b)| crosses_inside(a, b, min, max))
        .count()
}

fn exact_div(n: i128, d: i128) -> Option<i128> {
    (d != 0 && n % d == 0).then(|| n / d)
}

/// The point every hailstone passes through in XY when seen from a rock moving at `(vx, vy)`
fn common_xy(hail: &[Hailstone], vx: i128, vy: i128) -> Option<(i128, i128)> {
    let shifted = |h: &Hailstone| Hailstone {
        pos: h.pos,
        vel: [h.vel[0] - vx, h.vel[1] - vy, h.vel[2]],
    };
    let first = shifted(hail.first()?);
    if first.vel[0] == 0 && first.vel[1] == 0 {
        return Some((first.pos[0], first.pos[1]));
    }
    hail[1..].iter().find_map(|h| {
        let (t, _, det) = crossing_xy(&first, &shifted(h))?;
        Some((
            exact_div(first.pos[0] * det + t * first.vel[0], det)?,
            exact_div(first.pos[1] * det + t * first.vel[1], det)?,
        ))
    })
}

/// When a rock thrown from `(px, py)` at `(vx, vy)` meets `h`, if it does in XY
enum Meeting {
    At(i128),
    /// Standing still relative to the rock, on top of it
    Always,
}

fn meeting_time(h: &Hailstone, (px, py): (i128, i128), vx: i128, vy: i128) -> Option<Meeting> {
    let (ax, ay) = (h.vel[0] - vx, h.vel[1] - vy);
    let (dx, dy) = (px - h.pos[0], py - h.pos[1]);
    let t = match (ax, ay) {
        (0, 0) => return (dx == 0 && dy == 0).then_some(Meeting::Always),
        (0, _) => {
            if dx != 0 {
                return None;
            }
            exact_div(dy, ay)?
        }
        _ => exact_div(dx, ax)?,
    };
    (t >= 0 && h.pos[1] + t * ay == py).then_some(Meeting::At(t))
}

/// Position and velocity of the rock that hits every hailstone, searching
/// XY velocities with components up to `range` in magnitude.
pub fn find_rock(hail: &[Hailstone], range: i128) -> Option<Hailstone> {
    // Nearest rings first, so small velocities are tried before large ones.
    for r in 0..=range {
        for vx in -r..=r {
            for vy in -r..=r {
                if vx.abs() != r && vy.abs() != r {
                    continue;
                }
                if let Some(rock) = try_velocity(hail, vx, vy) {
                    return Some(rock);
                }
            }
        }
    }
    None
}

fn try_velocity(hail: &[Hailstone], vx: i128, vy: i128) -> Option<Hailstone> {
    let (px, py) = common_xy(hail, vx, vy)?;
    let mut timed = Vec::with_capacity(hail.len());
    for h in hail {
        match meeting_time(h, (px, py), vx, vy)? {
            Meeting::At(t) => timed.push((h, t)),
            Meeting::Always => {}
        }
    }
    // Two hits at different times fix the Z motion.
    let (&(a, ta), &(b, tb)) = timed
        .iter()
        .zip(timed.iter().skip(1))
        .find(|((_, ta), (_, tb))| ta != tb)?;
    let vz = exact_div(
        (b.pos[2] + tb * b.vel[2]) - (a.pos[2] + ta * a.vel[2]),
        tb - ta,
    )?;
    let pz = a.pos[2] + ta * (a.vel[2] - vz);
    timed
        .iter()
        .all(|&(h, t)| h.pos[2] + t * (h.vel[2] - vz) == pz)
        .then_some(Hailstone {
            pos: [px, py, pz],
            vel: [vx, vy, vz],
        })
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(count_crossings(shared, TEST_AREA.0, TEST_AREA.1).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let rock = find_rock(shared, VELOCITY_SEARCH)
            .ok_or_else(|| SolveError::failed("no rock trajectory hits every hailstone"))?;
        Ok(rock.pos.iter().sum::<i128>().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "19, 13, 30 @ -2,  1, -2
18, 19, 22 @ -1, -1, -2
20, 25, 34 @ -2, -2, -4
12, 31, 28 @ -1, -2, -1
20, 19, 15 @  1, -5, -3
";

    #[test]
    fn crossings_in_small_area() {
        let hail = <Solver as AocParser>::parse(EXAMPLE).unwrap();
        assert_eq!(count_crossings(&hail, 7, 27), 2);
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "47");
    }

    #[test]
    fn rock_trajectory() {
        let hail = <Solver as AocParser>::parse(EXAMPLE).unwrap();
        assert_eq!(
            find_rock(&hail, 5),
            Some(Hailstone {
                pos: [24, 13, 10],
                vel: [-3, 1, 2],
            })
        );
    }

    #[test]
    fn malformed_hailstone() {
        assert!(parse_hailstone("1, 2 @ 3, 4, 5").is_err());
        assert!(parse_hailstone("1, 2, 3").is_err());
    }
}
