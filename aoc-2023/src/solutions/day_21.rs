use std::collections::{HashSet, VecDeque};

use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::grid::{Grid, Point};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 21, tags = ["step-counter", "grid", "bfs"])]
pub struct Solver;

const PART_1_STEPS: u64 = 64;
const PART_2_STEPS: u64 = 26_501_365;

#[derive(Debug)]
pub struct Garden {
    /// `true` for rocks
    rocks: Grid<bool>,
    start: Point,
}

impl AocParser for Solver {
    type SharedData<'a> = Garden;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let tiles = Grid::parse_bytes(input)?;
        if let Some((p, &c)) = tiles.iter().find(|(_, c)| !b".#S".contains(*c)) {
            return Err(ParseError::InvalidFormat(format!(
                "unexpected {:?} at ({}, {})",
                c as char, p.x, p.y
            )));
        }
        let start = tiles
            .position(|&b| b == b'S')
            .ok_or_else(|| ParseError::MissingData("no start tile `S`".into()))?;
        Ok(Garden {
            rocks: tiles.map(|&b| b == b'#'),
            start,
        })
    }
}

impl Garden {
    fn is_plot(&self, p: Point, infinite: bool) -> bool {
        let cell = if infinite {
            self.rocks.get_wrapped(p)
        } else {
            self.rocks.get(p)
        };
        cell == Some(&false)
    }

    /// Plots the elf can stand on after exactly `steps` steps
    pub fn reachable(&self, steps: u64, infinite: bool) -> u64 {
        let mut seen = HashSet::from([self.start]);
        let mut queue = VecDeque::from([(self.start, 0u64)]);
        let mut count = 0;
        while let Some((p, dist)) = queue.pop_front() {
            // Plots reached earlier with the same parity stay reachable by stepping back and forth.
            if dist % 2 == steps % 2 {
                count += 1;
            }
            if dist == steps {
                continue;
            }
            for next in p.cardinal() {
                if self.is_plot(next, infinite) && seen.insert(next) {
                    queue.push_back((next, dist + 1));
                }
            }
        }
        count
    }

    /// Reachable plots on the infinite map for a large step count.
    ///
    /// The count grows quadratically in whole map widths once the diamond has
    /// cleared the map, so three samples fix it.
    pub fn reachable_extrapolated(&self, steps: u64) -> u64 {
        let width = self.rocks.width() as u64;
        let rem = steps % width;
        let cycles = steps / width;
        if cycles < 3 {
            return self.reachable(steps, true);
        }
        let samples: Vec<i128> = (0..3)
            .map(|k| i128::from(self.reachable(rem + k * width, true)))
            .collect();
        let d1 = samples[1] - samples[0];
        let d2 = samples[2] - 2 * samples[1] + samples[0];
        let n = i128::from(cycles);
        let value = samples[0] + n * d1 + n * (n - 1) / 2 * d2;
        value as u64
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.reachable(PART_1_STEPS, false).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if shared.rocks.width() != shared.rocks.height() {
            return Err(SolveError::failed("the garden map must be square"));
        }
        Ok(shared.reachable_extrapolated(PART_2_STEPS).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "...........
.....###.#.
.###.##..#.
..#.#...#..
....#.#....
.##..S####.
.##..#...#.
.......##..
.##.#.####.
.##..##.##.
...........
";

    fn garden() -> Garden {
        <Solver as AocParser>::parse(EXAMPLE).unwrap()
    }

    #[test]
    fn finite_map() {
        assert_eq!(garden().reachable(6, false), 16);
    }

    #[test]
    fn infinite_map() {
        let g = garden();
        assert_eq!(g.reachable(6, true), 16);
        assert_eq!(g.reachable(10, true), 50);
        assert_eq!(g.reachable(50, true), 1594);
        assert_eq!(g.reachable(100, true), 6536);
    }

    #[test]
    fn extrapolation_matches_open_garden() {
        // No rocks: exactly the plots of matching parity inside the diamond.
        let open = <Solver as AocParser>::parse(".....\n.....\n..S..\n.....\n.....\n").unwrap();
        for steps in [12, 17, 23] {
            assert_eq!(
                open.reachable_extrapolated(steps),
                open.reachable(steps, true),
                "steps = {steps}"
            );
        }
        assert_eq!(open.reachable(3, true), 16);
    }

    #[test]
    fn missing_start() {
        assert!(<Solver as AocParser>::parse("...\n.#.\n").is_err());
    }
}
