use std::collections::HashMap;

use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::grid::{Grid, Point};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 14, tags = ["parabolic-dish", "grid", "cycle-detection"])]
pub struct Solver;

const ROUND: u8 = b'O';
const CUBE: u8 = b'#';
const EMPTY: u8 = b'.';
const SPIN_CYCLES: usize = 1_000_000_000;

impl AocParser for Solver {
    type SharedData<'a> = Grid<u8>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = Grid::parse_bytes(input)?;
        if let Some((p, &c)) = grid.iter().find(|(_, c)| ![ROUND, CUBE, EMPTY].contains(*c)) {
            return Err(ParseError::InvalidFormat(format!(
                "unexpected {:?} at ({}, {})",
                c as char, p.x, p.y
            )));
        }
        Ok(grid)
    }
}

/// Roll every round rock as far north as it goes
pub fn tilt_north(grid: &mut Grid<u8>) {
    for x in 0..grid.width() as i64 {
        let mut free = 0;
        for y in 0..grid.height() as i64 {
            let p = Point::new(x, y);
            match grid.get(p) {
                Some(&CUBE) => free = y + 1,
                Some(&ROUND) => {
                    if free != y {
                        let _ = grid.set(Point::new(x, free), ROUND);
                        let _ = grid.set(p, EMPTY);
                    }
                    free += 1;
                }
                _ => {}
            }
        }
    }
}

/// North, west, south, then east
pub fn spin_cycle(grid: &Grid<u8>) -> Grid<u8> {
    let mut current = grid.clone();
    for _ in 0..4 {
        tilt_north(&mut current);
        // The west edge becomes north after a clockwise turn.
        current = current.rotate_clockwise();
    }
    current
}

/// Sum over round rocks of their distance from the south edge
pub fn north_load(grid: &Grid<u8>) -> usize {
    grid.iter()
        .filter(|&(_, &c)| c == ROUND)
        .map(|(p, _)| grid.height() - p.y as usize)
        .sum()
}

/// Grid after `n` spin cycles, skipping ahead once a repeated state is seen
pub fn spin(grid: &Grid<u8>, n: usize) -> Grid<u8> {
    let mut seen: HashMap<Grid<u8>, usize> = HashMap::new();
    let mut history = Vec::new();
    let mut current = grid.clone();
    for i in 0..n {
        if let Some(&start) = seen.get(&current) {
            let period = i - start;
            return history.swap_remove(start + (n - start) % period);
        }
        seen.insert(current.clone(), i);
        history.push(current.clone());
        current = spin_cycle(&current);
    }
    current
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut grid = shared.clone();
        tilt_north(&mut grid);
        Ok(north_load(&grid).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(north_load(&spin(shared, SPIN_CYCLES)).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "O....#....
O.OO#....#
.....##...
OO.#O....O
.O.....O#.
O.#..O.#.#
..O..#O..O
.......O..
#....###..
#OO..#....
";

    const AFTER_ONE_CYCLE: &str = ".....#....
....#...O#
...OO##...
.OO#......
.....OOO#.
.O#...O#.#
....O#....
......OOOO
#...O###..
#..OO#....
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "136");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "64");
    }

    #[test]
    fn one_spin_cycle() {
        let grid = Grid::parse_bytes(EXAMPLE).unwrap();
        assert_eq!(spin_cycle(&grid), Grid::parse_bytes(AFTER_ONE_CYCLE).unwrap());
        assert_eq!(spin(&grid, 1), spin_cycle(&grid));
    }

    #[test]
    fn unknown_tile_is_rejected() {
        assert!(<Solver as AocParser>::parse("O.\n.X\n").is_err());
    }
}
