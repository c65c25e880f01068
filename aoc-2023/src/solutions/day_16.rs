use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use rayon::prelude::*;

use crate::utils::grid::{Dir, Grid, Point};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 16, tags = ["lava-floor", "grid", "rayon"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = Grid<u8>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = Grid::parse_bytes(input)?;
        if let Some((p, &c)) = grid.iter().find(|(_, c)| !b"./\\|-".contains(*c)) {
            return Err(ParseError::InvalidFormat(format!(
                "unexpected {:?} at ({}, {})",
                c as char, p.x, p.y
            )));
        }
        Ok(grid)
    }
}

/// Directions a beam leaves a tile in
fn deflect(tile: u8, dir: Dir) -> ([Dir; 2], usize) {
    match (tile, dir) {
        (b'/', Dir::East) => ([Dir::North; 2], 1),
        (b'/', Dir::North) => ([Dir::East; 2], 1),
        (b'/', Dir::West) => ([Dir::South; 2], 1),
        (b'/', Dir::South) => ([Dir::West; 2], 1),
        (b'\\', Dir::East) => ([Dir::South; 2], 1),
        (b'\\', Dir::South) => ([Dir::East; 2], 1),
        (b'\\', Dir::West) => ([Dir::North; 2], 1),
        (b'\\', Dir::North) => ([Dir::West; 2], 1),
        (b'|', d) if !d.is_vertical() => ([Dir::North, Dir::South], 2),
        (b'-', d) if d.is_vertical() => ([Dir::East, Dir::West], 2),
        (_, d) => ([d; 2], 1),
    }
}

/// Number of tiles a beam entering at `start` heading `dir` passes through
pub fn energized(grid: &Grid<u8>, start: Point, dir: Dir) -> usize {
    // One bit per direction already travelled through each tile.
    let mut seen: Grid<u8> = Grid::of_size(grid.width(), grid.height(), 0);
    let mut beams = vec![(start, dir)];
    while let Some((p, d)) = beams.pop() {
        let Some(&tile) = grid.get(p) else { continue };
        let bit = 1 << d.index();
        let Some(mask) = seen.get_mut(p) else { continue };
        if *mask & bit != 0 {
            continue;
        }
        *mask |= bit;
        let (outs, n) = deflect(tile, d);
        beams.extend(outs[..n].iter().map(|&out| (p.step(out), out)));
    }
    seen.cells().iter().filter(|&&m| m != 0).count()
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(energized(shared, Point::ORIGIN, Dir::East).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let (w, h) = (shared.width() as i64, shared.height() as i64);
        let starts: Vec<(Point, Dir)> = (0..w)
            .flat_map(|x| [(Point::new(x, 0), Dir::South), (Point::new(x, h - 1), Dir::North)])
            .chain((0..h).flat_map(|y| [(Point::new(0, y), Dir::East), (Point::new(w - 1, y), Dir::West)]))
            .collect();
        let grid: &Grid<u8> = shared;
        starts
            .par_iter()
            .map(|&(p, d)| energized(grid, p, d))
            .max()
            .map(|n| n.to_string())
            .ok_or_else(|| SolveError::failed("empty contraption"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = r".|...\....
|.-.\.....
.....|-...
........|.
..........
.........\
..../.\\..
.-.-/..|..
.|....-|.\
..//.|....
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "46");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "51");
    }

    #[test]
    fn beam_loops_terminate() {
        let grid = Grid::parse_bytes("/.\\\n\\./\n").unwrap();
        assert_eq!(energized(&grid, Point::new(1, 0), Dir::East), 6);
    }
}
