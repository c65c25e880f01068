use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::geometry::{interior_points, shoelace_area2};
use crate::utils::grid::{Dir, Grid, Point};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 10, tags = ["pipe-maze", "grid", "geometry"])]
pub struct Solver;

/// Directions a pipe tile connects to
fn connections(tile: u8) -> Option<[Dir; 2]> {
    Some(match tile {
        b'|' => [Dir::North, Dir::South],
        b'-' => [Dir::East, Dir::West],
        b'L' => [Dir::North, Dir::East],
        b'J' => [Dir::North, Dir::West],
        b'7' => [Dir::South, Dir::West],
        b'F' => [Dir::South, Dir::East],
        _ => return None,
    })
}

#[derive(Debug)]
pub struct SharedData {
    grid: Grid<u8>,
    start: Point,
    main_loop: Option<Vec<Point>>,
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = Grid::parse_bytes(input)?;
        let start = grid
            .position(|&b| b == b'S')
            .ok_or_else(|| ParseError::MissingData("no start tile `S`".into()))?;
        Ok(SharedData {
            grid,
            start,
            main_loop: None,
        })
    }
}

fn connects(grid: &Grid<u8>, p: Point, towards: Dir) -> bool {
    grid.get(p)
        .and_then(|&b| connections(b))
        .is_some_and(|dirs| dirs.contains(&towards))
}

/// Tiles of the loop through `start`, in walking order
pub fn find_loop(grid: &Grid<u8>, start: Point) -> Result<Vec<Point>, SolveError> {
    let mut dir = Dir::ALL
        .into_iter()
        .find(|&d| connects(grid, start.step(d), d.opposite()))
        .ok_or_else(|| SolveError::failed("start is not connected to any pipe"))?;

    let mut tiles = vec![start];
    let mut current = start.step(dir);
    while current != start {
        tiles.push(current);
        let [a, b] = grid
            .get(current)
            .and_then(|&t| connections(t))
            .ok_or_else(|| SolveError::failed(format!("loop broken at {current:?}")))?;
        let came_from = dir.opposite();
        dir = if a == came_from {
            b
        } else if b == came_from {
            a
        } else {
            return Err(SolveError::failed(format!("pipe at {current:?} does not connect back")));
        };
        current = current.step(dir);
    }
    Ok(tiles)
}

fn main_loop(shared: &mut SharedData) -> Result<&[Point], SolveError> {
    if shared.main_loop.is_none() {
        shared.main_loop = Some(find_loop(&shared.grid, shared.start)?);
    }
    Ok(shared.main_loop.as_deref().unwrap_or_default())
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok((main_loop(shared)?.len() / 2).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let tiles = main_loop(shared)?;
        let enclosed = interior_points(shoelace_area2(tiles), tiles.len() as i64);
        Ok(enclosed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const SQUARE: &str = ".....
.S-7.
.|.|.
.L-J.
.....
";

    const COMPLEX: &str = "..F7.
.FJ|.
SJ.L7
|F--J
LJ...
";

    const ENCLOSED: &str = "...........
.S-------7.
.|F-----7|.
.||.....||.
.||.....||.
.|L-7.F-J|.
.|..|.|..|.
.L--J.L--J.
...........
";

    const LARGER: &str = ".F----7F7F7F7F-7....
.|F--7||||||||FJ....
.||.FJ||||||||L7....
FJL7L7LJLJ||LJ.L-7..
L--J.L7...LJS7F-7L7.
....F-J..F7FJ|L7L7L7
....L7.F7||L7|.L7L7|
.....|FJLJ|FJ|F7|.LJ
....FJL-7.||.||||...
....L---J.LJ.LJLJ...
";

    // Loose pipes around the loop are junk, not walls.
    const NOISY: &str = "FF7FSF7F7F7F7F7F---7
L|LJ||||||||||||F--J
FL-7LJLJ||||||LJL-77
F--JF--7||LJLJ7F7FJ-
L---JF-JLJ.||-FJLJJ7
|F|F-JF---7F7-L7L|7|
|FFJF7L7F-JF7|JL---7
7-L-JL7||F7|L7F-7F7|
L.L7LFJ|||||FJL7||LJ
L7JLJL-JLJLJL--JLJ.L
";

    #[test]
    fn part_1_examples() {
        assert_eq!(solve_example::<Solver>(SQUARE, 1), "4");
        assert_eq!(solve_example::<Solver>(COMPLEX, 1), "8");
    }

    #[test]
    fn part_2_examples() {
        assert_eq!(solve_example::<Solver>(SQUARE, 2), "1");
        assert_eq!(solve_example::<Solver>(ENCLOSED, 2), "4");
        assert_eq!(solve_example::<Solver>(LARGER, 2), "8");
    }

    #[test]
    fn junk_pipes_are_ignored() {
        assert_eq!(solve_example::<Solver>(NOISY, 2), "10");
    }

    #[test]
    fn missing_start() {
        assert!(matches!(
            <Solver as AocParser>::parse("F7\nLJ\n"),
            Err(ParseError::MissingData(_))
        ));
    }

    #[test]
    fn isolated_start_fails_to_solve() {
        let mut shared = <Solver as AocParser>::parse("...\n.S.\n...\n").unwrap();
        assert!(<Solver as PartSolver<1>>::solve(&mut shared).is_err());
    }
}
