use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::grid::{Grid, Point};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 11, tags = ["cosmic-expansion", "grid"])]
pub struct Solver;

#[derive(Debug)]
pub struct Image {
    galaxies: Vec<Point>,
    empty_rows: Vec<i64>,
    empty_cols: Vec<i64>,
}

impl AocParser for Solver {
    type SharedData<'a> = Image;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = Grid::parse_with(input, |c| match c {
            '#' => Some(true),
            '.' => Some(false),
            _ => None,
        })?;
        let galaxies: Vec<Point> = grid.iter().filter(|&(_, &g)| g).map(|(p, _)| p).collect();
        let empty_rows = (0..grid.height())
            .filter(|&y| grid.row(y).is_some_and(|row| !row.contains(&true)))
            .map(|y| y as i64)
            .collect();
        let empty_cols = (0..grid.width())
            .filter(|&x| !grid.column(x).any(|&g| g))
            .map(|x| x as i64)
            .collect();
        Ok(Image {
            galaxies,
            empty_rows,
            empty_cols,
        })
    }
}

impl Image {
    /// Sum of pairwise galaxy distances when each empty row and column is `factor` wide
    pub fn distance_sum(&self, factor: i64) -> i64 {
        let grow = |v: i64, empty: &[i64]| v + (factor - 1) * empty.partition_point(|&e| e < v) as i64;
        let expanded: Vec<Point> = self
            .galaxies
            .iter()
            .map(|p| Point::new(grow(p.x, &self.empty_cols), grow(p.y, &self.empty_rows)))
            .collect();
        expanded
            .iter()
            .enumerate()
            .flat_map(|(i, a)| expanded[i + 1..].iter().map(move |b| a.manhattan(*b) as i64))
            .sum()
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.distance_sum(2).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.distance_sum(1_000_000).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "...#......
.......#..
#.........
..........
......#...
.#........
.........#
..........
.......#..
#...#.....
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "374");
    }

    #[test]
    fn larger_expansion_factors() {
        let image = <Solver as AocParser>::parse(EXAMPLE).unwrap();
        assert_eq!(image.distance_sum(10), 1030);
        assert_eq!(image.distance_sum(100), 8410);
    }

    #[test]
    fn empty_lines_are_found() {
        let image = <Solver as AocParser>::parse(EXAMPLE).unwrap();
        assert_eq!(image.empty_rows, vec![3, 7]);
        assert_eq!(image.empty_cols, vec![2, 5, 8]);
    }

    #[test]
    fn unknown_pixel_is_rejected() {
        assert!(<Solver as AocParser>::parse("#.\n.x\n").is_err());
    }
}
