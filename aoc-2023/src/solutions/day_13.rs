use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::grid::Grid;
use crate::utils::parse::blocks;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 13, tags = ["point-of-incidence", "grid"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = Vec<Grid<bool>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        blocks(input)
            .into_iter()
            .map(|block| {
                Grid::parse_with(&block.join("\n"), |c| match c {
                    '#' => Some(true),
                    '.' => Some(false),
                    _ => None,
                })
                .map_err(ParseError::from)
            })
            .collect()
    }
}

/// Rows above a horizontal mirror line whose two halves differ in exactly `smudges` cells
fn mirror_row(grid: &Grid<bool>, smudges: usize) -> Option<usize> {
    let rows: Vec<&[bool]> = grid.rows().collect();
    (1..rows.len()).find(|&split| {
        let differences: usize = rows[..split]
            .iter()
            .rev()
            .zip(&rows[split..])
            .map(|(a, b)| a.iter().zip(b.iter()).filter(|(x, y)| x != y).count())
            .sum();
        differences == smudges
    })
}

/// `columns left of a vertical line + 100 * rows above a horizontal line`
pub fn summarize(grid: &Grid<bool>, smudges: usize) -> Option<usize> {
    mirror_row(grid, smudges)
        .map(|rows| rows * 100)
        .or_else(|| mirror_row(&grid.transpose(), smudges))
}

fn total(patterns: &[Grid<bool>], smudges: usize) -> Result<usize, SolveError> {
    patterns
        .iter()
        .enumerate()
        .map(|(i, p)| {
            summarize(p, smudges)
                .ok_or_else(|| SolveError::failed(format!("pattern {} has no mirror line", i + 1)))
        })
        .sum()
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(total(shared, 0)?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(total(shared, 1)?.to_string())
    }
}
