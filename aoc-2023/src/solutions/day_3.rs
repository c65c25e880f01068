use std::collections::HashMap;

use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::grid::{Grid, Point};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 3, tags = ["gear-ratios", "grid"])]
pub struct Solver;

/// A number in the schematic and the row span it occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartNumber {
    pub value: u32,
    pub y: i64,
    pub x_start: i64,
    pub x_end: i64,
}

impl PartNumber {
    /// Cells touching the number, diagonals included
    fn neighbours(&self) -> impl Iterator<Item = Point> + '_ {
        (self.y - 1..=self.y + 1).flat_map(move |y| {
            (self.x_start - 1..=self.x_end + 1)
                .map(move |x| Point::new(x, y))
                .filter(move |p| p.y != self.y || p.x < self.x_start || p.x > self.x_end)
        })
    }
}

#[derive(Debug)]
pub struct SharedData {
    grid: Grid<u8>,
    numbers: Vec<PartNumber>,
}

fn is_symbol(b: u8) -> bool {
    b != b'.' && !b.is_ascii_digit()
}

fn find_numbers(grid: &Grid<u8>) -> Vec<PartNumber> {
    let mut numbers = Vec::new();
    for (y, row) in grid.rows().enumerate() {
        let mut x = 0;
        while x < row.len() {
            if !row[x].is_ascii_digit() {
                x += 1;
                continue;
            }
            let start = x;
            let mut value = 0u32;
            while x < row.len() && row[x].is_ascii_digit() {
                value = value * 10 + u32::from(row[x] - b'0');
                x += 1;
            }
            numbers.push(PartNumber {
                value,
                y: y as i64,
                x_start: start as i64,
                x_end: x as i64 - 1,
            });
        }
    }
    numbers
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = Grid::parse_bytes(input)?;
        let numbers = find_numbers(&grid);
        Ok(SharedData { grid, numbers })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let grid = &shared.grid;
        let sum: u32 = shared
            .numbers
            .iter()
            .filter(|n| {
                n.neighbours()
                    .any(|p| grid.get(p).is_some_and(|&b| is_symbol(b)))
            })
            .map(|n| n.value)
            .sum();
        Ok(sum.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut gears: HashMap<Point, Vec<u32>> = HashMap::new();
        for number in &shared.numbers {
            for p in number.neighbours() {
                if shared.grid.get(p) == Some(&b'*') {
                    gears.entry(p).or_default().push(number.value);
                }
            }
        }
        let sum: u64 = gears
            .values()
            .filter(|adjacent| adjacent.len() == 2)
            .map(|adjacent| u64::from(adjacent[0]) * u64::from(adjacent[1]))
            .sum();
        Ok(sum.to_string())
    }
}
