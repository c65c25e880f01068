use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::grid::{Dir, Grid, Point};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 17, tags = ["clumsy-crucible", "grid", "a-star"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = Grid<u32>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Ok(Grid::parse_with(input, |c| c.to_digit(10))?)
    }
}

/// Least heat lost from the top-left to the bottom-right block when the crucible
/// must move between `min_run` and `max_run` blocks before turning.
///
/// A* search; the heuristic charges the cheapest block for every remaining step.
pub fn least_heat_loss(grid: &Grid<u32>, min_run: i64, max_run: i64) -> Option<u32> {
    let target = Point::new(grid.width() as i64 - 1, grid.height() as i64 - 1);
    let cheapest = grid.cells().iter().copied().min()?;
    let estimate = |p: Point| cheapest * p.manhattan(target) as u32;
    // Every state arrives at a block having just finished a straight run,
    // so only the axis of that run matters.
    let mut best: HashMap<(Point, bool), u32> = HashMap::new();
    let mut queue = BinaryHeap::new();
    for dir in [Dir::East, Dir::South] {
        queue.push(Reverse((estimate(Point::ORIGIN), 0u32, Point::ORIGIN, dir.turn_left())));
    }

    while let Some(Reverse((_, heat, p, last))) = queue.pop() {
        if p == target {
            return Some(heat);
        }
        if best.get(&(p, last.is_vertical())).is_some_and(|&h| h < heat) {
            continue;
        }
        for dir in [last.turn_left(), last.turn_right()] {
            let mut total = heat;
            for steps in 1..=max_run {
                let next = p.step_by(dir, steps);
                let Some(&loss) = grid.get(next) else { break };
                total += loss;
                if steps < min_run {
                    continue;
                }
                let key = (next, dir.is_vertical());
                if best.get(&key).is_none_or(|&h| total < h) {
                    best.insert(key, total);
                    queue.push(Reverse((total + estimate(next), total, next, dir)));
                }
            }
        }
    }
    None
}

fn answer(grid: &Grid<u32>, min_run: i64, max_run: i64) -> Result<String, SolveError> {
    least_heat_loss(grid, min_run, max_run)
        .map(|h| h.to_string())
        .ok_or_else(|| SolveError::failed("the factory cannot be reached"))
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        answer(shared, 1, 3)
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        answer(shared, 4, 10)
    }
}
