use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use indexmap::IndexSet;

use crate::utils::graph::Graph;
use crate::utils::grid::{Dir, Grid, Point};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 23, tags = ["long-walk", "graph", "dfs"])]
pub struct Solver;

#[derive(Debug)]
pub struct Trails {
    map: Grid<u8>,
    start: Point,
    end: Point,
}

impl AocParser for Solver {
    type SharedData<'a> = Trails;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let map = Grid::parse_bytes(input)?;
        if let Some((p, &c)) = map.iter().find(|(_, c)| !b"#.^>v<".contains(*c)) {
            return Err(ParseError::InvalidFormat(format!(
                "unexpected {:?} at ({}, {})",
                c as char, p.x, p.y
            )));
        }
        let open_in_row = |y: usize| {
            map.row(y)
                .and_then(|row| row.iter().position(|&b| b == b'.'))
                .map(|x| Point::new(x as i64, y as i64))
        };
        let start = open_in_row(0)
            .ok_or_else(|| ParseError::MissingData("no opening in the top row".into()))?;
        let end = open_in_row(map.height().saturating_sub(1))
            .ok_or_else(|| ParseError::MissingData("no opening in the bottom row".into()))?;
        Ok(Trails { map, start, end })
    }
}

impl Trails {
    fn is_open(&self, p: Point) -> bool {
        self.map.get(p).is_some_and(|&b| b != b'#')
    }

    fn exits(&self, p: Point) -> impl Iterator<Item = Dir> + '_ {
        Dir::ALL.into_iter().filter(move |&d| self.is_open(p.step(d)))
    }

    fn is_junction(&self, p: Point) -> bool {
        p == self.start || p == self.end || self.exits(p).count() > 2
    }

    /// Walk a corridor from junction `from` heading `dir` to the next junction.
    ///
    /// Returns `None` at dead ends, and when `slippery` and a slope points against the walk.
    fn follow(&self, from: Point, mut dir: Dir, slippery: bool) -> Option<(Point, u32)> {
        let mut at = from;
        let mut steps = 0;
        loop {
            at = at.step(dir);
            steps += 1;
            if slippery {
                if let Some(slope) = self.map.get(at).and_then(|&b| Dir::from_char(b as char)) {
                    if slope != dir {
                        return None;
                    }
                }
            }
            if self.is_junction(at) {
                return Some((at, steps));
            }
            let back = dir.opposite();
            dir = self.exits(at).find(|&d| d != back)?;
        }
    }

    /// Junctions linked by the corridors between them, weighted by length
    pub fn junction_graph(&self, slippery: bool) -> Graph<(), u32, Point> {
        let mut graph = Graph::new();
        let junctions: Vec<Point> = self
            .map
            .iter()
            .filter(|&(p, &b)| b != b'#' && self.is_junction(p))
            .map(|(p, _)| p)
            .collect();
        for &j in &junctions {
            graph.add_node(j, ());
        }
        for &j in &junctions {
            for dir in self.exits(j) {
                if let Some((to, len)) = self.follow(j, dir, slippery) {
                    if to != j && graph.link(&j, &to).is_none_or(|l| *l.data < len) {
                        graph.add_link(j, to, len);
                    }
                }
            }
        }
        graph
    }

    /// Length of the longest path from start to end visiting no tile twice
    pub fn longest_hike(&self, slippery: bool) -> Option<u32> {
        let graph = self.junction_graph(slippery);
        let ids: IndexSet<Point> = graph.nodes().map(|n| *n.id).collect();
        let adjacency: Vec<Vec<(usize, u32)>> = ids
            .iter()
            .map(|id| {
                graph
                    .linked_nodes(id, true)
                    .filter_map(|(to, &len)| ids.get_index_of(to).map(|i| (i, len)))
                    .collect()
            })
            .collect();
        let start = ids.get_index_of(&self.start)?;
        let end = ids.get_index_of(&self.end)?;
        let mut visited = vec![false; ids.len()];
        longest_from(&adjacency, start, end, &mut visited)
    }
}

fn longest_from(adjacency: &[Vec<(usize, u32)>], at: usize, end: usize, visited: &mut [bool]) -> Option<u32> {
    if at == end {
        return Some(0);
    }
    visited[at] = true;
    let best = adjacency[at]
        .iter()
        .filter_map(|&(next, len)| {
            if visited[next] {
                return None;
            }
            longest_from(adjacency, next, end, visited).map(|rest| rest + len)
        })
        .max();
    visited[at] = false;
    best
}

fn answer(trails: &Trails, slippery: bool) -> Result<String, SolveError> {
    trails
        .longest_hike(slippery)
        .map(|n| n.to_string())
        .ok_or_else(|| SolveError::failed("no path from start to end"))
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        answer(shared, true)
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        answer(shared, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    // The right-hand loop can only be walked once slopes are ignored.
    const MAZE: &str = "#.#####
#.....#
#.###v#
#...>.#
###.###
";

    const EXAMPLE: &str = "#.#####################
#.......#########...###
#######.#########.#.###
###.....#.>.>.###.#.###
###v#####.#v#.###.#.###
###.>...#.#.#.....#...#
###v###.#.#.#########.#
###...#.#.#.......#...#
#####.#.#.#######.#.###
#.....#.#.#.......#...#
#.#####.#.#.#########v#
#.#...#...#...###...>.#
#.#.#v#######v###.###v#
#...#.>.#...>.>.#.###.#
#####v#.#.###v#.#.###.#
#.....#...#...#.#.#...#
#.#########.###.#.#.###
#...###...#...#...#.###
###.###.#.###v#####v###
#...#...#.#.>.>.#.>.###
#.###.###.#.###.#.#v###
#.....###...###...#...#
#####################.#
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "94");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "154");
    }

    #[test]
    fn part_1_respects_slopes() {
        assert_eq!(solve_example::<Solver>(MAZE, 1), "6");
    }

    #[test]
    fn part_2_ignores_slopes() {
        assert_eq!(solve_example::<Solver>(MAZE, 2), "10");
    }

    #[test]
    fn junctions() {
        let trails = <Solver as AocParser>::parse(MAZE).unwrap();
        let graph = trails.junction_graph(false);
        let mut nodes: Vec<Point> = graph.nodes().map(|n| *n.id).collect();
        nodes.sort();
        assert_eq!(
            nodes,
            vec![Point::new(1, 0), Point::new(1, 1), Point::new(3, 3), Point::new(3, 4)]
        );
        assert_eq!(graph.link(&Point::new(1, 1), &Point::new(3, 3)).map(|l| *l.data), Some(8));
        let slippery = trails.junction_graph(true);
        assert_eq!(slippery.link(&Point::new(1, 1), &Point::new(3, 3)).map(|l| *l.data), Some(4));
    }

    #[test]
    fn blocked_maze_has_no_hike() {
        let mut trails = <Solver as AocParser>::parse("#.#\n#v#\n#^#\n#.#\n").unwrap();
        assert!(<Solver as PartSolver<1>>::solve(&mut trails).is_err());
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut trails).unwrap(), "3");
    }
}
