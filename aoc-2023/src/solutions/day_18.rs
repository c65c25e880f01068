use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::geometry::{boundary_points, interior_points, shoelace_area2};
use crate::utils::grid::{Dir, Point};
use crate::utils::parse::lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2023, day = 18, tags = ["lavaduct-lagoon", "geometry"])]
pub struct Solver;

/// One dig instruction, read both ways
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub dir: Dir,
    pub len: i64,
    /// Direction and length hidden in the colour code
    pub hex_dir: Dir,
    pub hex_len: i64,
}

fn parse_instruction(line: &str) -> anyhow::Result<Instruction> {
    let mut fields = line.split_whitespace();
    let (Some(dir), Some(len), Some(color), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        bail!("expected `<dir> <len> (#rrggbb)`");
    };
    let dir = dir
        .chars()
        .next()
        .and_then(Dir::from_char)
        .ok_or_else(|| anyhow!("unknown direction `{dir}`"))?;
    let hex = color
        .strip_prefix("(#")
        .and_then(|c| c.strip_suffix(')'))
        .filter(|h| h.len() == 6 && h.is_ascii())
        .ok_or_else(|| anyhow!("bad colour `{color}`"))?;
    let hex_dir = match &hex[5..] {
        "0" => Dir::East,
        "1" => Dir::South,
        "2" => Dir::West,
        "3" => Dir::North,
        other => bail!("bad direction digit `{other}`"),
    };
    Ok(Instruction {
        dir,
        len: len.parse()?,
        hex_dir,
        hex_len: i64::from_str_radix(&hex[..5], 16)?,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Instruction>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        lines(input)
            .enumerate()
            .map(|(idx, line)| {
                parse_instruction(line)
                    .map_err(|e| ParseError::InvalidFormat(format!("(line {}) {}", idx + 1, e)))
            })
            .collect()
    }
}

/// Cubic metres of lava the trench and its interior hold
pub fn lagoon_size(steps: impl IntoIterator<Item = (Dir, i64)>) -> i64 {
    let mut corners = Vec::new();
    let mut at = Point::ORIGIN;
    for (dir, len) in steps {
        at = at.step_by(dir, len);
        corners.push(at);
    }
    let boundary = boundary_points(&corners);
    interior_points(shoelace_area2(&corners), boundary) + boundary
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(lagoon_size(shared.iter().map(|i| (i.dir, i.len))).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(lagoon_size(shared.iter().map(|i| (i.hex_dir, i.hex_len))).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solutions::solve_example;

    const EXAMPLE: &str = "R 6 (#70c710)
D 5 (#0dc571)
L 2 (#5713f0)
D 2 (#d2c081)
R 2 (#59c680)
D 2 (#411b91)
L 5 (#8ceee2)
U 2 (#caa173)
L 1 (#1b58a2)
U 2 (#caa171)
R 2 (#7807d2)
U 3 (#a77fa3)
L 2 (#015232)
U 2 (#7a21e3)
";

    #[test]
    fn part_1_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 1), "62");
    }

    #[test]
    fn part_2_example() {
        assert_eq!(solve_example::<Solver>(EXAMPLE, 2), "952408144115");
    }

    #[test]
    fn colour_decoding() {
        let i = parse_instruction("R 6 (#70c710)").unwrap();
        assert_eq!(i.hex_dir, Dir::East);
        assert_eq!(i.hex_len, 461937);
    }

    #[test]
    fn unit_square_trench() {
        let square = [(Dir::East, 1), (Dir::South, 1), (Dir::West, 1), (Dir::North, 1)];
        assert_eq!(lagoon_size(square), 4);
    }

    #[test]
    fn malformed_lines() {
        assert!(parse_instruction("X 6 (#70c710)").is_err());
        assert!(parse_instruction("R 6 (#70c71)").is_err());
        assert!(parse_instruction("R 6 (#70c714)").is_err());
        assert!(parse_instruction("R 6").is_err());
    }
}
