//! Rectangular grids addressed by [`Point`]

use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("point ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i64, y: i64 },
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{cells} cells cannot fill a {width}x{height} grid")]
    Shape {
        width: usize,
        height: usize,
        cells: usize,
    },
    #[error("unexpected {ch:?} at ({x}, {y})")]
    InvalidCell { x: usize, y: usize, ch: char },
}

impl From<GridError> for aoc_solver::ParseError {
    fn from(e: GridError) -> Self {
        aoc_solver::ParseError::InvalidFormat(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dir {
    North,
    East,
    South,
    West,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

    /// Offset of one step; y grows downwards
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Dir::North => (0, -1),
            Dir::East => (1, 0),
            Dir::South => (0, 1),
            Dir::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::East => Dir::West,
            Dir::South => Dir::North,
            Dir::West => Dir::East,
        }
    }

    pub const fn turn_right(self) -> Dir {
        match self {
            Dir::North => Dir::East,
            Dir::East => Dir::South,
            Dir::South => Dir::West,
            Dir::West => Dir::North,
        }
    }

    pub const fn turn_left(self) -> Dir {
        self.turn_right().opposite()
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Dir::North | Dir::South)
    }

    /// Accepts `U/D/L/R`, `N/E/S/W` and arrow characters
    pub fn from_char(c: char) -> Option<Dir> {
        match c {
            'U' | 'N' | '^' => Some(Dir::North),
            'R' | 'E' | '>' => Some(Dir::East),
            'D' | 'S' | 'v' => Some(Dir::South),
            'L' | 'W' | '<' => Some(Dir::West),
            _ => None,
        }
    }

    /// Index into [`Dir::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub const fn step(self, dir: Dir) -> Self {
        self.step_by(dir, 1)
    }

    pub const fn step_by(self, dir: Dir, n: i64) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx * n, dy * n)
    }

    /// The four orthogonal neighbours, in [`Dir::ALL`] order
    pub fn cardinal(self) -> [Point; 4] {
        Dir::ALL.map(|d| self.step(d))
    }

    /// The eight surrounding points
    pub fn around(self) -> impl Iterator<Item = Point> {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&d| d != (0, 0))
            .map(move |(dx, dy)| self.offset(dx, dy))
    }

    pub fn manhattan(self, other: Point) -> u64 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Point::new(x, y)
    }
}

/// Row-major rectangle of cells.
///
/// ```
/// use aoc_2023::utils::grid::{Grid, Point};
///
/// let grid = Grid::from_fn(10, 5, |p| p.x * p.y);
/// assert_eq!(grid.get(Point::new(9, 4)), Some(&36));
/// assert_eq!(grid.get(Point::new(10, 4)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    pub fn new(width: usize, height: usize, cells: Vec<T>) -> Result<Self, GridError> {
        if width * height != cells.len() {
            return Err(GridError::Shape {
                width,
                height,
                cells: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != width {
                return Err(GridError::Ragged {
                    row,
                    expected: width,
                    found: cols.len(),
                });
            }
            cells.extend(cols);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(Point) -> T) -> Self {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Point::new(x as i64, y as i64)))
            .map(&mut f)
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Parse one cell per character; blank lines are skipped.
    pub fn parse_with(text: &str, mut f: impl FnMut(char) -> Option<T>) -> Result<Self, GridError> {
        let rows = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(y, line)| {
                line.chars()
                    .enumerate()
                    .map(|(x, ch)| f(ch).ok_or(GridError::InvalidCell { x, y, ch }))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    fn index(&self, p: Point) -> Option<usize> {
        self.contains(p)
            .then(|| p.y as usize * self.width + p.x as usize)
    }

    fn point_at(&self, index: usize) -> Point {
        Point::new((index % self.width) as i64, (index / self.width) as i64)
    }

    pub fn get(&self, p: Point) -> Option<&T> {
        self.index(p).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, p: Point) -> Option<&mut T> {
        self.index(p).map(|i| &mut self.cells[i])
    }

    pub fn get_offset(&self, p: Point, dx: i64, dy: i64) -> Option<&T> {
        self.get(p.offset(dx, dy))
    }

    /// Read as if the grid repeated forever in every direction
    pub fn get_wrapped(&self, p: Point) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let x = p.x.rem_euclid(self.width as i64);
        let y = p.y.rem_euclid(self.height as i64);
        self.get(Point::new(x, y))
    }

    /// Replace a cell, returning the previous value
    pub fn set(&mut self, p: Point, value: T) -> Result<T, GridError> {
        let cell = self
            .get_mut(p)
            .ok_or(GridError::OutOfBounds { x: p.x, y: p.y })?;
        Ok(std::mem::replace(cell, value))
    }

    /// First point, row-major, whose cell satisfies `pred`
    pub fn position(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Point> {
        self.cells
            .iter()
            .position(|c| pred(c))
            .map(|i| self.point_at(i))
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.cells.len()).map(|i| self.point_at(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (self.point_at(i), c))
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks() rejects a zero chunk size
        self.cells.chunks(self.width.max(1))
    }

    pub fn row(&self, y: usize) -> Option<&[T]> {
        (y < self.height).then(|| &self.cells[y * self.width..(y + 1) * self.width])
    }

    pub fn column(&self, x: usize) -> impl Iterator<Item = &T> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .skip(x)
            .step_by(width.max(1))
            .take(if x < width { self.height } else { 0 })
    }

    pub fn columns(&self) -> impl Iterator<Item = Vec<&T>> + '_ {
        (0..self.width).map(|x| self.column(x).collect())
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    pub fn fold<A>(&self, init: A, mut f: impl FnMut(A, Point, &T) -> A) -> A {
        self.iter().fold(init, |acc, (p, c)| f(acc, p, c))
    }
}

impl<T: Clone> Grid<T> {
    pub fn of_size(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    pub fn transpose(&self) -> Self {
        Grid::from_fn(self.height, self.width, |p| {
            self.cells[p.x as usize * self.width + p.y as usize].clone()
        })
    }

    pub fn rotate_clockwise(&self) -> Self {
        let h = self.height as i64;
        Grid::from_fn(self.height, self.width, |p| {
            self.cells[((h - 1 - p.x) as usize) * self.width + p.y as usize].clone()
        })
    }

    pub fn rotate_counter_clockwise(&self) -> Self {
        let w = self.width as i64;
        Grid::from_fn(self.height, self.width, |p| {
            self.cells[p.x as usize * self.width + (w - 1 - p.y) as usize].clone()
        })
    }

    /// Surround the grid with a one-cell border of `border`
    pub fn wrap(&self, border: T) -> Self {
        Grid::from_fn(self.width + 2, self.height + 2, |p| {
            self.get(p.offset(-1, -1)).cloned().unwrap_or_else(|| border.clone())
        })
    }

    /// Copy with one cell replaced
    pub fn with(&self, p: Point, value: T) -> Result<Self, GridError> {
        let mut copy = self.clone();
        copy.set(p, value)?;
        Ok(copy)
    }
}

impl Grid<u8> {
    /// Byte grid of the non-blank lines of `text`
    pub fn parse_bytes(text: &str) -> Result<Self, GridError> {
        let rows = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .map(|l| l.as_bytes().to_vec())
            .collect();
        Self::from_rows(rows)
    }
}

impl<T: fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Grid<char> {
        Grid::parse_with("abc\ndef\n", Some).unwrap()
    }

    fn to_rows(grid: &Grid<char>) -> Vec<String> {
        grid.rows().map(|r| r.iter().collect()).collect()
    }

    #[test]
    fn shape_and_access() {
        let g = sample();
        assert_eq!((g.width(), g.height()), (3, 2));
        assert_eq!(g.get(Point::new(2, 1)), Some(&'f'));
        assert_eq!(g.get_offset(Point::new(2, 1), -2, -1), Some(&'a'));
        assert_eq!(g.get(Point::new(-1, 0)), None);
        assert_eq!(g.get(Point::new(3, 0)), None);
        assert_eq!(g.get_wrapped(Point::new(-1, -1)), Some(&'f'));
        assert_eq!(g.get_wrapped(Point::new(4, 5)), Some(&'e'));
        assert_eq!(g.position(|&c| c == 'e'), Some(Point::new(1, 1)));
        assert_eq!(g.to_string(), "abc\ndef");
    }

    #[test]
    fn rows_and_columns() {
        let g = sample();
        assert_eq!(g.row(1), Some(&['d', 'e', 'f'][..]));
        assert_eq!(g.row(2), None);
        let columns: Vec<String> = g.columns().map(|c| c.into_iter().collect()).collect();
        assert_eq!(columns, vec!["ad", "be", "cf"]);
    }

    #[test]
    fn rotations() {
        let g = sample();
        assert_eq!(to_rows(&g.rotate_clockwise()), vec!["da", "eb", "fc"]);
        assert_eq!(to_rows(&g.rotate_counter_clockwise()), vec!["cf", "be", "ad"]);
        assert_eq!(to_rows(&g.transpose()), vec!["ad", "be", "cf"]);
    }

    #[test]
    fn wrap_adds_border() {
        let g = sample().wrap('#');
        assert_eq!(to_rows(&g), vec!["#####", "#abc#", "#def#", "#####"]);
    }

    #[test]
    fn set_and_with() {
        let mut g = sample();
        assert_eq!(g.set(Point::new(0, 0), 'z'), Ok('a'));
        assert_eq!(
            g.set(Point::new(0, 2), 'z'),
            Err(GridError::OutOfBounds { x: 0, y: 2 })
        );
        let h = g.with(Point::new(1, 0), 'y').unwrap();
        assert_eq!(h.to_string(), "zyc\ndef");
        assert_eq!(g.to_string(), "zbc\ndef");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Grid::parse_bytes("ab\nc\n"),
            Err(GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Grid::parse_with("12\n3x", |c| c.to_digit(10)),
            Err(GridError::InvalidCell { x: 1, y: 1, ch: 'x' })
        );
        assert!(Grid::new(2, 2, vec![1, 2, 3]).is_err());
    }

    #[test]
    fn fold_and_map() {
        let g = Grid::from_fn(10, 5, |p| p.x * p.y);
        assert_eq!(g.get(Point::new(9, 4)), Some(&36));
        assert_eq!(g.fold(0, |acc, _, v| acc + v), 45 * 10);
        assert_eq!(g.map(|v| v % 2).cells().iter().sum::<i64>(), 10);
    }

    #[test]
    fn dir_turns() {
        for d in Dir::ALL {
            assert_eq!(d.turn_left().turn_right(), d);
            assert_eq!(d.turn_right().turn_right(), d.opposite());
            assert_eq!(Point::ORIGIN.step(d).step(d.opposite()), Point::ORIGIN);
        }
        assert_eq!(Point::new(1, 1).around().count(), 8);
    }

    proptest! {
        #[test]
        fn four_rotations_are_identity(w in 1usize..6, h in 1usize..6) {
            let g = Grid::from_fn(w, h, |p| p.x * 10 + p.y);
            let r = g.rotate_clockwise().rotate_clockwise().rotate_clockwise().rotate_clockwise();
            prop_assert_eq!(&r, &g);
            prop_assert_eq!(g.rotate_clockwise().rotate_counter_clockwise(), g.clone());
            prop_assert_eq!(g.transpose().transpose(), g);
        }
    }
}
