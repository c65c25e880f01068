//! Polygon area on the integer lattice

use super::grid::Point;

/// Twice the area enclosed by a closed polygon (shoelace formula).
///
/// The last vertex connects back to the first.
pub fn shoelace_area2(vertices: &[Point]) -> i64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<i64>()
        .abs()
}

/// Lattice points on the edges of an axis-aligned polygon
pub fn boundary_points(vertices: &[Point]) -> i64 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].manhattan(vertices[(i + 1) % n]) as i64)
        .sum()
}

/// Lattice points strictly inside the polygon (Pick's theorem)
pub fn interior_points(area2: i64, boundary: i64) -> i64 {
    (area2 - boundary) / 2 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square() {
        let square = [
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(4, 4),
            Point::new(0, 4),
        ];
        let area2 = shoelace_area2(&square);
        assert_eq!(area2, 32);
        let boundary = boundary_points(&square);
        assert_eq!(boundary, 16);
        assert_eq!(interior_points(area2, boundary), 9);
    }

    #[test]
    fn orientation_does_not_matter() {
        let tri = [Point::new(0, 0), Point::new(0, 3), Point::new(3, 0)];
        let mut rev = tri;
        rev.reverse();
        assert_eq!(shoelace_area2(&tri), 9);
        assert_eq!(shoelace_area2(&rev), 9);
    }
}
