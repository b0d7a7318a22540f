// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Convex hull of pixel sets and polygon area.
//!
//! Hulls are computed by imageproc on integer pixel coordinates.
//! Degenerate sets (less than 3 distinct points, or all collinear)
//! are handled here and never reach it.

use imageproc::geometry;
use imageproc::point::Point;

use crate::misc::type_aliases::{Float, Pixel};

/// Convex hull vertices of a set of `(row, column)` pixel coordinates.
///
/// Vertices are returned as image points, `x` being the column and `y` the row.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
pub fn convex_hull(pixels: &[Pixel]) -> Vec<Point<i64>> {
    let points: Vec<Point<i64>> = pixels
        .iter()
        .map(|&(row, col)| Point::new(col as i64, row as i64))
        .collect();
    hull_of_points(&points)
}

/// Convex hull of a set of image points.
///
/// Collinear sets reduce to their two extreme points.
pub fn hull_of_points(points: &[Point<i64>]) -> Vec<Point<i64>> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| (a.x, a.y).cmp(&(b.x, b.y)));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }
    let (first, last) = (sorted[0], sorted[sorted.len() - 1]);
    if sorted.iter().all(|&p| cross(first, last, p) == 0) {
        return vec![first, last];
    }
    geometry::convex_hull(sorted)
}

/// Z component of the cross product of `(a -> b)` and `(a -> c)`.
fn cross(a: Point<i64>, b: Point<i64>, c: Point<i64>) -> i64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Area of a simple polygon given by its ordered vertices (shoelace formula).
///
/// Polygons with less than 3 vertices have a zero area.
pub fn area(polygon: &[Point<i64>]) -> Float {
    let nb_vertices = polygon.len();
    if nb_vertices < 3 {
        return 0.0;
    }
    let mut twice_area: i64 = 0;
    for i in 0..nb_vertices {
        let p = polygon[i];
        let q = polygon[(i + 1) % nb_vertices];
        twice_area += p.x * q.y - q.x * p.y;
    }
    #[allow(clippy::cast_precision_loss)]
    let area = twice_area.abs() as Float / 2.0;
    area
}

// TESTS #############################################################

#[cfg(test)]
mod tests {

    use super::*;

    fn rectangle(rows: usize, cols: usize) -> Vec<Pixel> {
        let mut pixels = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                pixels.push((row + 10, col + 20));
            }
        }
        pixels
    }

    #[test]
    fn solid_rectangle_area() {
        // Hull goes through pixel centers so a 5x4 block spans 4x3.
        let hull = convex_hull(&rectangle(5, 4));
        assert_eq!(12.0, area(&hull));
    }

    #[test]
    fn degenerate_hulls() {
        assert_eq!(0.0, area(&convex_hull(&[])));
        assert_eq!(0.0, area(&convex_hull(&[(1, 1)])));
        assert_eq!(0.0, area(&convex_hull(&[(1, 1), (4, 4)])));
        assert_eq!(0.0, area(&convex_hull(&[(0, 0), (0, 5), (0, 9)])));
        assert_eq!(0.0, area(&convex_hull(&[(2, 2), (2, 2), (2, 2)])));
        assert_eq!(2, convex_hull(&[(0, 0), (3, 3), (1, 1), (2, 2)]).len());
    }

    #[test]
    fn triangle_area_any_orientation() {
        let ccw = [Point::new(0, 0), Point::new(4, 0), Point::new(0, 3)];
        let cw = [Point::new(0, 0), Point::new(0, 3), Point::new(4, 0)];
        assert_eq!(6.0, area(&ccw));
        assert_eq!(6.0, area(&cw));
    }

    #[test]
    fn interior_points_are_dropped() {
        let pixels = [(0, 0), (0, 10), (10, 0), (10, 10), (5, 5), (3, 7), (0, 5)];
        let hull = convex_hull(&pixels);
        assert!(!hull.contains(&Point::new(5, 5)));
        assert!(!hull.contains(&Point::new(7, 3)));
        assert_eq!(100.0, area(&hull));
    }

    #[test]
    fn hull_of_hulls_is_hull() {
        let left = rectangle(5, 4);
        let right: Vec<Pixel> = rectangle(3, 3).iter().map(|&(r, c)| (r, c + 30)).collect();
        let direct = area(&convex_hull(&[left.clone(), right.clone()].concat()));
        let mut vertices = convex_hull(&left);
        vertices.extend(convex_hull(&right));
        let merged = area(&hull_of_points(&vertices));
        assert_eq!(direct, merged);
    }
}
