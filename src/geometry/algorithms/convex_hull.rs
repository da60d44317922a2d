//! Convex hull of an arbitrary point list (Graham scan).
//!
//! This is independent of the triangulation: it works on any slice of
//! points, e.g. to outline a cluster before choosing a bounding rectangle.
//!
//! # References
//!
//! - R. L. Graham, "An Efficient Algorithm for Determining the Convex Hull of
//!   a Finite Planar Set", Information Processing Letters, 1972.

use std::cmp::Ordering;

use crate::geometry::point::Point;
use crate::geometry::predicates::{cross_product_z, is_left_turn};

/// Returns the convex hull of `points` in counter-clockwise order, starting
/// from the bottom-most (then left-most) point.
///
/// Collinear points on hull edges and duplicates are dropped. Inputs of at
/// most three points are returned unchanged; non-finite points are skipped
/// otherwise.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::algorithms::convex_hull::convex_hull;
/// use planar_delaunay::geometry::point::Point;
///
/// let points: Vec<Point> = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (2.0, 2.0)]
///     .into_iter()
///     .map(Point::from)
///     .collect();
/// let hull = convex_hull(&points);
/// assert_eq!(hull, &points[..4]);
/// ```
#[must_use]
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() <= 3 {
        return points.to_vec();
    }

    let finite: Vec<Point> = points.iter().copied().filter(Point::is_finite).collect();
    let Some(pivot) = finite
        .iter()
        .copied()
        .min_by(|p, q| p.y().total_cmp(&q.y()).then(p.x().total_cmp(&q.x())))
    else {
        return Vec::new();
    };

    let mut rest: Vec<Point> = finite.into_iter().filter(|p| *p != pivot).collect();
    rest.sort_by(|p, q| by_polar_angle(&pivot, p, q));

    let mut hull = vec![pivot];
    for p in rest {
        while hull.len() >= 2 && !is_left_turn(&hull[hull.len() - 2], &hull[hull.len() - 1], &p) {
            hull.pop();
        }
        hull.push(p);
    }
    hull
}

/// Orders `p` and `q` by polar angle around `pivot`, nearer first on ties.
///
/// Every point lies in the half-plane above `pivot` (or to its right on the
/// same row), so the cross product alone gives a total order on angles.
fn by_polar_angle(pivot: &Point, p: &Point, q: &Point) -> Ordering {
    let cross = cross_product_z(pivot, p, pivot, q);
    if cross > 0.0 {
        Ordering::Less
    } else if cross < 0.0 {
        Ordering::Greater
    } else {
        pivot.distance(p).total_cmp(&pivot.distance(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::util::generate_random_points_seeded;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn test_square_with_interior_point() {
        let points = pts(&[(2.0, 2.0), (4.0, 4.0), (0.0, 4.0), (4.0, 0.0), (0.0, 0.0)]);
        assert_eq!(
            convex_hull(&points),
            pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])
        );
    }

    #[test]
    fn test_small_inputs_are_returned_unchanged() {
        assert!(convex_hull(&[]).is_empty());
        let three = pts(&[(1.0, 1.0), (0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(convex_hull(&three), three);
    }

    #[test]
    fn test_collinear_and_duplicate_points_are_dropped() {
        let points = pts(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (4.0, 0.0),
            (4.0, 2.0),
            (4.0, 4.0),
            (2.0, 2.0),
            (0.0, 4.0),
            (0.0, 2.0),
            (4.0, 4.0),
        ]);
        assert_eq!(
            convex_hull(&points),
            pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])
        );
    }

    #[test]
    fn test_pivot_ties_pick_leftmost() {
        let points = pts(&[(3.0, 0.0), (1.0, 0.0), (2.0, 3.0), (2.0, 1.0)]);
        assert_eq!(
            convex_hull(&points),
            pts(&[(1.0, 0.0), (3.0, 0.0), (2.0, 3.0)])
        );
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let points = pts(&[
            (0.0, 0.0),
            (f64::NAN, 1.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (f64::INFINITY, 0.0),
        ]);
        assert_eq!(convex_hull(&points), pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]));
    }

    #[test]
    fn test_random_hull_is_convex_and_encloses_input() {
        let points = generate_random_points_seeded(200, (-10.0, 10.0), (-10.0, 10.0), 7).unwrap();
        let hull = convex_hull(&points);
        assert!(hull.len() >= 3);
        let n = hull.len();
        for i in 0..n {
            let (a, b) = (hull[i], hull[(i + 1) % n]);
            assert!(is_left_turn(&a, &b, &hull[(i + 2) % n]));
            for p in &points {
                assert!(cross_product_z(&a, &b, &a, p) >= 0.0);
            }
        }
    }
}
