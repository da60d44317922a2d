//! Property-based tests for the Graham-scan convex hull.
//!
//! Properties on lattice inputs (exact arithmetic):
//! - Every hull vertex is an input point
//! - The hull is strictly convex and counter-clockwise
//! - Every input point is on or inside the hull
//! - The hull does not depend on the order of the input

use planar_delaunay::prelude::*;
use proptest::prelude::*;

fn lattice_points() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(
        (-50_i32..=50, -50_i32..=50).prop_map(|(x, y)| Point::new(f64::from(x), f64::from(y))),
        4..40,
    )
}

#[test]
fn test_hull_of_triangulation_vertices_is_the_rectangle() {
    let dt = DelaunayTriangulation::with_points(
        Point::new(-2.0, 3.0),
        Point::new(5.0, -1.0),
        [(0.0, 0.0), (1.0, 2.0), (4.0, -0.5), (-1.0, 1.0)],
    )
    .unwrap();
    assert_eq!(
        convex_hull(&dt.vertices()),
        vec![
            Point::new(-2.0, -1.0),
            Point::new(5.0, -1.0),
            Point::new(5.0, 3.0),
            Point::new(-2.0, 3.0),
        ]
    );
}

proptest! {
    #[test]
    fn prop_hull_vertices_come_from_input(points in lattice_points()) {
        let hull = convex_hull(&points);
        prop_assert!(!hull.is_empty());
        for v in &hull {
            prop_assert!(points.contains(v));
        }
    }

    #[test]
    fn prop_hull_is_convex_and_encloses_input(points in lattice_points()) {
        let hull = convex_hull(&points);
        let n = hull.len();
        prop_assume!(n >= 3);
        for i in 0..n {
            let (a, b, c) = (hull[i], hull[(i + 1) % n], hull[(i + 2) % n]);
            prop_assert!(is_left_turn(&a, &b, &c), "not convex at {b}");
            for p in &points {
                prop_assert!(cross_product_z(&a, &b, &a, p) >= 0.0, "{p} outside edge {a}-{b}");
            }
        }
    }

    #[test]
    fn prop_hull_ignores_input_order(points in lattice_points()) {
        let reversed: Vec<Point> = points.iter().rev().copied().collect();
        prop_assert_eq!(convex_hull(&points), convex_hull(&reversed));
    }
}
