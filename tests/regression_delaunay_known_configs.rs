//! Deterministic regression tests for degenerate and numerically challenging
//! point sets.
//!
//! Each configuration is inserted into a fixed rectangle and must produce a
//! structurally valid Delaunay mesh with the expected triangle count. Grids,
//! rings and collinear runs exercise cocircular quads, rib splits and points
//! on rib extensions.

use planar_delaunay::prelude::*;

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Defines a regression test for a configuration inside the square
/// `[0, $side]²`.
///
/// The test:
/// - builds the point set,
/// - inserts it in order,
/// - checks the triangle count, structural validity, the local Delaunay
///   property and empty circumcircles.
macro_rules! regression_delaunay_config_test {
    ($name:ident, $side:expr, $expected_triangles:expr, $build_points:block) => {
        #[test]
        fn $name() {
            init_tracing();
            let points: Vec<Point> = $build_points;
            let side: f64 = $side;

            let dt = DelaunayTriangulation::with_points(
                Point::new(0.0, side),
                Point::new(side, 0.0),
                points.iter().copied(),
            )
            .unwrap_or_else(|err| panic!("{} failed to build: {err}", stringify!($name)));

            assert_eq!(dt.number_of_triangles(), $expected_triangles);
            assert!(dt.is_valid().is_ok());
            assert!(
                dt.validate_delaunay().is_ok(),
                "{} should be Delaunay",
                stringify!($name)
            );
            assert!(validate_empty_circumcircles(dt.tds(), 1e-6).is_ok());
        }
    };
}

// =============================================================================
// GRIDS AND RINGS (COCIRCULAR)
// =============================================================================

regression_delaunay_config_test!(regression_unit_grid_10x10, 10.0, 2 + 2 * 100, {
    generate_grid_points(10, 1.0, Point::new(0.5, 0.5)).unwrap()
});

regression_delaunay_config_test!(regression_grid_touching_sides, 4.0, 2 + 2 * 9 + 12, {
    // 5x5 lattice with spacing 1: 9 interior points, 12 side points that
    // are not corners, 4 corners that coincide with the rectangle.
    generate_grid_points(5, 1.0, Point::new(0.0, 0.0)).unwrap()
});

regression_delaunay_config_test!(regression_ring_of_48, 10.0, 2 + 2 * 48, {
    (0..48)
        .map(|i| {
            let angle = f64::from(i) * std::f64::consts::TAU / 48.0;
            Point::new(4.0f64.mul_add(angle.cos(), 5.0), 4.0f64.mul_add(angle.sin(), 5.0))
        })
        .collect()
});

// =============================================================================
// COLLINEAR RUNS
// =============================================================================

regression_delaunay_config_test!(regression_horizontal_run, 10.0, 2 + 2 * 9, {
    (1..10).map(|x| Point::new(f64::from(x), 5.0)).collect()
});

regression_delaunay_config_test!(regression_run_on_superstructure_diagonal, 10.0, 2 + 2 * 9, {
    (1..10)
        .map(|x| Point::new(f64::from(x), 10.0 - f64::from(x)))
        .collect()
});

regression_delaunay_config_test!(regression_run_along_rib_extension, 4.0, 2 + 2 * 3, {
    vec![
        Point::new(1.0, 2.0),
        Point::new(1.5, 3.0),
        Point::new(0.5, 1.0),
    ]
});

// =============================================================================
// BOUNDARY POINTS
// =============================================================================

regression_delaunay_config_test!(regression_points_on_every_side, 10.0, 2 + 7, {
    vec![
        Point::new(2.5, 0.0),
        Point::new(5.0, 0.0),
        Point::new(7.5, 0.0),
        Point::new(10.0, 2.5),
        Point::new(10.0, 5.0),
        Point::new(0.0, 5.0),
        Point::new(5.0, 10.0),
    ]
});

regression_delaunay_config_test!(regression_mixed_boundary_and_interior, 10.0, 2 + 4 + 2 * 4, {
    vec![
        Point::new(5.0, 0.0),
        Point::new(5.0, 5.0),
        Point::new(0.0, 5.0),
        Point::new(2.5, 2.5),
        Point::new(10.0, 5.0),
        Point::new(7.5, 7.5),
        Point::new(5.0, 10.0),
        Point::new(1.0, 9.0),
    ]
});

// =============================================================================
// CLUSTERS
// =============================================================================

regression_delaunay_config_test!(regression_tight_cluster_near_corner, 1.0, 2 + 2 * 16, {
    (0..16)
        .map(|i| {
            let (row, col) = (f64::from(i / 4), f64::from(i % 4));
            Point::new(1e-3f64.mul_add(col, 0.01), 1e-3f64.mul_add(row, 0.01))
        })
        .collect()
});

regression_delaunay_config_test!(regression_duplicates_are_dropped, 10.0, 2 + 2 * 3, {
    vec![
        Point::new(3.0, 3.0),
        Point::new(3.0, 3.0),
        Point::new(6.0, 4.0),
        Point::new(3.0 + 5e-7, 3.0 - 5e-7),
        Point::new(4.0, 8.0),
        Point::new(6.0, 4.0),
    ]
});

// =============================================================================
// SLIVERS
// =============================================================================

/// Sum of the unsigned triangle areas. Equals the rectangle's area exactly
/// when no triangle overlaps another.
fn triangle_area_sum(dt: &DelaunayTriangulation) -> f64 {
    dt.triangles()
        .map(|(_, triangle)| {
            let [a, b, c] = triangle.vertices();
            cross_product_z(a, b, a, c).abs() / 2.0
        })
        .sum()
}

/// Points a few epsilon above the bottom side of the unit square. Their
/// triangles are slivers whose float orientation and in-circle signs are
/// unreliable, and one rib split lands next to a neighbor thinner than
/// epsilon.
#[test]
fn regression_sliver_run_above_bottom_side() {
    init_tracing();
    let points = [
        Point::new(0.218_696_910_671_509_2, 3.174_853_826_676_544_6e-6),
        Point::new(0.749_338_429_099_273_2, 3.875_750_992_009_56e-6),
        Point::new(0.996_317_356_324_285, 5.575_057_224_207_294e-7),
        Point::new(0.112_864_999_809_817_9, 3.859_342_798_581_878e-6),
        Point::new(0.049_400_054_431_981_255, 1.702_808_265_043_981_4e-6),
        Point::new(0.227_040_644_966_867_27, 2.237_329_181_652_854_5e-6),
        Point::new(0.204_575_156_668_338_14, 2.012_517_131_935_499e-6),
        Point::new(0.216_797_563_052_165_7, 3.908_213_587_884_752e-6),
    ];
    let mut dt = DelaunayTriangulation::new(Point::new(0.0, 1.0), Point::new(1.0, 0.0)).unwrap();

    let mut outcomes = Vec::with_capacity(points.len());
    for (i, &point) in points.iter().enumerate() {
        let report = dt
            .insert(point)
            .unwrap_or_else(|err| panic!("insert #{i} ({point}) failed: {err}"));
        outcomes.push(report.outcome);
        assert!(dt.is_valid().is_ok(), "mesh folded after insert #{i}");
    }

    // The third point is within epsilon of the bottom side and is snapped.
    assert_eq!(outcomes[2], InsertionOutcome::SplitBoundaryRib);
    assert_eq!(dt.number_of_triangles(), 2 + 1 + 2 * 7);
    assert!(dt.validate_delaunay().is_ok());
    assert!(find_delaunay_violations(dt.tds()).unwrap().is_empty());
    let area = triangle_area_sum(&dt);
    assert!((area - 1.0).abs() < 1e-12, "triangle areas sum to {area}");
}
