//! Random and structured point generation for tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::point::Point;
use crate::geometry::util::Bounds;

pub use super::RandomPointGenerationError;

fn check_range(range: (f64, f64)) -> Result<(), RandomPointGenerationError> {
    if !(range.0.is_finite() && range.1.is_finite()) || range.0 >= range.1 {
        return Err(RandomPointGenerationError::InvalidRange {
            min: range.0,
            max: range.1,
        });
    }
    Ok(())
}

/// Generates `n_points` uniformly distributed points with a fixed seed.
///
/// The same seed always yields the same points.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] if either range is
/// empty, inverted or non-finite.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::util::generate_random_points_seeded;
///
/// let a = generate_random_points_seeded(10, (0.0, 1.0), (-5.0, 5.0), 42).unwrap();
/// let b = generate_random_points_seeded(10, (0.0, 1.0), (-5.0, 5.0), 42).unwrap();
/// assert_eq!(a, b);
/// assert!(a.iter().all(|p| (0.0..1.0).contains(&p.x()) && (-5.0..5.0).contains(&p.y())));
/// ```
pub fn generate_random_points_seeded(
    n_points: usize,
    x_range: (f64, f64),
    y_range: (f64, f64),
    seed: u64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    check_range(x_range)?;
    check_range(y_range)?;

    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..n_points)
        .map(|_| {
            Point::new(
                rng.random_range(x_range.0..x_range.1),
                rng.random_range(y_range.0..y_range.1),
            )
        })
        .collect())
}

/// Generates `n_points` seeded points inside `bounds`.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] for a degenerate
/// rectangle.
pub fn generate_random_points_in_bounds(
    n_points: usize,
    bounds: &Bounds,
    seed: u64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    generate_random_points_seeded(
        n_points,
        (bounds.min().x(), bounds.max().x()),
        (bounds.min().y(), bounds.max().y()),
        seed,
    )
}

/// Generates a regular `points_per_axis × points_per_axis` grid starting at
/// `offset`.
///
/// Grids are maximally cocircular and make a good stress input for the
/// Delaunay test.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidPointCount`] when
/// `points_per_axis` is zero and [`RandomPointGenerationError::InvalidSpacing`]
/// when `spacing` is not a positive finite number.
pub fn generate_grid_points(
    points_per_axis: usize,
    spacing: f64,
    offset: Point,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    if points_per_axis == 0 {
        return Err(RandomPointGenerationError::InvalidPointCount { n_points: 0 });
    }
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(RandomPointGenerationError::InvalidSpacing { spacing });
    }

    let mut points = Vec::with_capacity(points_per_axis.saturating_mul(points_per_axis));
    let mut y = offset.y();
    for _ in 0..points_per_axis {
        let mut x = offset.x();
        for _ in 0..points_per_axis {
            points.push(Point::new(x, y));
            x += spacing;
        }
        y += spacing;
    }
    Ok(points)
}
