//! Geometric utility functions: bounding rectangles, circumcircles and point
//! generation.

use thiserror::Error;

use crate::geometry::point::Point;

pub mod bounds;
pub mod circumcircle;
pub mod point_generation;

pub use bounds::Bounds;
pub use circumcircle::{circumcenter, circumradius, strictly_inside_circumcircle};
pub use point_generation::{
    generate_grid_points, generate_random_points_in_bounds, generate_random_points_seeded,
};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during circumcircle computation.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum CircumcircleError {
    /// The three points do not span a triangle.
    #[error("Cannot compute circumcircle of collinear points {points:?}")]
    CollinearPoints {
        /// The offending points.
        points: [Point; 3],
    },
}

/// Errors that can occur while generating points.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum RandomPointGenerationError {
    /// The requested coordinate range is empty, inverted or non-finite.
    #[error("Invalid coordinate range: min={min}, max={max}")]
    InvalidRange {
        /// Lower end of the range.
        min: f64,
        /// Upper end of the range.
        max: f64,
    },
    /// A grid needs at least one point per axis.
    #[error("Invalid point count: {n_points}")]
    InvalidPointCount {
        /// The requested count.
        n_points: usize,
    },
    /// Grid spacing must be positive and finite.
    #[error("Invalid grid spacing: {spacing}")]
    InvalidSpacing {
        /// The requested spacing.
        spacing: f64,
    },
}
