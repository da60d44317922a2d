//! Incremental Delaunay triangulation inside a fixed bounding rectangle.
//!
//! The triangulation starts as the bounding rectangle split along its
//! `top_left`-`bottom_right` diagonal (the *superstructure*) and grows one
//! point at a time:
//!
//! 1. The spatial cache supplies a nearby starting triangle.
//! 2. A separating-rib walk finds the triangle containing the point.
//! 3. The point is ignored, splits a rib, or splits the triangle.
//! 4. The reshaped triangles are registered in the cache and seed a flip
//!    repair that restores the Delaunay property.
//!
//! Points are never removed, and neither are triangles or ribs, so every key
//! handed out stays valid for the lifetime of the triangulation.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::core::algorithms::flips::repair_delaunay;
use crate::core::algorithms::incremental_insertion::{
    InsertionError, InsertionOutcome, insert_at,
};
use crate::core::algorithms::locate::{LocateError, Location, locate};
use crate::core::collections::spatial_cache::DEFAULT_GROWTH_RATE;
use crate::core::collections::{FastHashSet, SpatialCache, fast_hash_set_with_capacity};
use crate::core::rib::Rib;
use crate::core::triangle::Triangle;
use crate::core::triangulation_data_structure::{
    RibKey, Tds, TriangleKey, TriangulationConstructionError, TriangulationValidationError,
};
use crate::core::util::delaunay_validation::validate_delaunay;
use crate::geometry::point::Point;
use crate::geometry::predicates::{DEFAULT_EPSILON, is_separated};
use crate::geometry::util::Bounds;

// =============================================================================
// OPTIONS
// =============================================================================

/// Tunables for a [`DelaunayTriangulation`].
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::delaunay_triangulation::{
///     TriangulationOptions, TriangulationOptionsBuilder,
/// };
///
/// let options = TriangulationOptionsBuilder::default()
///     .epsilon(1e-9)
///     .max_flips(10_000_usize)
///     .build()
///     .unwrap();
/// assert_eq!(options.epsilon, 1e-9);
/// assert_eq!(options.cache_growth_rate, 6);
/// assert_eq!(options.max_flips, Some(10_000));
///
/// assert!(TriangulationOptionsBuilder::default().epsilon(-1.0).build().is_err());
/// assert_eq!(TriangulationOptions::default().max_flips, None);
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct TriangulationOptions {
    /// Absolute tolerance for "same point" and "on rib" tests.
    #[builder(default = "DEFAULT_EPSILON")]
    pub epsilon: f64,
    /// Average number of triangles per cache cell before the cache doubles.
    #[builder(default = "DEFAULT_GROWTH_RATE")]
    pub cache_growth_rate: usize,
    /// Flip budget per repair; `None` scales with the mesh size.
    #[builder(setter(into, strip_option), default)]
    pub max_flips: Option<usize>,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            cache_growth_rate: DEFAULT_GROWTH_RATE,
            max_flips: None,
        }
    }
}

impl TriangulationOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(epsilon) = self.epsilon {
            if !epsilon.is_finite() || epsilon < 0.0 {
                return Err(format!(
                    "epsilon must be finite and non-negative, got {epsilon}"
                ));
            }
        }
        if self.cache_growth_rate == Some(0) {
            return Err("cache_growth_rate must be at least 1".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// REPORTS
// =============================================================================

/// Result of a single [`DelaunayTriangulation::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertionReport {
    /// Which edit was performed.
    pub outcome: InsertionOutcome,
    /// Flips performed by the repair that followed.
    pub flips: usize,
}

/// Totals from [`DelaunayTriangulation::insert_all`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InsertionSummary {
    /// Points that changed the mesh.
    pub inserted: usize,
    /// Points that coincided with an existing vertex.
    pub ignored: usize,
    /// Flips performed across all insertions.
    pub flips: usize,
}

// =============================================================================
// TRIANGULATION
// =============================================================================

/// A Delaunay triangulation of points inside a bounding rectangle.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::algorithms::incremental_insertion::InsertionOutcome;
/// use planar_delaunay::core::delaunay_triangulation::DelaunayTriangulation;
/// use planar_delaunay::geometry::point::Point;
///
/// let mut dt =
///     DelaunayTriangulation::new(Point::new(0.0, 10.0), Point::new(10.0, 0.0)).unwrap();
/// assert_eq!(dt.number_of_triangles(), 2);
///
/// let report = dt.insert(Point::new(3.0, 4.0)).unwrap();
/// assert_eq!(report.outcome, InsertionOutcome::SplitTriangle);
/// assert_eq!(dt.number_of_triangles(), 4);
///
/// // Within epsilon of an existing vertex: nothing changes.
/// let report = dt.insert(Point::new(3.0 + 1e-7, 4.0)).unwrap();
/// assert_eq!(report.outcome, InsertionOutcome::Ignored);
/// assert_eq!(dt.number_of_vertices(), 5);
/// assert!(dt.validate_delaunay().is_ok());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DelaunayTriangulation {
    tds: Tds,
    cache: SpatialCache,
    bounds: Bounds,
    options: TriangulationOptions,
}

impl DelaunayTriangulation {
    /// Creates the superstructure for the rectangle spanned by two opposite
    /// corners, using default options.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationConstructionError::DegenerateBounds`] if a
    /// corner is non-finite or the rectangle has zero width or height.
    pub fn new(top_left: Point, bottom_right: Point) -> Result<Self, TriangulationConstructionError> {
        Self::with_options(top_left, bottom_right, TriangulationOptions::default())
    }

    /// Creates the superstructure with explicit options.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new), plus a repair or topology error if the
    /// superstructure cannot be built (never expected).
    pub fn with_options(
        top_left: Point,
        bottom_right: Point,
        options: TriangulationOptions,
    ) -> Result<Self, TriangulationConstructionError> {
        let bounds = Bounds::from_corners(top_left, bottom_right);
        if !top_left.is_finite() || !bottom_right.is_finite() || !bounds.is_proper() {
            return Err(TriangulationConstructionError::DegenerateBounds {
                top_left,
                bottom_right,
            });
        }

        let bottom_left = Point::new(top_left.x(), bottom_right.y());
        let top_right = Point::new(bottom_right.x(), top_left.y());

        let mut tds = Tds::new();
        let left = tds.reserve_triangle();
        let right = tds.reserve_triangle();
        let diagonal = tds.insert_rib(Rib::new(top_left, bottom_right, Some(left), Some(right)));
        let left_rib = tds.insert_rib(Rib::new(top_left, bottom_left, Some(left), None));
        let right_rib = tds.insert_rib(Rib::new(top_right, bottom_right, Some(right), None));
        let top_rib = tds.insert_rib(Rib::new(top_left, top_right, Some(right), None));
        let bottom_rib = tds.insert_rib(Rib::new(bottom_left, bottom_right, Some(left), None));
        tds.set_triangle_ribs(left, [left_rib, bottom_rib, diagonal])?;
        tds.set_triangle_ribs(right, [right_rib, top_rib, diagonal])?;

        // Each cache quadrant starts at the half its center falls into.
        let quadrant = |fx: f64, fy: f64| {
            let center = Point::new(
                bounds.width().mul_add(fx, bounds.min().x()),
                bounds.height().mul_add(fy, bounds.min().y()),
            );
            if is_separated(&top_left, &bottom_right, &center, &top_right) {
                left
            } else {
                right
            }
        };
        let mut cache = SpatialCache::new(options.cache_growth_rate, bounds);
        cache.initialize(
            quadrant(0.25, 0.25),
            quadrant(0.75, 0.25),
            quadrant(0.25, 0.75),
            quadrant(0.75, 0.75),
        );

        repair_delaunay(&mut tds, [left, right], options.max_flips)?;

        tracing::debug!(%bounds, ?options, "created triangulation superstructure");
        Ok(Self {
            tds,
            cache,
            bounds,
            options,
        })
    }

    /// Creates the superstructure and inserts `points` in order.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new), or
    /// [`TriangulationConstructionError::FailedToAddPoint`] naming the first
    /// point that could not be inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::core::delaunay_triangulation::DelaunayTriangulation;
    /// use planar_delaunay::geometry::point::Point;
    ///
    /// let dt = DelaunayTriangulation::with_points(
    ///     Point::new(0.0, 4.0),
    ///     Point::new(4.0, 0.0),
    ///     [(1.0, 1.0), (3.0, 1.5), (2.0, 3.0)],
    /// )
    /// .unwrap();
    /// assert_eq!(dt.number_of_triangles(), 8);
    /// assert_eq!(dt.number_of_vertices(), 7);
    /// ```
    pub fn with_points<I, P>(
        top_left: Point,
        bottom_right: Point,
        points: I,
    ) -> Result<Self, TriangulationConstructionError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let mut dt = Self::new(top_left, bottom_right)?;
        for (index, point) in points.into_iter().enumerate() {
            dt.insert(point.into())
                .map_err(|source| TriangulationConstructionError::FailedToAddPoint {
                    index,
                    source,
                })?;
        }
        Ok(dt)
    }

    // -------------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------------

    /// Inserts one point and restores the Delaunay property.
    ///
    /// Coordinates within epsilon of a side of the rectangle are snapped
    /// onto it, so the outer boundary stays straight.
    ///
    /// # Errors
    ///
    /// - [`InsertionError::NonFinitePoint`] or [`InsertionError::OutOfBounds`]
    ///   before anything is touched.
    /// - [`InsertionError::Location`], [`InsertionError::Topology`] or
    ///   [`InsertionError::Repair`] if the mesh is inconsistent or repair
    ///   does not converge.
    pub fn insert(&mut self, point: Point) -> Result<InsertionReport, InsertionError> {
        if !point.is_finite() {
            return Err(InsertionError::NonFinitePoint { point });
        }
        let epsilon = self.options.epsilon;
        if !self.bounds.contains(&point, epsilon) {
            return Err(InsertionError::OutOfBounds {
                point,
                bounds: self.bounds,
            });
        }
        let point = self.bounds.snap(&point, epsilon);

        let location = locate(&self.tds, &point, self.cache.get(&point), epsilon)?;
        let (outcome, produced) = insert_at(&mut self.tds, location, point)?;
        if produced.is_empty() {
            tracing::debug!(%point, "ignored point near an existing vertex");
            return Ok(InsertionReport { outcome, flips: 0 });
        }

        for &key in &produced {
            self.cache.update(key, self.tds.triangle(key)?);
        }
        // Every reshaped triangle counts, reused keys included: a split
        // triangle adds 3, a boundary rib 2 and an interior rib 4.
        self.cache.increment_node_count(produced.len());

        let stats = repair_delaunay(
            &mut self.tds,
            produced.iter().copied(),
            self.options.max_flips,
        )?;
        tracing::debug!(
            %point,
            ?outcome,
            flips = stats.flips_performed,
            triangles = self.tds.number_of_triangles(),
            "inserted point"
        );
        Ok(InsertionReport {
            outcome,
            flips: stats.flips_performed,
        })
    }

    /// Inserts every point in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first [`InsertionError`]. Points before it stay inserted.
    pub fn insert_all<I, P>(&mut self, points: I) -> Result<InsertionSummary, InsertionError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        let mut summary = InsertionSummary::default();
        for point in points {
            let report = self.insert(point.into())?;
            if report.outcome.is_inserted() {
                summary.inserted += 1;
            } else {
                summary.ignored += 1;
            }
            summary.flips += report.flips;
        }
        Ok(summary)
    }

    // -------------------------------------------------------------------------
    // Read surface
    // -------------------------------------------------------------------------

    /// Iterates over `(key, triangle)` pairs.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.tds.triangles()
    }

    /// Iterates over `(key, rib)` pairs.
    pub fn ribs(&self) -> impl Iterator<Item = (RibKey, &Rib)> {
        self.tds.ribs()
    }

    /// Number of triangles.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.tds.number_of_triangles()
    }

    /// Number of ribs.
    #[must_use]
    pub fn number_of_ribs(&self) -> usize {
        self.tds.number_of_ribs()
    }

    /// Distinct mesh vertices (the four rectangle corners included), sorted
    /// by `x` then `y`.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point> {
        let mut vertices: Vec<Point> = self.unique_vertices().into_iter().collect();
        vertices.sort_by(|p, q| p.x().total_cmp(&q.x()).then(p.y().total_cmp(&q.y())));
        vertices
    }

    /// Number of distinct mesh vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.unique_vertices().len()
    }

    fn unique_vertices(&self) -> FastHashSet<Point> {
        // V = E - T + 1 for a triangulated rectangle.
        let mut unique = fast_hash_set_with_capacity(
            (self.tds.number_of_ribs() + 1).saturating_sub(self.tds.number_of_triangles()),
        );
        unique.extend(self.tds.ribs().flat_map(|(_, rib)| rib.points()));
        unique
    }

    /// The bounding rectangle.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// The options in effect.
    #[must_use]
    pub const fn options(&self) -> &TriangulationOptions {
        &self.options
    }

    /// The underlying rib/triangle arenas.
    #[must_use]
    pub const fn tds(&self) -> &Tds {
        &self.tds
    }

    /// The location hint cache.
    #[must_use]
    pub const fn cache(&self) -> &SpatialCache {
        &self.cache
    }

    /// Locates `point` starting from its cache hint.
    ///
    /// # Errors
    ///
    /// Returns a [`LocateError`] if the point is outside the mesh or the walk
    /// fails.
    pub fn locate(&self, point: &Point) -> Result<Location, LocateError> {
        locate(&self.tds, point, self.cache.get(point), self.options.epsilon)
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Runs the structural checks.
    ///
    /// # Errors
    ///
    /// Returns the first [`TriangulationValidationError`] found.
    pub fn is_valid(&self) -> Result<(), TriangulationValidationError> {
        self.tds.is_valid()
    }

    /// Runs the structural checks, then the local Delaunay check on every
    /// interior rib.
    ///
    /// # Errors
    ///
    /// Returns the first [`TriangulationValidationError`] found.
    pub fn validate_delaunay(&self) -> Result<(), TriangulationValidationError> {
        self.is_valid()?;
        validate_delaunay(&self.tds)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithms::flips::flip_required;
    use crate::core::collections::spatial_cache::INITIAL_CACHE_SIZE;

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

    fn square(side: f64) -> DelaunayTriangulation {
        DelaunayTriangulation::new(Point::new(0.0, side), Point::new(side, 0.0)).unwrap()
    }

    #[test]
    fn test_superstructure() {
        init_tracing();
        let dt = square(10.0);
        assert_eq!(dt.number_of_triangles(), 2);
        assert_eq!(dt.number_of_ribs(), 5);
        assert_eq!(
            dt.vertices(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 10.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ]
        );
        assert!(dt.validate_delaunay().is_ok());
        assert_eq!(dt.ribs().filter(|(_, rib)| rib.is_boundary()).count(), 4);
        assert_eq!(dt.cache().size(), INITIAL_CACHE_SIZE);
        assert_eq!(dt.cache().node_count(), 0);

        // The diagonal joins the corners as given.
        let diagonal = dt
            .ribs()
            .find(|(_, rib)| !rib.is_boundary())
            .map(|(_, rib)| *rib)
            .unwrap();
        assert!(diagonal.connects(&Point::new(0.0, 10.0), &Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_cache_hints_cover_each_half() {
        let dt = square(8.0);
        for p in [(1.0, 1.0), (7.0, 1.0), (1.0, 7.0), (7.0, 7.0)] {
            let p = Point::from(p);
            let hint = dt.cache().get(&p).unwrap();
            assert!(dt.tds().contains_triangle(hint));
        }
        // Low-x/low-y quadrant lies entirely on the bottom-left half.
        let hint = dt.cache().get(&Point::new(1.0, 1.0)).unwrap();
        assert!(dt
            .tds()
            .triangle(hint)
            .unwrap()
            .vertex_index(&Point::new(0.0, 0.0))
            .is_some());
    }

    #[test]
    fn test_degenerate_bounds_are_rejected() {
        for (a, b) in [
            ((0.0, 1.0), (5.0, 1.0)),
            ((2.0, 0.0), (2.0, 4.0)),
            ((0.0, f64::INFINITY), (1.0, 0.0)),
            ((f64::NAN, 1.0), (1.0, 0.0)),
        ] {
            assert!(matches!(
                DelaunayTriangulation::new(Point::from(a), Point::from(b)),
                Err(TriangulationConstructionError::DegenerateBounds { .. })
            ));
        }
    }

    #[test]
    fn test_insert_outcomes_and_counts() {
        init_tracing();
        let mut dt = square(4.0);

        let report = dt.insert(Point::new(1.0, 2.5)).unwrap();
        assert_eq!(report.outcome, InsertionOutcome::SplitTriangle);
        assert_eq!(dt.number_of_triangles(), 4);

        let report = dt.insert(Point::new(2.0, 0.0)).unwrap();
        assert_eq!(report.outcome, InsertionOutcome::SplitBoundaryRib);
        assert_eq!(dt.number_of_triangles(), 5);

        let report = dt.insert(Point::new(1.0, 2.5 + 1e-7)).unwrap();
        assert_eq!(report.outcome, InsertionOutcome::Ignored);
        assert_eq!(report.flips, 0);
        assert_eq!(dt.number_of_triangles(), 5);

        assert!(dt.validate_delaunay().is_ok());
        assert_eq!(dt.cache().node_count(), 3 + 2);
    }

    #[test]
    fn test_insert_on_diagonal_splits_interior_rib() {
        let mut dt = square(4.0);
        let report = dt.insert(Point::new(1.0, 3.0)).unwrap();
        assert_eq!(report.outcome, InsertionOutcome::SplitInteriorRib);
        assert_eq!(dt.number_of_triangles(), 4);
        assert_eq!(dt.number_of_ribs(), 8);
        assert!(dt.validate_delaunay().is_ok());
    }

    #[test]
    fn test_rejected_points_leave_mesh_untouched() {
        let mut dt = square(1.0);
        assert!(matches!(
            dt.insert(Point::new(1.5, 0.5)),
            Err(InsertionError::OutOfBounds { .. })
        ));
        assert!(matches!(
            dt.insert(Point::new(f64::NAN, 0.5)),
            Err(InsertionError::NonFinitePoint { .. })
        ));
        assert_eq!(dt.number_of_triangles(), 2);
        assert_eq!(dt.cache().node_count(), 0);
    }

    #[test]
    fn test_point_just_outside_is_snapped_onto_boundary() {
        let mut dt = square(1.0);
        let report = dt.insert(Point::new(0.5, -5e-7)).unwrap();
        assert_eq!(report.outcome, InsertionOutcome::SplitBoundaryRib);
        assert!(dt.vertices().contains(&Point::new(0.5, 0.0)));
        assert!(dt.is_valid().is_ok());
    }

    #[test]
    fn test_no_flip_required_after_inserts() {
        init_tracing();
        let mut dt = square(100.0);
        let summary = dt
            .insert_all([
                (12.0, 80.0),
                (55.0, 43.0),
                (71.0, 12.0),
                (33.0, 21.0),
                (90.0, 91.0),
                (48.0, 60.0),
                (50.0, 50.0),
            ])
            .unwrap();
        assert_eq!(summary.inserted, 7);
        assert_eq!(summary.ignored, 0);
        for key in dt.tds().triangle_keys() {
            assert_eq!(flip_required(dt.tds(), key), Ok(None));
        }
        assert!(dt.validate_delaunay().is_ok());
    }

    #[test]
    fn test_with_points_reports_failing_index() {
        let err = DelaunayTriangulation::with_points(
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
            [(0.5, 0.5), (2.0, 2.0)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TriangulationConstructionError::FailedToAddPoint {
                index: 1,
                source: InsertionError::OutOfBounds { .. }
            }
        ));
    }

    #[test]
    fn test_options_builder_validation() {
        assert!(TriangulationOptionsBuilder::default()
            .epsilon(f64::NAN)
            .build()
            .is_err());
        assert!(TriangulationOptionsBuilder::default()
            .cache_growth_rate(0_usize)
            .build()
            .is_err());
        let options = TriangulationOptionsBuilder::default().build().unwrap();
        assert_eq!(options, TriangulationOptions::default());

        let dt = DelaunayTriangulation::with_options(
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
            TriangulationOptionsBuilder::default()
                .cache_growth_rate(1_usize)
                .build()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(dt.cache().growth_rate(), 1);
        assert_eq!(dt.options().cache_growth_rate, 1);
    }
}
