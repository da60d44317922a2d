//! Arena-backed planar mesh: ribs, triangles and their mutual adjacency.
//!
//! # Representation
//!
//! Ribs and triangles live in two [`StorageMap`] arenas and refer to each
//! other by key:
//!
//! - a [`Triangle`] stores three [`RibKey`]s plus its vertices in canonical
//!   order (see [`crate::core::triangle`]);
//! - a [`Rib`] stores its endpoints plus two `Option<TriangleKey>` slots,
//!   where `None` means "outside the triangulated rectangle".
//!
//! # Invariants
//!
//! After every public edit the structure forms a valid planar subdivision:
//!
//! - every `Some(t)` slot of a rib references a triangle that lists the rib;
//! - every rib listed by a triangle has that triangle in one of its slots;
//! - every triangle's vertex array matches its canonical rib order.
//!
//! Edits in [`crate::core::algorithms`] temporarily break these while they
//! rewire ribs, then restore them before returning. Violations found by
//! [`Tds::is_valid`] indicate a bug.
//!
//! Nothing is ever removed from the arenas, so keys handed out (including
//! stale hints held by the spatial cache) always resolve.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

use crate::core::algorithms::flips::DelaunayRepairError;
use crate::core::algorithms::incremental_insertion::InsertionError;
use crate::core::collections::StorageMap;
use crate::core::rib::Rib;
use crate::core::triangle::{Triangle, canonical_order};
use crate::core::util::delaunay_validation::validate_topology;
use crate::geometry::point::Point;

// =============================================================================
// KEYS
// =============================================================================

new_key_type! {
    /// Key type for accessing ribs in the rib arena.
    pub struct RibKey;
}

new_key_type! {
    /// Key type for accessing triangles in the triangle arena.
    ///
    /// Triangle keys survive splits and flips: both edits reuse the key of
    /// the triangle they reshape.
    pub struct TriangleKey;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Internal-invariant violations raised by adjacency queries and edits.
///
/// These never describe a recoverable condition; they indicate a corrupted
/// mesh or a caller passing keys that do not belong together.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TdsError {
    /// A rib key is not among a triangle's ribs.
    #[error("Rib {rib:?} is not a rib of triangle {triangle:?}")]
    RibNotFound {
        /// The triangle that was searched.
        triangle: TriangleKey,
        /// The rib that was looked for.
        rib: RibKey,
    },
    /// A point is not among a triangle's vertices.
    #[error("Point {vertex} is not a vertex of triangle {triangle:?}")]
    VertexNotFound {
        /// The triangle that was searched.
        triangle: TriangleKey,
        /// The point that was looked for.
        vertex: Point,
    },
    /// Two triangles (or a triangle and the outside) share no rib.
    #[error("Triangle {triangle:?} is not adjacent to {other:?}")]
    NotAdjacent {
        /// The triangle that was searched.
        triangle: TriangleKey,
        /// The expected neighbor (`None` for the outside).
        other: Option<TriangleKey>,
    },
    /// A triangle is in neither adjacency slot of a rib.
    #[error("Triangle {triangle:?} is not adjacent to rib {rib:?}")]
    TriangleNotOnRib {
        /// The rib that was searched.
        rib: RibKey,
        /// The triangle that was looked for (`None` for the outside).
        triangle: Option<TriangleKey>,
    },
    /// Three ribs do not close a triangle.
    #[error("Ribs {ribs:?} do not form a triangle")]
    DegenerateRibs {
        /// The offending ribs.
        ribs: [RibKey; 3],
    },
    /// A rib key does not resolve.
    #[error("Rib {rib:?} not found in the rib arena")]
    MissingRib {
        /// The dangling key.
        rib: RibKey,
    },
    /// A triangle key does not resolve.
    #[error("Triangle {triangle:?} not found in the triangle arena")]
    MissingTriangle {
        /// The dangling key.
        triangle: TriangleKey,
    },
    /// Two adjacent triangles do not form a strictly convex quadrilateral,
    /// so their shared rib cannot be flipped without folding the mesh.
    #[error("Triangles {first:?} and {second:?} do not form a strictly convex quadrilateral")]
    NonConvexQuad {
        /// The first triangle of the pair.
        first: TriangleKey,
        /// The second triangle of the pair.
        second: TriangleKey,
    },
}

/// Errors produced by structural and Delaunay validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TriangulationValidationError {
    /// A rib and a triangle disagree about their adjacency.
    #[error("Rib {rib:?} and triangle {triangle:?} disagree about adjacency")]
    InconsistentAdjacency {
        /// The rib.
        rib: RibKey,
        /// The triangle.
        triangle: TriangleKey,
    },
    /// A triangle lists the same rib more than once.
    #[error("Triangle {triangle:?} lists a rib more than once")]
    DuplicateRibs {
        /// The offending triangle.
        triangle: TriangleKey,
    },
    /// A rib is not referenced by any triangle.
    #[error("Rib {rib:?} has no adjacent triangle")]
    DanglingRib {
        /// The orphaned rib.
        rib: RibKey,
    },
    /// A triangle's stored vertices do not match its ribs.
    #[error("Triangle {triangle:?} has stale vertices")]
    StaleVertices {
        /// The offending triangle.
        triangle: TriangleKey,
    },
    /// The two triangles sharing a rib violate the Delaunay condition.
    #[error("Rib {rib:?} between {triangles:?} violates the Delaunay condition")]
    NonDelaunayRib {
        /// The shared rib.
        rib: RibKey,
        /// The triangles on either side.
        triangles: [TriangleKey; 2],
    },
    /// A mesh vertex lies strictly inside a triangle's circumcircle.
    #[error("Point {point} lies inside the circumcircle of triangle {triangle:?}")]
    PointInCircumcircle {
        /// The offending triangle.
        triangle: TriangleKey,
        /// The vertex inside its circumcircle.
        point: Point,
    },
    /// A triangle's vertices are collinear.
    #[error("Triangle {triangle:?} is degenerate")]
    DegenerateTriangle {
        /// The offending triangle.
        triangle: TriangleKey,
    },
    /// The far vertices of the two triangles sharing a rib are not strictly
    /// on opposite sides of it: the mesh folds over itself there.
    #[error("Rib {rib:?} between {triangles:?} folds the mesh")]
    FoldedRib {
        /// The shared rib.
        rib: RibKey,
        /// The triangles on either side.
        triangles: [TriangleKey; 2],
    },
    /// A lookup failed while validating.
    #[error("Topology error during validation: {0}")]
    Topology(#[from] TdsError),
}

/// Errors that can occur while constructing a triangulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TriangulationConstructionError {
    /// The bounding rectangle has zero width or height, or a non-finite
    /// corner.
    #[error("Degenerate bounding rectangle: top_left={top_left}, bottom_right={bottom_right}")]
    DegenerateBounds {
        /// First corner as given.
        top_left: Point,
        /// Second corner as given.
        bottom_right: Point,
    },
    /// An initial point could not be inserted.
    #[error("Failed to add point #{index}: {source}")]
    FailedToAddPoint {
        /// Position of the point in the input.
        index: usize,
        /// The insertion failure.
        #[source]
        source: InsertionError,
    },
    /// The superstructure could not be made Delaunay.
    #[error("Superstructure repair failed: {0}")]
    Repair(#[from] DelaunayRepairError),
    /// Building the superstructure failed.
    #[error("Superstructure topology error: {0}")]
    Topology(#[from] TdsError),
}

// =============================================================================
// TDS
// =============================================================================

/// The rib and triangle arenas of a planar triangulation.
///
/// `Tds` only knows about topology. Geometry-driven operations (location,
/// splitting, flipping) live in [`crate::core::algorithms`] and drive the
/// edit primitives exposed here. New triangles are only ever allocated by
/// those operations, so a `Tds` seen from outside the crate never holds a
/// half-built triangle.
///
/// # Examples
///
/// Inspecting the arenas behind a triangulation:
///
/// ```rust
/// use planar_delaunay::core::delaunay_triangulation::DelaunayTriangulation;
/// use planar_delaunay::geometry::point::Point;
///
/// let dt = DelaunayTriangulation::new(Point::new(0.0, 1.0), Point::new(1.0, 0.0)).unwrap();
/// let tds = dt.tds();
/// assert_eq!(tds.number_of_triangles(), 2);
/// assert_eq!(tds.number_of_ribs(), 5);
///
/// let t = tds.triangle_keys().next().unwrap();
/// assert!(tds.is_adjacent(t, None).unwrap());
/// assert!(tds.is_valid().is_ok());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tds {
    ribs: StorageMap<RibKey, Rib>,
    triangles: StorageMap<TriangleKey, Triangle>,
}

impl Tds {
    /// Creates empty arenas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Counts and iteration
    // -------------------------------------------------------------------------

    /// Number of triangles.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of ribs.
    #[must_use]
    pub fn number_of_ribs(&self) -> usize {
        self.ribs.len()
    }

    /// Iterates over `(key, triangle)` pairs.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> {
        self.triangles.iter()
    }

    /// Iterates over `(key, rib)` pairs.
    pub fn ribs(&self) -> impl Iterator<Item = (RibKey, &Rib)> {
        self.ribs.iter()
    }

    /// Iterates over triangle keys.
    pub fn triangle_keys(&self) -> impl Iterator<Item = TriangleKey> + '_ {
        self.triangles.keys()
    }

    /// Returns `true` if `key` resolves to a triangle.
    #[must_use]
    pub fn contains_triangle(&self, key: TriangleKey) -> bool {
        self.triangles.contains_key(key)
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    /// The rib for `key`, if any.
    #[must_use]
    pub fn get_rib(&self, key: RibKey) -> Option<&Rib> {
        self.ribs.get(key)
    }

    /// The triangle for `key`, if any.
    #[must_use]
    pub fn get_triangle(&self, key: TriangleKey) -> Option<&Triangle> {
        self.triangles.get(key)
    }

    /// The rib for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::MissingRib`] if the key does not resolve.
    pub fn rib(&self, key: RibKey) -> Result<&Rib, TdsError> {
        self.ribs.get(key).ok_or(TdsError::MissingRib { rib: key })
    }

    /// The triangle for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::MissingTriangle`] if the key does not resolve.
    pub fn triangle(&self, key: TriangleKey) -> Result<&Triangle, TdsError> {
        self.triangles
            .get(key)
            .ok_or(TdsError::MissingTriangle { triangle: key })
    }

    pub(crate) fn rib_mut(&mut self, key: RibKey) -> Result<&mut Rib, TdsError> {
        self.ribs.get_mut(key).ok_or(TdsError::MissingRib { rib: key })
    }

    fn triangle_mut(&mut self, key: TriangleKey) -> Result<&mut Triangle, TdsError> {
        self.triangles
            .get_mut(key)
            .ok_or(TdsError::MissingTriangle { triangle: key })
    }

    // -------------------------------------------------------------------------
    // Adjacency queries
    // -------------------------------------------------------------------------

    /// The triangle across `rib` from `triangle` (`None` for the outside).
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::TriangleNotOnRib`] if `triangle` is in neither of
    /// the rib's slots, or [`TdsError::MissingRib`].
    pub fn adjacent_across(
        &self,
        rib: RibKey,
        triangle: TriangleKey,
    ) -> Result<Option<TriangleKey>, TdsError> {
        self.rib(rib)?.adjacent_across(rib, triangle)
    }

    /// Index (within `triangle`) of the rib whose slots reference `other`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::NotAdjacent`] if no rib of `triangle` touches
    /// `other`.
    pub fn rib_shared_with(
        &self,
        triangle: TriangleKey,
        other: TriangleKey,
    ) -> Result<usize, TdsError> {
        let t = self.triangle(triangle)?;
        for (index, &rib) in t.ribs().iter().enumerate() {
            if self.rib(rib)?.touches(Some(other)) {
                return Ok(index);
            }
        }
        Err(TdsError::NotAdjacent {
            triangle,
            other: Some(other),
        })
    }

    /// Returns `true` if any rib of `triangle` has `other` in a slot.
    ///
    /// `None` asks whether the triangle touches the outside.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if a key does not resolve.
    pub fn is_adjacent(
        &self,
        triangle: TriangleKey,
        other: Option<TriangleKey>,
    ) -> Result<bool, TdsError> {
        for &rib in self.triangle(triangle)?.ribs() {
            if self.rib(rib)?.touches(other) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The rib of `triangle` joining `p` and `q`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::VertexNotFound`] if `p` or `q` is not a vertex of
    /// the triangle.
    pub fn rib_between(
        &self,
        triangle: TriangleKey,
        p: &Point,
        q: &Point,
    ) -> Result<RibKey, TdsError> {
        let t = self.triangle(triangle)?;
        for &rib in t.ribs() {
            if self.rib(rib)?.connects(p, q) {
                return Ok(rib);
            }
        }
        let missing = if t.vertex_index(p).is_none() { *p } else { *q };
        Err(TdsError::VertexNotFound {
            triangle,
            vertex: missing,
        })
    }

    /// The rib of `triangle` opposite `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::VertexNotFound`] if `vertex` is not a vertex of the
    /// triangle.
    pub fn opposite_rib(&self, triangle: TriangleKey, vertex: &Point) -> Result<RibKey, TdsError> {
        let t = self.triangle(triangle)?;
        let index = t.vertex_index(vertex).ok_or(TdsError::VertexNotFound {
            triangle,
            vertex: *vertex,
        })?;
        Ok(t.ribs()[Triangle::opposite_rib_index(index)])
    }

    /// The vertex of `triangle` opposite `rib`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::RibNotFound`] if `rib` is not a rib of the
    /// triangle.
    pub fn opposite_vertex(&self, triangle: TriangleKey, rib: RibKey) -> Result<Point, TdsError> {
        let t = self.triangle(triangle)?;
        let index = t
            .rib_index(rib)
            .ok_or(TdsError::RibNotFound { triangle, rib })?;
        Ok(t.opposite_vertex(index))
    }

    // -------------------------------------------------------------------------
    // Edit primitives
    // -------------------------------------------------------------------------

    /// Allocates a triangle key whose ribs are set later with
    /// [`set_triangle_ribs`](Self::set_triangle_ribs).
    ///
    /// The placeholder already counts in
    /// [`number_of_triangles`](Self::number_of_triangles) and fails
    /// [`is_valid`](Self::is_valid) until its ribs are set, so every caller
    /// must fill it before handing the `Tds` back.
    pub(crate) fn reserve_triangle(&mut self) -> TriangleKey {
        self.triangles.insert(Triangle::placeholder())
    }

    /// Adds a rib and returns its key.
    pub fn insert_rib(&mut self, rib: Rib) -> RibKey {
        self.ribs.insert(rib)
    }

    /// Assigns three ribs to `triangle` and rebuilds its canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::DegenerateRibs`] if the ribs do not close a
    /// triangle, or a lookup error.
    pub fn set_triangle_ribs(
        &mut self,
        triangle: TriangleKey,
        ribs: [RibKey; 3],
    ) -> Result<(), TdsError> {
        let normalized = self.canonicalize(ribs)?;
        *self.triangle_mut(triangle)? = normalized;
        Ok(())
    }

    /// Rebuilds the canonical order of `triangle` from its current ribs.
    ///
    /// # Errors
    ///
    /// Same as [`set_triangle_ribs`](Self::set_triangle_ribs).
    pub fn normalize_triangle(&mut self, triangle: TriangleKey) -> Result<(), TdsError> {
        let ribs = *self.triangle(triangle)?.ribs();
        self.set_triangle_ribs(triangle, ribs)
    }

    /// Swaps `old` for `new` among the ribs of `triangle` without
    /// renormalizing.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::RibNotFound`] if `old` is not a rib of the
    /// triangle.
    pub fn replace_rib_in_triangle(
        &mut self,
        triangle: TriangleKey,
        old: RibKey,
        new: RibKey,
    ) -> Result<(), TdsError> {
        self.triangle_mut(triangle)?
            .replace_rib_key(triangle, old, new)
    }

    /// Overwrites the rib at `index` of `triangle` without renormalizing.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::MissingTriangle`] if the key does not resolve.
    pub(crate) fn replace_rib_at(
        &mut self,
        triangle: TriangleKey,
        index: usize,
        rib: RibKey,
    ) -> Result<(), TdsError> {
        self.triangle_mut(triangle)?.replace_rib(index, rib);
        Ok(())
    }

    /// Repoints the slot of `rib` holding `old` to `new`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::TriangleNotOnRib`] if neither slot holds `old`.
    pub fn replace_adjacent(
        &mut self,
        rib: RibKey,
        old: Option<TriangleKey>,
        new: Option<TriangleKey>,
    ) -> Result<(), TdsError> {
        self.rib_mut(rib)?.replace_adjacent(rib, old, new)
    }

    fn canonicalize(&self, ribs: [RibKey; 3]) -> Result<Triangle, TdsError> {
        let endpoints = [
            (ribs[0], self.rib(ribs[0])?.points()),
            (ribs[1], self.rib(ribs[1])?.points()),
            (ribs[2], self.rib(ribs[2])?.points()),
        ];
        let (ordered, vertices) =
            canonical_order(endpoints).ok_or(TdsError::DegenerateRibs { ribs })?;
        Ok(Triangle::from_canonical(ordered, vertices))
    }

    /// Returns `true` if the stored vertices of `triangle` match the canonical
    /// order of its ribs.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the ribs do not resolve.
    pub fn is_canonical(&self, triangle: TriangleKey) -> Result<bool, TdsError> {
        let t = self.triangle(triangle)?;
        Ok(self
            .canonicalize(*t.ribs())
            .is_ok_and(|expected| expected == *t))
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
        validate_topology(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles `abc` and `acd` sharing `ac` inside the unit square.
    fn two_triangles() -> (Tds, TriangleKey, TriangleKey, RibKey) {
        let (a, b, c, d) = (
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        );
        let mut tds = Tds::new();
        let t1 = tds.reserve_triangle();
        let t2 = tds.reserve_triangle();
        let ab = tds.insert_rib(Rib::new(a, b, Some(t1), None));
        let bc = tds.insert_rib(Rib::new(b, c, Some(t1), None));
        let ac = tds.insert_rib(Rib::new(a, c, Some(t1), Some(t2)));
        let cd = tds.insert_rib(Rib::new(c, d, Some(t2), None));
        let da = tds.insert_rib(Rib::new(d, a, Some(t2), None));
        tds.set_triangle_ribs(t1, [ab, bc, ac]).unwrap();
        tds.set_triangle_ribs(t2, [cd, da, ac]).unwrap();
        (tds, t1, t2, ac)
    }

    #[test]
    fn test_adjacency_queries() {
        let (tds, t1, t2, ac) = two_triangles();
        assert_eq!(tds.number_of_triangles(), 2);
        assert_eq!(tds.number_of_ribs(), 5);
        assert_eq!(tds.adjacent_across(ac, t1), Ok(Some(t2)));
        assert_eq!(tds.adjacent_across(ac, t2), Ok(Some(t1)));

        let index = tds.rib_shared_with(t1, t2).unwrap();
        assert_eq!(tds.triangle(t1).unwrap().ribs()[index], ac);
        assert!(tds.is_adjacent(t1, Some(t2)).unwrap());
        assert!(tds.is_adjacent(t1, None).unwrap());
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn test_opposite_lookups() {
        let (tds, t1, _, ac) = two_triangles();
        assert_eq!(tds.opposite_vertex(t1, ac), Ok(Point::new(1.0, 0.0)));
        assert_eq!(tds.opposite_rib(t1, &Point::new(1.0, 0.0)), Ok(ac));
        assert_eq!(
            tds.rib_between(t1, &Point::new(1.0, 1.0), &Point::new(0.0, 0.0)),
            Ok(ac)
        );
        assert!(matches!(
            tds.opposite_rib(t1, &Point::new(0.0, 1.0)),
            Err(TdsError::VertexNotFound { .. })
        ));
        assert!(matches!(
            tds.rib_between(t1, &Point::new(0.0, 0.0), &Point::new(0.0, 1.0)),
            Err(TdsError::VertexNotFound { vertex, .. }) if vertex == Point::new(0.0, 1.0)
        ));
    }

    #[test]
    fn test_not_adjacent_is_an_error() {
        let (mut tds, t1, _, _) = two_triangles();
        let lonely = tds.reserve_triangle();
        assert_eq!(
            tds.rib_shared_with(t1, lonely),
            Err(TdsError::NotAdjacent {
                triangle: t1,
                other: Some(lonely)
            })
        );
    }

    #[test]
    fn test_set_triangle_ribs_rejects_open_chain() {
        let mut tds = Tds::new();
        let t = tds.reserve_triangle();
        let r0 = tds.insert_rib(Rib::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Some(t), None));
        let r1 = tds.insert_rib(Rib::new(Point::new(1.0, 0.0), Point::new(1.0, 1.0), Some(t), None));
        let r2 = tds.insert_rib(Rib::new(Point::new(2.0, 2.0), Point::new(0.0, 0.0), Some(t), None));
        assert_eq!(
            tds.set_triangle_ribs(t, [r0, r1, r2]),
            Err(TdsError::DegenerateRibs { ribs: [r0, r1, r2] })
        );
    }

    #[test]
    fn test_validation_detects_broken_back_reference() {
        let (mut tds, t1, t2, ac) = two_triangles();
        tds.replace_adjacent(ac, Some(t2), None).unwrap();
        assert!(matches!(
            tds.is_valid(),
            Err(TriangulationValidationError::InconsistentAdjacency { triangle, .. }) if triangle == t2
        ));
        tds.replace_adjacent(ac, None, Some(t2)).unwrap();
        assert!(tds.is_valid().is_ok());
        assert!(tds.is_canonical(t1).unwrap());
    }

    #[test]
    fn test_tds_serde_roundtrip() {
        let (tds, t1, _, _) = two_triangles();
        let json = serde_json::to_string(&tds).unwrap();
        let back: Tds = serde_json::from_str(&json).unwrap();
        assert_eq!(back.number_of_triangles(), 2);
        assert_eq!(back.triangle(t1).unwrap(), tds.triangle(t1).unwrap());
        assert!(back.is_valid().is_ok());
    }
}
