//! Point location by separating-rib walking.
//!
//! # Algorithm
//!
//! Starting from a hint triangle (usually supplied by the spatial cache),
//! the walk repeatedly:
//! 1. Looks for a rib of the current triangle that strictly separates the
//!    query point from the vertex opposite that rib
//! 2. Crosses that rib into the neighbouring triangle
//! 3. Stops when no rib separates, i.e. the point is inside or on the
//!    boundary of the current triangle
//!
//! In a Delaunay triangulation the walk cannot cycle, but floating-point
//! ties could in principle make it revisit a triangle. The walk is therefore
//! bounded by the number of triangles plus one.
//!
//! # References
//!
//! - O. Devillers, S. Pion, and M. Teillaud, "Walking in a Triangulation",
//!   International Journal of Foundations of Computer Science, 2001.

use crate::core::triangulation_data_structure::{RibKey, Tds, TdsError, TriangleKey};
use crate::geometry::point::Point;
use crate::geometry::predicates::{is_separated, lies_on_segment, orientation};

/// Where a point falls relative to a located triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Within epsilon of a vertex of the triangle.
    OnVertex {
        /// The located triangle.
        triangle: TriangleKey,
        /// Index of the matching vertex.
        vertex_index: usize,
    },
    /// On a rib of the triangle (within epsilon of the segment).
    OnRib {
        /// The located triangle.
        triangle: TriangleKey,
        /// The rib the point lies on.
        rib: RibKey,
    },
    /// Strictly inside the triangle.
    InsideTriangle(TriangleKey),
}

impl Location {
    /// The triangle the walk ended in.
    #[must_use]
    pub const fn triangle(&self) -> TriangleKey {
        match *self {
            Self::OnVertex { triangle, .. } | Self::OnRib { triangle, .. } => triangle,
            Self::InsideTriangle(triangle) => triangle,
        }
    }
}

/// Error during point location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LocateError {
    /// The triangulation has no triangles (or no usable hint).
    #[error("Cannot locate in empty triangulation")]
    EmptyTriangulation,

    /// The walk exceeded its step budget.
    #[error("Cycle detected after {steps} steps - possible numerical degeneracy")]
    CycleDetected {
        /// Number of steps taken.
        steps: usize,
    },

    /// The walk tried to cross a rib with no triangle on the far side.
    #[error("Walk left the triangulation through triangle {triangle:?}")]
    WalkedOutside {
        /// The last triangle inside the mesh.
        triangle: TriangleKey,
    },

    /// A lookup failed during the walk.
    #[error("Topology error during point location: {0}")]
    Topology(#[from] TdsError),
}

/// Finds a rib of `triangle` that strictly separates `point` from the
/// vertex opposite that rib.
///
/// Returns `None` when the point lies inside or on the boundary of the
/// triangle.
///
/// # Errors
///
/// Returns a [`TdsError`] if the triangle or one of its ribs does not
/// resolve.
pub fn separating_rib(
    tds: &Tds,
    triangle: TriangleKey,
    point: &Point,
) -> Result<Option<RibKey>, TdsError> {
    let t = tds.triangle(triangle)?;
    for (index, &rib_key) in t.ribs().iter().enumerate() {
        let rib = tds.rib(rib_key)?;
        if is_separated(&rib.a(), &rib.b(), point, &t.opposite_vertex(index)) {
            return Ok(Some(rib_key));
        }
    }
    Ok(None)
}

/// Walks from `start` to the triangle containing `point`.
///
/// # Errors
///
/// - [`LocateError::EmptyTriangulation`] if `start` does not resolve and the
///   mesh is empty.
/// - [`LocateError::CycleDetected`] if the walk exceeds
///   `number_of_triangles + 1` steps.
/// - [`LocateError::WalkedOutside`] if the point lies outside the mesh.
pub fn locate_triangle(
    tds: &Tds,
    point: &Point,
    start: Option<TriangleKey>,
) -> Result<TriangleKey, LocateError> {
    let mut current = match start {
        Some(key) if tds.contains_triangle(key) => key,
        _ => tds
            .triangle_keys()
            .next()
            .ok_or(LocateError::EmptyTriangulation)?,
    };

    let max_steps = tds.number_of_triangles() + 1;
    for step in 0..max_steps {
        let Some(rib) = separating_rib(tds, current, point)? else {
            tracing::trace!(?current, steps = step, "point located");
            return Ok(current);
        };
        match tds.adjacent_across(rib, current)? {
            Some(next) => current = next,
            None => return Err(LocateError::WalkedOutside { triangle: current }),
        }
    }

    Err(LocateError::CycleDetected { steps: max_steps })
}

/// Returns `true` if splitting `rib` at `point` keeps each adjacent
/// triangle's two halves oriented like the triangle itself.
///
/// # Errors
///
/// Returns a [`TdsError`] if a key does not resolve.
pub fn splits_cleanly(tds: &Tds, rib: RibKey, point: &Point) -> Result<bool, TdsError> {
    let r = tds.rib(rib)?;
    let (a, b) = (r.a(), r.b());
    for triangle in r.triangles().into_iter().flatten() {
        let far = tds.opposite_vertex(triangle, rib)?;
        let whole = orientation(&a, &b, &far);
        if orientation(&a, point, &far) != whole || orientation(point, &b, &far) != whole {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Classifies `point` against the vertices and ribs of `triangle`.
///
/// Vertices are checked first (component-wise `epsilon`), then ribs
/// (distance to the supporting line within `epsilon` *and* inside the
/// segment's epsilon-grown bounding box). Anything else is interior.
///
/// A rib only claims the point if splitting it there leaves every triangle
/// on both sides with its orientation (see [`splits_cleanly`]). Next to a
/// sliver thinner than `epsilon` that fails, and the point is reported as
/// inside `triangle`. The walk is exact, so such a point is strictly inside.
///
/// # Errors
///
/// Returns a [`TdsError`] if a key does not resolve.
pub fn classify(
    tds: &Tds,
    triangle: TriangleKey,
    point: &Point,
    epsilon: f64,
) -> Result<Location, TdsError> {
    let t = tds.triangle(triangle)?;
    if let Some(vertex_index) = t
        .vertices()
        .iter()
        .position(|v| v.is_in_epsilon_area(point, epsilon))
    {
        return Ok(Location::OnVertex {
            triangle,
            vertex_index,
        });
    }
    for &rib_key in t.ribs() {
        let rib = tds.rib(rib_key)?;
        if lies_on_segment(&rib.a(), &rib.b(), point, epsilon)
            && splits_cleanly(tds, rib_key, point)?
        {
            return Ok(Location::OnRib {
                triangle,
                rib: rib_key,
            });
        }
    }
    Ok(Location::InsideTriangle(triangle))
}

/// Locates and classifies `point` in one call.
///
/// # Errors
///
/// Same as [`locate_triangle`].
pub fn locate(
    tds: &Tds,
    point: &Point,
    start: Option<TriangleKey>,
    epsilon: f64,
) -> Result<Location, LocateError> {
    let triangle = locate_triangle(tds, point, start)?;
    Ok(classify(tds, triangle, point, epsilon)?)
}
