//! Structural edits performed by a single point insertion.
//!
//! Once a point has been located (see [`crate::core::algorithms::locate`])
//! one of three edits applies:
//!
//! 1. **Split triangle** - the point is strictly inside a triangle, which
//!    becomes three triangles meeting at the point.
//! 2. **Split boundary rib** - the point is on a rib of the outer rectangle.
//!    The single adjacent triangle becomes two, and the outer half of the rib
//!    keeps its empty slot.
//! 3. **Split interior rib** - the point is on a rib shared by two
//!    triangles. Each becomes two, four in total.
//!
//! Every edit reuses the key of each triangle it reshapes and allocates keys
//! only for the extra triangles, so nothing is removed from the arenas. The
//! edits return the keys of all triangles whose shape changed; these seed
//! both the spatial cache update and Delaunay repair.

use serde::{Deserialize, Serialize};

use crate::core::algorithms::flips::DelaunayRepairError;
use crate::core::algorithms::locate::{LocateError, Location};
use crate::core::collections::TriangleKeyBuffer;
use crate::core::rib::Rib;
use crate::core::triangulation_data_structure::{RibKey, Tds, TdsError, TriangleKey};
use crate::geometry::point::Point;
use crate::geometry::util::Bounds;

/// Error during incremental insertion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum InsertionError {
    /// The point lies outside the bounding rectangle by more than epsilon.
    #[error("Point {point} lies outside the triangulated area {bounds}")]
    OutOfBounds {
        /// The rejected point.
        point: Point,
        /// The bounding rectangle.
        bounds: Bounds,
    },

    /// The point has a NaN or infinite coordinate.
    #[error("Point {point} has a non-finite coordinate")]
    NonFinitePoint {
        /// The rejected point.
        point: Point,
    },

    /// Point location failed
    #[error("Location error: {0}")]
    Location(#[from] LocateError),

    /// A structural edit failed
    #[error("Topology error during insertion: {0}")]
    Topology(#[from] TdsError),

    /// Delaunay repair failed after the edit
    #[error("Repair error: {0}")]
    Repair(#[from] DelaunayRepairError),
}

/// Which edit an insertion performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsertionOutcome {
    /// The point coincided (within epsilon) with an existing vertex.
    Ignored,
    /// One triangle became three.
    SplitTriangle,
    /// A rib on the outer rectangle was split; one triangle became two.
    SplitBoundaryRib,
    /// An interior rib was split; two triangles became four.
    SplitInteriorRib,
}

impl InsertionOutcome {
    /// Number of triangles the edit leaves reshaped or created.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::core::algorithms::incremental_insertion::InsertionOutcome;
    ///
    /// assert_eq!(InsertionOutcome::Ignored.produced_triangles(), 0);
    /// assert_eq!(InsertionOutcome::SplitTriangle.produced_triangles(), 3);
    /// assert_eq!(InsertionOutcome::SplitBoundaryRib.produced_triangles(), 2);
    /// assert_eq!(InsertionOutcome::SplitInteriorRib.produced_triangles(), 4);
    /// ```
    #[must_use]
    pub const fn produced_triangles(self) -> usize {
        match self {
            Self::Ignored => 0,
            Self::SplitTriangle => 3,
            Self::SplitBoundaryRib => 2,
            Self::SplitInteriorRib => 4,
        }
    }

    /// Net change in the triangle count.
    #[must_use]
    pub const fn added_triangles(self) -> usize {
        match self {
            Self::Ignored => 0,
            Self::SplitBoundaryRib => 1,
            Self::SplitTriangle | Self::SplitInteriorRib => 2,
        }
    }

    /// Returns `true` unless the point was ignored.
    #[must_use]
    pub const fn is_inserted(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Splits `triangle = A B C` at the interior point `o`.
///
/// `triangle` becomes `O A C` and two new triangles `O A B` and `O B C` are
/// added. Returns `[triangle, OAB, OBC]`.
///
/// # Errors
///
/// Returns a [`TdsError`] if the triangle or its ribs are inconsistent.
pub fn split_triangle(
    tds: &mut Tds,
    triangle: TriangleKey,
    o: Point,
) -> Result<TriangleKeyBuffer, TdsError> {
    let t = *tds.triangle(triangle)?;
    let [a, b, c] = *t.vertices();
    let [ab, bc, ac] = *t.ribs();

    let left = tds.reserve_triangle();
    let right = tds.reserve_triangle();
    let oa = tds.insert_rib(Rib::new(o, a, Some(left), Some(triangle)));
    let ob = tds.insert_rib(Rib::new(o, b, Some(left), Some(right)));
    let oc = tds.insert_rib(Rib::new(o, c, Some(right), Some(triangle)));

    tds.replace_adjacent(ab, Some(triangle), Some(left))?;
    tds.replace_adjacent(bc, Some(triangle), Some(right))?;

    tds.set_triangle_ribs(triangle, [oa, oc, ac])?;
    tds.set_triangle_ribs(left, [ab, ob, oa])?;
    tds.set_triangle_ribs(right, [bc, ob, oc])?;

    tracing::trace!(?triangle, ?left, ?right, %o, "split triangle");
    Ok(TriangleKeyBuffer::from_slice(&[triangle, left, right]))
}

/// Splits the boundary rib `A B` at `o`.
///
/// The adjacent triangle `A B C` becomes `A O C`, a new triangle `O B C` is
/// added, and the rib itself is shortened to `A O`. The new rib `O B` gets
/// the empty outer slot. Returns `[triangle, OBC]`.
///
/// # Errors
///
/// Returns [`TdsError::TriangleNotOnRib`] if the rib does not have exactly
/// one empty slot, or another [`TdsError`] if the mesh is inconsistent.
pub fn split_boundary_rib(
    tds: &mut Tds,
    rib: RibKey,
    o: Point,
) -> Result<TriangleKeyBuffer, TdsError> {
    let r = *tds.rib(rib)?;
    let triangle = match r.triangles() {
        [Some(t), None] | [None, Some(t)] => t,
        _ => {
            return Err(TdsError::TriangleNotOnRib {
                rib,
                triangle: None,
            });
        }
    };
    let (a, b) = (r.a(), r.b());
    let c = tds.opposite_vertex(triangle, rib)?;
    let bc = tds.opposite_rib(triangle, &a)?;

    let added = tds.reserve_triangle();
    let oc = tds.insert_rib(Rib::new(o, c, Some(triangle), Some(added)));
    let ob = tds.insert_rib(Rib::new(o, b, Some(added), None));

    tds.replace_adjacent(bc, Some(triangle), Some(added))?;
    tds.set_triangle_ribs(added, [oc, ob, bc])?;

    tds.replace_rib_in_triangle(triangle, bc, oc)?;
    tds.rib_mut(rib)?.set_b(o);
    tds.normalize_triangle(triangle)?;

    tracing::trace!(?rib, ?triangle, ?added, %o, "split boundary rib");
    Ok(TriangleKeyBuffer::from_slice(&[triangle, added]))
}

/// Splits the interior rib `A B` shared by `A B C` (slot `t1`) and `A B D`
/// (slot `t2`) at `o`.
///
/// The two triangles become `A O C` and `A O D`, new triangles `O B C` and
/// `O B D` are added, and the rib is shortened to `A O`. Returns
/// `[t1, t2, OBC, OBD]`.
///
/// # Errors
///
/// Returns [`TdsError::TriangleNotOnRib`] if either slot is empty, or another
/// [`TdsError`] if the mesh is inconsistent.
pub fn split_interior_rib(
    tds: &mut Tds,
    rib: RibKey,
    o: Point,
) -> Result<TriangleKeyBuffer, TdsError> {
    let r = *tds.rib(rib)?;
    let (Some(left), Some(right)) = (r.t1(), r.t2()) else {
        return Err(TdsError::TriangleNotOnRib {
            rib,
            triangle: None,
        });
    };
    let (a, b) = (r.a(), r.b());
    let c = tds.opposite_vertex(left, rib)?;
    let d = tds.opposite_vertex(right, rib)?;
    let bc = tds.opposite_rib(left, &a)?;
    let bd = tds.opposite_rib(right, &a)?;

    let new_left = tds.reserve_triangle();
    let new_right = tds.reserve_triangle();
    let oc = tds.insert_rib(Rib::new(o, c, Some(left), Some(new_left)));
    let od = tds.insert_rib(Rib::new(o, d, Some(right), Some(new_right)));
    let ob = tds.insert_rib(Rib::new(o, b, Some(new_left), Some(new_right)));

    tds.replace_adjacent(bc, Some(left), Some(new_left))?;
    tds.replace_adjacent(bd, Some(right), Some(new_right))?;
    tds.set_triangle_ribs(new_left, [oc, ob, bc])?;
    tds.set_triangle_ribs(new_right, [od, ob, bd])?;

    tds.replace_rib_in_triangle(left, bc, oc)?;
    tds.replace_rib_in_triangle(right, bd, od)?;
    tds.rib_mut(rib)?.set_b(o);
    tds.normalize_triangle(left)?;
    tds.normalize_triangle(right)?;

    tracing::trace!(?rib, ?left, ?right, ?new_left, ?new_right, %o, "split interior rib");
    Ok(TriangleKeyBuffer::from_slice(&[
        left, right, new_left, new_right,
    ]))
}

/// Applies the edit matching `location` for `point`.
///
/// Returns the outcome together with the triangles the edit produced
/// (empty for [`InsertionOutcome::Ignored`]).
///
/// # Errors
///
/// Propagates [`TdsError`] from the split functions.
pub fn insert_at(
    tds: &mut Tds,
    location: Location,
    point: Point,
) -> Result<(InsertionOutcome, TriangleKeyBuffer), TdsError> {
    match location {
        Location::OnVertex { .. } => Ok((InsertionOutcome::Ignored, TriangleKeyBuffer::new())),
        Location::OnRib { rib, .. } if tds.rib(rib)?.is_boundary() => Ok((
            InsertionOutcome::SplitBoundaryRib,
            split_boundary_rib(tds, rib, point)?,
        )),
        Location::OnRib { rib, .. } => Ok((
            InsertionOutcome::SplitInteriorRib,
            split_interior_rib(tds, rib, point)?,
        )),
        Location::InsideTriangle(triangle) => Ok((
            InsertionOutcome::SplitTriangle,
            split_triangle(tds, triangle, point)?,
        )),
    }
}
