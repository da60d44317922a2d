//! Rib flips and Delaunay repair.
//!
//! A flip replaces the diagonal `A B` of the convex quadrilateral formed by
//! two adjacent triangles `A B C` and `A B D` with the other diagonal `C D`:
//!
//! ```text
//!        C                 C
//!       / \               /|\
//!      / t1\             / | \
//!     A-----B    ==>    A t1|t2 B
//!      \ t2/             \ | /
//!       \ /               \|/
//!        D                 D
//! ```
//!
//! Repair keeps a work-list of triangles. Each step tests one triangle
//! against its neighbors; a violating pair is flipped and the neighbor joins
//! the list while the triangle stays on it. A triangle leaves the list only
//! once none of its ribs needs a flip. Violations are decided with exact
//! orientation and in-circle signs, and only on strictly convex
//! quadrilaterals, so every flip strictly improves the triangulation and the
//! loop terminates. The flip budget is a backstop.
//!
//! # References
//!
//! - C. L. Lawson, "Software for C1 Surface Interpolation", 1977.
//! - L. Guibas and J. Stolfi, "Primitives for the Manipulation of General
//!   Subdivisions and the Computation of Voronoi Diagrams", ACM TOG, 1985.

use std::fmt;

use thiserror::Error;

use crate::core::collections::TriangleKeySet;
use crate::core::triangulation_data_structure::{RibKey, Tds, TdsError, TriangleKey};
use crate::geometry::predicates::{
    is_clockwise_ordered, is_delaunay_violation, is_strictly_convex_quad,
};

/// Minimum flip budget regardless of mesh size.
pub const MIN_FLIP_BUDGET: usize = 128;

/// Statistics from a repair run.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::algorithms::flips::DelaunayRepairStats;
///
/// let stats = DelaunayRepairStats::default();
/// assert_eq!(stats.flips_performed, 0);
/// assert_eq!(format!("{stats}"), "checked=0, flips=0, max_queue=0");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelaunayRepairStats {
    /// Number of work-list entries checked.
    pub triangles_checked: usize,
    /// Number of flips performed.
    pub flips_performed: usize,
    /// Maximum work-list length observed.
    pub max_queue_len: usize,
}

impl fmt::Display for DelaunayRepairStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checked={}, flips={}, max_queue={}",
            self.triangles_checked, self.flips_performed, self.max_queue_len
        )
    }
}

/// Errors that can occur during Delaunay repair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DelaunayRepairError {
    /// Repair did not converge within the flip budget.
    #[error("Delaunay repair failed to converge after {max_flips} flips ({stats})")]
    NonConvergent {
        /// Maximum flips allowed.
        max_flips: usize,
        /// Statistics at the point of failure.
        stats: DelaunayRepairStats,
    },
    /// A lookup or edit failed mid-repair.
    #[error(transparent)]
    Topology(#[from] TdsError),
}

/// Default flip budget: four passes of three ribs over every triangle, never
/// less than [`MIN_FLIP_BUDGET`].
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::algorithms::flips::default_max_flips;
///
/// assert_eq!(default_max_flips(2), 128);
/// assert_eq!(default_max_flips(100), 1200);
/// ```
#[must_use]
pub const fn default_max_flips(triangle_count: usize) -> usize {
    let scaled = triangle_count.saturating_mul(12);
    if scaled > MIN_FLIP_BUDGET {
        scaled
    } else {
        MIN_FLIP_BUDGET
    }
}

fn repair_trace_enabled() -> bool {
    std::env::var_os("PLANAR_DELAUNAY_REPAIR_TRACE").is_some()
}

/// Finds a neighbor of `triangle` that must be flipped with it.
///
/// For each rib with a triangle on the far side, the rib endpoints are
/// ordered so `p1 p2 p3` is clockwise (`p2` being the vertex of `triangle`
/// opposite the rib) and the far vertex is tested with
/// [`is_delaunay_violation`]. The first violating neighbor is returned.
///
/// # Errors
///
/// Returns a [`TdsError`] if a key does not resolve or adjacency is
/// inconsistent.
pub fn flip_required(tds: &Tds, triangle: TriangleKey) -> Result<Option<TriangleKey>, TdsError> {
    let t = tds.triangle(triangle)?;
    for (index, &rib_key) in t.ribs().iter().enumerate() {
        let rib = tds.rib(rib_key)?;
        let Some(neighbor) = rib.adjacent_across(rib_key, triangle)? else {
            continue;
        };
        let node = tds.opposite_vertex(neighbor, rib_key)?;
        let p2 = t.opposite_vertex(index);
        let (mut p1, mut p3) = (rib.a(), rib.b());
        if !is_clockwise_ordered(&p1, &p2, &p3) {
            std::mem::swap(&mut p1, &mut p3);
        }
        if is_delaunay_violation(&p1, &p2, &p3, &node) {
            return Ok(Some(neighbor));
        }
    }
    Ok(None)
}

/// Flips the rib shared by `t1` and `t2`.
///
/// With `t1 = A B C` and `t2 = A B D`, afterwards `t1 = A C D` and
/// `t2 = B C D`: rib `B C` moves from `t1` to `t2`, rib `A D` moves from
/// `t2` to `t1`, and the old `A B` rib is recycled in place as `C D`.
/// Both triangle keys and the rib key survive. Returns the key of the
/// recycled rib.
///
/// `A C B D` must be strictly convex: `C` and `D` strictly on opposite sides
/// of `A B`, and `A` and `B` strictly on opposite sides of `C D`. Anything
/// else would produce an inverted triangle, so the mesh is left untouched.
///
/// # Errors
///
/// Returns [`TdsError::NotAdjacent`] if the triangles share no rib,
/// [`TdsError::NonConvexQuad`] if the quadrilateral is not strictly convex,
/// or another [`TdsError`] if the mesh is inconsistent.
pub fn flip(tds: &mut Tds, t1: TriangleKey, t2: TriangleKey) -> Result<RibKey, TdsError> {
    let index = tds.rib_shared_with(t1, t2)?;
    let first = *tds.triangle(t1)?;
    let ab = first.ribs()[index];
    let (a, b) = {
        let rib = tds.rib(ab)?;
        (rib.a(), rib.b())
    };
    let c = first.opposite_vertex(index);
    let d = tds.opposite_vertex(t2, ab)?;
    if !is_strictly_convex_quad(&a, &c, &b, &d) {
        return Err(TdsError::NonConvexQuad {
            first: t1,
            second: t2,
        });
    }
    let bc = tds.opposite_rib(t1, &a)?;
    let ad = tds.opposite_rib(t2, &b)?;

    tds.replace_adjacent(bc, Some(t1), Some(t2))?;
    tds.replace_adjacent(ad, Some(t2), Some(t1))?;
    tds.rib_mut(ab)?.reset(c, d, Some(t1), Some(t2));

    tds.replace_rib_in_triangle(t1, bc, ad)?;
    tds.replace_rib_in_triangle(t2, ad, bc)?;
    tds.normalize_triangle(t1)?;
    tds.normalize_triangle(t2)?;

    if repair_trace_enabled() {
        tracing::debug!(?t1, ?t2, rib = ?ab, %c, %d, "[repair] flipped rib");
    }
    Ok(ab)
}

/// Tests `triangle` once and flips it with the first violating neighbor.
///
/// If no flip is needed the triangle is removed from `work_list`. Otherwise
/// the pair is flipped and both triangles are (re)inserted. Returns whether a
/// flip happened.
///
/// # Errors
///
/// Propagates [`TdsError`] from [`flip_required`] and [`flip`].
pub fn check_and_flip(
    tds: &mut Tds,
    triangle: TriangleKey,
    work_list: &mut TriangleKeySet,
) -> Result<bool, TdsError> {
    match flip_required(tds, triangle)? {
        None => {
            work_list.remove(&triangle);
            Ok(false)
        }
        Some(neighbor) => {
            flip(tds, triangle, neighbor)?;
            work_list.insert(triangle);
            work_list.insert(neighbor);
            Ok(true)
        }
    }
}

/// Drains a work-list seeded with `seeds` until every triangle on it passes
/// the Delaunay test.
///
/// `max_flips` defaults to [`default_max_flips`] of the current triangle
/// count.
///
/// # Errors
///
/// - [`DelaunayRepairError::NonConvergent`] if another flip is needed once
///   the budget is spent. The mesh is structurally valid in that case, just
///   not fully Delaunay.
/// - [`DelaunayRepairError::Topology`] if the mesh is inconsistent.
pub fn repair_delaunay<I>(
    tds: &mut Tds,
    seeds: I,
    max_flips: Option<usize>,
) -> Result<DelaunayRepairStats, DelaunayRepairError>
where
    I: IntoIterator<Item = TriangleKey>,
{
    let budget = max_flips.unwrap_or_else(|| default_max_flips(tds.number_of_triangles()));
    let mut work_list: TriangleKeySet = seeds.into_iter().collect();
    let mut stats = DelaunayRepairStats {
        max_queue_len: work_list.len(),
        ..DelaunayRepairStats::default()
    };

    while let Some(&triangle) = work_list.iter().next() {
        if stats.flips_performed >= budget && flip_required(tds, triangle)?.is_some() {
            tracing::warn!(max_flips = budget, %stats, "Delaunay repair exhausted its flip budget");
            return Err(DelaunayRepairError::NonConvergent {
                max_flips: budget,
                stats,
            });
        }
        stats.triangles_checked += 1;
        if check_and_flip(tds, triangle, &mut work_list)? {
            stats.flips_performed += 1;
            stats.max_queue_len = stats.max_queue_len.max(work_list.len());
        }
    }

    if stats.flips_performed > 0 {
        tracing::debug!(%stats, "Delaunay repair converged");
    }
    Ok(stats)
}
