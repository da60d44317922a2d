//! Structural and Delaunay validation over the rib/triangle arenas.

#![forbid(unsafe_code)]

use crate::core::collections::FastHashSet;
use crate::core::triangulation_data_structure::{
    RibKey, Tds, TdsError, TriangleKey, TriangulationValidationError,
};
use crate::geometry::point::Point;
use crate::geometry::predicates::{Orientation, is_delaunay_violation, is_separated, orientation};
use crate::geometry::util::{CircumcircleError, strictly_inside_circumcircle};

// =============================================================================
// STRUCTURAL VALIDATION
// =============================================================================

/// Checks mutual rib/triangle adjacency, canonical vertex order and that
/// the triangles tile the plane without folding.
///
/// - every rib has at least one adjacent triangle and never the same one
///   twice;
/// - every `Some(t)` slot references a triangle that lists the rib;
/// - every triangle lists three distinct ribs, each of which references it
///   back, and its stored vertices match its ribs;
/// - no triangle is degenerate;
/// - the far vertices of the two triangles on an interior rib lie strictly
///   on opposite sides of it.
///
/// The last two checks use exact orientation. Together they force every
/// triangle to share the orientation of its neighbors, so a connected mesh
/// that passes them has no inverted or overlapping triangles.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_topology(tds: &Tds) -> Result<(), TriangulationValidationError> {
    for (rib_key, rib) in tds.ribs() {
        match rib.triangles() {
            [None, None] => return Err(TriangulationValidationError::DanglingRib { rib: rib_key }),
            [Some(t1), Some(t2)] if t1 == t2 => {
                return Err(TriangulationValidationError::InconsistentAdjacency {
                    rib: rib_key,
                    triangle: t1,
                });
            }
            slots => {
                for triangle in slots.into_iter().flatten() {
                    if !tds.triangle(triangle)?.has_rib(rib_key) {
                        return Err(TriangulationValidationError::InconsistentAdjacency {
                            rib: rib_key,
                            triangle,
                        });
                    }
                }
            }
        }
    }

    for (triangle_key, triangle) in tds.triangles() {
        let [r0, r1, r2] = *triangle.ribs();
        if r0 == r1 || r1 == r2 || r0 == r2 {
            return Err(TriangulationValidationError::DuplicateRibs {
                triangle: triangle_key,
            });
        }
        for rib in [r0, r1, r2] {
            if !tds.rib(rib)?.touches(Some(triangle_key)) {
                return Err(TriangulationValidationError::InconsistentAdjacency {
                    rib,
                    triangle: triangle_key,
                });
            }
        }
        if !tds.is_canonical(triangle_key)? {
            return Err(TriangulationValidationError::StaleVertices {
                triangle: triangle_key,
            });
        }
    }

    validate_embedding(tds)
}

/// Geometric half of [`validate_topology`]; assumes adjacency is consistent.
fn validate_embedding(tds: &Tds) -> Result<(), TriangulationValidationError> {
    for (triangle_key, triangle) in tds.triangles() {
        let [a, b, c] = triangle.vertices();
        if orientation(a, b, c) == Orientation::COLLINEAR {
            return Err(TriangulationValidationError::DegenerateTriangle {
                triangle: triangle_key,
            });
        }
    }

    for (rib_key, rib) in tds.ribs() {
        let (Some(t1), Some(t2)) = (rib.t1(), rib.t2()) else {
            continue;
        };
        let p = tds.opposite_vertex(t1, rib_key)?;
        let q = tds.opposite_vertex(t2, rib_key)?;
        if !is_separated(&rib.a(), &rib.b(), &p, &q) {
            return Err(TriangulationValidationError::FoldedRib {
                rib: rib_key,
                triangles: [t1, t2],
            });
        }
    }

    Ok(())
}

// =============================================================================
// DELAUNAY PROPERTY VALIDATION
// =============================================================================

/// Returns `Ok(Some([t1, t2]))` when the triangles on either side of `rib`
/// violate the Delaunay condition.
fn rib_violation(tds: &Tds, rib_key: RibKey) -> Result<Option<[TriangleKey; 2]>, TdsError> {
    let rib = tds.rib(rib_key)?;
    let (Some(t1), Some(t2)) = (rib.t1(), rib.t2()) else {
        return Ok(None);
    };
    let p2 = tds.opposite_vertex(t1, rib_key)?;
    let node = tds.opposite_vertex(t2, rib_key)?;
    if is_delaunay_violation(&rib.a(), &p2, &rib.b(), &node) {
        Ok(Some([t1, t2]))
    } else {
        Ok(None)
    }
}

/// Collects every interior rib whose two triangles violate the Delaunay
/// condition.
///
/// # Errors
///
/// Returns a [`TdsError`] if the mesh is structurally broken.
pub fn find_delaunay_violations(tds: &Tds) -> Result<Vec<RibKey>, TdsError> {
    let mut violations = Vec::new();
    for (rib_key, _) in tds.ribs() {
        if rib_violation(tds, rib_key)?.is_some() {
            violations.push(rib_key);
        }
    }
    Ok(violations)
}

/// Checks the local Delaunay condition on every interior rib.
///
/// For a valid planar subdivision the local condition on all ribs is
/// equivalent to the empty-circumcircle property. Cocircular quadrilaterals
/// pass with either diagonal.
///
/// # Errors
///
/// Returns [`TriangulationValidationError::NonDelaunayRib`] for the first
/// violating rib.
pub fn validate_delaunay(tds: &Tds) -> Result<(), TriangulationValidationError> {
    for (rib_key, _) in tds.ribs() {
        if let Some(triangles) = rib_violation(tds, rib_key)? {
            return Err(TriangulationValidationError::NonDelaunayRib {
                rib: rib_key,
                triangles,
            });
        }
    }
    Ok(())
}

/// Brute-force empty-circumcircle check: no vertex of the mesh lies strictly
/// inside the circumcircle of any triangle by more than `tolerance`.
///
/// Quadratic; intended for tests and debugging.
///
/// # Errors
///
/// Returns [`TriangulationValidationError::PointInCircumcircle`] for the
/// first offending pair, or
/// [`TriangulationValidationError::DegenerateTriangle`] for a collinear
/// triangle.
pub fn validate_empty_circumcircles(
    tds: &Tds,
    tolerance: f64,
) -> Result<(), TriangulationValidationError> {
    let vertices: FastHashSet<Point> = tds
        .ribs()
        .flat_map(|(_, rib)| rib.points())
        .collect();

    for (triangle_key, triangle) in tds.triangles() {
        let [a, b, c] = triangle.vertices();
        for p in &vertices {
            if triangle.vertex_index(p).is_some() {
                continue;
            }
            match strictly_inside_circumcircle(a, b, c, p, tolerance) {
                Ok(false) => {}
                Ok(true) => {
                    return Err(TriangulationValidationError::PointInCircumcircle {
                        triangle: triangle_key,
                        point: *p,
                    });
                }
                Err(CircumcircleError::CollinearPoints { .. }) => {
                    return Err(TriangulationValidationError::DegenerateTriangle {
                        triangle: triangle_key,
                    });
                }
            }
        }
    }
    Ok(())
}
