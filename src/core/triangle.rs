//! Triangles of the planar mesh.
//!
//! # Canonical order
//!
//! A triangle holds three rib keys and three vertices arranged so that
//!
//! - `ribs[0]` joins `vertices[0]` and `vertices[1]`,
//! - `ribs[1]` joins `vertices[1]` and `vertices[2]`,
//! - `ribs[2]` joins `vertices[0]` and `vertices[2]`.
//!
//! Hence `ribs[i]` is opposite `vertices[(i + 2) % 3]` and the rib opposite
//! `vertices[j]` is `ribs[(j + 1) % 3]`. The order is rebuilt by
//! [`canonical_order`] whenever the rib set changes; vertex orientation
//! (clockwise or not) is not normalized.

#![forbid(unsafe_code)]

use crate::core::triangulation_data_structure::{RibKey, TdsError, TriangleKey};
use crate::geometry::point::Point;
use serde::{Deserialize, Serialize};

/// A triangle referencing its three ribs by key.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    ribs: [RibKey; 3],
    vertices: [Point; 3],
}

impl Triangle {
    /// A triangle with null rib keys. Reserved in the arena so ribs can refer
    /// to its key before its ribs exist.
    #[must_use]
    pub(crate) fn placeholder() -> Self {
        Self {
            ribs: [RibKey::default(); 3],
            vertices: [Point::ORIGIN; 3],
        }
    }

    pub(crate) const fn from_canonical(ribs: [RibKey; 3], vertices: [Point; 3]) -> Self {
        Self { ribs, vertices }
    }

    /// The three rib keys in canonical order.
    #[inline]
    #[must_use]
    pub const fn ribs(&self) -> &[RibKey; 3] {
        &self.ribs
    }

    /// The three vertices in canonical order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> &[Point; 3] {
        &self.vertices
    }

    /// The vertex opposite `ribs[rib_index]`.
    ///
    /// # Panics
    ///
    /// Panics if `rib_index > 2`.
    #[inline]
    #[must_use]
    pub const fn opposite_vertex(&self, rib_index: usize) -> Point {
        self.vertices[(rib_index + 2) % 3]
    }

    /// Index of the rib opposite `vertices[vertex_index]`.
    #[inline]
    #[must_use]
    pub const fn opposite_rib_index(vertex_index: usize) -> usize {
        (vertex_index + 1) % 3
    }

    /// Position of `rib` among this triangle's ribs.
    #[must_use]
    pub fn rib_index(&self, rib: RibKey) -> Option<usize> {
        self.ribs.iter().position(|&r| r == rib)
    }

    /// Position of `vertex` among this triangle's vertices (exact equality).
    #[must_use]
    pub fn vertex_index(&self, vertex: &Point) -> Option<usize> {
        self.vertices.iter().position(|v| v == vertex)
    }

    /// Returns `true` if the triangle uses `rib`.
    #[must_use]
    pub fn has_rib(&self, rib: RibKey) -> bool {
        self.ribs.contains(&rib)
    }

    /// Arithmetic mean of the three vertices.
    #[must_use]
    pub fn centroid(&self) -> Point {
        let [a, b, c] = &self.vertices;
        Point::centroid(a, b, c)
    }

    /// Overwrites the rib at `index`. The canonical order is stale until
    /// the triangle is renormalized.
    pub(crate) const fn replace_rib(&mut self, index: usize, rib: RibKey) {
        self.ribs[index] = rib;
    }

    /// Swaps `old` for `new` in place.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::RibNotFound`] if `old` is not one of the ribs.
    pub(crate) fn replace_rib_key(
        &mut self,
        triangle: TriangleKey,
        old: RibKey,
        new: RibKey,
    ) -> Result<(), TdsError> {
        let index = self
            .rib_index(old)
            .ok_or(TdsError::RibNotFound { triangle, rib: old })?;
        self.replace_rib(index, new);
        Ok(())
    }
}

/// Rebuilds the canonical rib/vertex order from three `(rib, endpoints)`
/// pairs.
///
/// Vertices 0 and 1 are the endpoints of the first rib. Vertex 2 is the
/// endpoint of the remaining ribs equal to neither. The remaining rib touching
/// vertex 1 goes to slot 1 and the one touching vertex 0 to slot 2.
///
/// Returns `None` if the ribs do not close a non-degenerate triangle.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::triangle::canonical_order;
/// use planar_delaunay::core::triangulation_data_structure::RibKey;
/// use planar_delaunay::geometry::point::Point;
/// use slotmap::SlotMap;
///
/// let mut keys: SlotMap<RibKey, ()> = SlotMap::with_key();
/// let (r0, r1, r2) = (keys.insert(()), keys.insert(()), keys.insert(()));
/// let (a, b, c) = (Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0));
///
/// let (ribs, vertices) = canonical_order([(r0, [a, b]), (r1, [c, a]), (r2, [b, c])]).unwrap();
/// assert_eq!(ribs, [r0, r2, r1]);
/// assert_eq!(vertices, [a, b, c]);
/// ```
#[must_use]
pub fn canonical_order(ribs: [(RibKey, [Point; 2]); 3]) -> Option<([RibKey; 3], [Point; 3])> {
    let [(k0, [v0, v1]), first, second] = ribs;
    if v0 == v1 {
        return None;
    }

    let third_of = |[p, q]: [Point; 2]| -> Option<Point> {
        match (p == v0 || p == v1, q == v0 || q == v1) {
            (true, false) => Some(q),
            (false, true) => Some(p),
            _ => None,
        }
    };
    let v2 = third_of(first.1)?;
    if third_of(second.1)? != v2 {
        return None;
    }

    let touches = |[p, q]: [Point; 2], v: Point| p == v || q == v;
    let (r1, r2) = match (touches(first.1, v1), touches(second.1, v1)) {
        (true, false) if touches(second.1, v0) => (first.0, second.0),
        (false, true) if touches(first.1, v0) => (second.0, first.0),
        _ => return None,
    };

    Some(([k0, r1, r2], [v0, v1, v2]))
}
