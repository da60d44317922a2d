//! Ribs (edges) of the planar mesh.
//!
//! A rib stores its two endpoints by value and up to two adjacent triangles by
//! key. `None` in an adjacency slot means the rib borders the region outside
//! the triangulated rectangle.

#![forbid(unsafe_code)]

use crate::core::triangulation_data_structure::{RibKey, TdsError, TriangleKey};
use crate::geometry::point::Point;
use serde::{Deserialize, Serialize};

/// An edge shared by at most two triangles.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::rib::Rib;
/// use planar_delaunay::geometry::point::Point;
///
/// let rib = Rib::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), None, None);
/// assert!(rib.is_boundary());
/// assert!(rib.contains_point(&Point::new(1.0, 0.0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rib {
    a: Point,
    b: Point,
    t1: Option<TriangleKey>,
    t2: Option<TriangleKey>,
}

impl Rib {
    /// Creates a rib between `a` and `b` adjacent to `t1` and `t2`.
    #[must_use]
    pub const fn new(a: Point, b: Point, t1: Option<TriangleKey>, t2: Option<TriangleKey>) -> Self {
        Self { a, b, t1, t2 }
    }

    /// First endpoint.
    #[inline]
    #[must_use]
    pub const fn a(&self) -> Point {
        self.a
    }

    /// Second endpoint.
    #[inline]
    #[must_use]
    pub const fn b(&self) -> Point {
        self.b
    }

    /// Both endpoints as `[a, b]`.
    #[inline]
    #[must_use]
    pub const fn points(&self) -> [Point; 2] {
        [self.a, self.b]
    }

    /// First adjacency slot.
    #[inline]
    #[must_use]
    pub const fn t1(&self) -> Option<TriangleKey> {
        self.t1
    }

    /// Second adjacency slot.
    #[inline]
    #[must_use]
    pub const fn t2(&self) -> Option<TriangleKey> {
        self.t2
    }

    /// Both adjacency slots as `[t1, t2]`.
    #[inline]
    #[must_use]
    pub const fn triangles(&self) -> [Option<TriangleKey>; 2] {
        [self.t1, self.t2]
    }

    /// Returns `true` if either slot is empty.
    #[must_use]
    pub const fn is_boundary(&self) -> bool {
        self.t1.is_none() || self.t2.is_none()
    }

    /// Returns `true` if `p` is exactly one of the endpoints.
    #[must_use]
    pub fn contains_point(&self, p: &Point) -> bool {
        self.a == *p || self.b == *p
    }

    /// Returns `true` if either slot holds `triangle` (`None` asks whether the
    /// rib touches the outside).
    #[must_use]
    pub fn touches(&self, triangle: Option<TriangleKey>) -> bool {
        self.t1 == triangle || self.t2 == triangle
    }

    /// Returns `true` if the rib joins `p` and `q` in either direction.
    #[must_use]
    pub fn connects(&self, p: &Point, q: &Point) -> bool {
        (self.a == *p && self.b == *q) || (self.a == *q && self.b == *p)
    }

    /// Moves the second endpoint. Used when a split shortens the rib.
    pub const fn set_b(&mut self, b: Point) {
        self.b = b;
    }

    /// Overwrites both endpoints and both slots.
    pub const fn reset(
        &mut self,
        a: Point,
        b: Point,
        t1: Option<TriangleKey>,
        t2: Option<TriangleKey>,
    ) {
        *self = Self::new(a, b, t1, t2);
    }

    /// Replaces the slot currently holding `old` with `new`.
    ///
    /// `t1` is checked first, so when both slots hold `old` only `t1` changes.
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
        if self.t1 == old {
            self.t1 = new;
        } else if self.t2 == old {
            self.t2 = new;
        } else {
            return Err(TdsError::TriangleNotOnRib { rib, triangle: old });
        }
        Ok(())
    }

    /// The triangle on the other side of this rib from `triangle`.
    ///
    /// # Errors
    ///
    /// Returns [`TdsError::TriangleNotOnRib`] if `triangle` is in neither slot.
    pub fn adjacent_across(
        &self,
        rib: RibKey,
        triangle: TriangleKey,
    ) -> Result<Option<TriangleKey>, TdsError> {
        if self.t1 == Some(triangle) {
            Ok(self.t2)
        } else if self.t2 == Some(triangle) {
            Ok(self.t1)
        } else {
            Err(TdsError::TriangleNotOnRib {
                rib,
                triangle: Some(triangle),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys() -> (RibKey, TriangleKey, TriangleKey, TriangleKey) {
        let mut ribs: SlotMap<RibKey, ()> = SlotMap::with_key();
        let mut tris: SlotMap<TriangleKey, ()> = SlotMap::with_key();
        (ribs.insert(()), tris.insert(()), tris.insert(()), tris.insert(()))
    }

    #[test]
    fn test_adjacent_across_both_directions() {
        let (rk, t1, t2, t3) = keys();
        let rib = Rib::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Some(t1), Some(t2));
        assert_eq!(rib.adjacent_across(rk, t1), Ok(Some(t2)));
        assert_eq!(rib.adjacent_across(rk, t2), Ok(Some(t1)));
        assert!(matches!(
            rib.adjacent_across(rk, t3),
            Err(TdsError::TriangleNotOnRib { .. })
        ));

        let boundary = Rib::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Some(t1), None);
        assert_eq!(boundary.adjacent_across(rk, t1), Ok(None));
    }

    #[test]
    fn test_replace_adjacent() {
        let (rk, t1, t2, t3) = keys();
        let mut rib = Rib::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Some(t1), None);
        rib.replace_adjacent(rk, None, Some(t2)).unwrap();
        assert_eq!(rib.triangles(), [Some(t1), Some(t2)]);
        rib.replace_adjacent(rk, Some(t1), Some(t3)).unwrap();
        assert_eq!(rib.triangles(), [Some(t3), Some(t2)]);
        assert!(rib.replace_adjacent(rk, Some(t1), None).is_err());
        assert!(!rib.is_boundary());
    }

    #[test]
    fn test_endpoint_queries() {
        let (p, q) = (Point::new(0.0, 0.0), Point::new(2.0, 1.0));
        let mut rib = Rib::new(p, q, None, None);
        assert!(rib.connects(&q, &p));
        assert!(!rib.connects(&p, &Point::new(2.0, 1.5)));
        rib.set_b(Point::new(1.0, 0.5));
        assert_eq!(rib.points(), [p, Point::new(1.0, 0.5)]);
        assert!(!rib.contains_point(&q));
    }
}
