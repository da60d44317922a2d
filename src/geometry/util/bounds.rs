//! Axis-aligned bounding rectangle.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;

/// An axis-aligned rectangle stored as normalized `min`/`max` corners.
///
/// The corners may be given in any order; `min` always holds the smaller
/// coordinate on each axis.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::util::Bounds;
///
/// let bounds = Bounds::from_corners(Point::new(0.0, 10.0), Point::new(20.0, 0.0));
/// assert_eq!(bounds.min(), Point::new(0.0, 0.0));
/// assert_eq!(bounds.max(), Point::new(20.0, 10.0));
/// assert!(bounds.contains(&Point::new(20.0, 5.0), 0.0));
/// assert!(!bounds.contains(&Point::new(20.5, 5.0), 1e-6));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    /// Builds the rectangle spanned by two opposite corners.
    #[must_use]
    pub fn from_corners(p: Point, q: Point) -> Self {
        Self {
            min: Point::new(p.x().min(q.x()), p.y().min(q.y())),
            max: Point::new(p.x().max(q.x()), p.y().max(q.y())),
        }
    }

    /// Corner with the smallest coordinates.
    #[inline]
    #[must_use]
    pub const fn min(&self) -> Point {
        self.min
    }

    /// Corner with the largest coordinates.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> Point {
        self.max
    }

    /// Extent along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }

    /// Extent along y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            f64::midpoint(self.min.x(), self.max.x()),
            f64::midpoint(self.min.y(), self.max.y()),
        )
    }

    /// Returns `true` if the rectangle has finite corners and a positive
    /// area.
    #[must_use]
    pub fn is_proper(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.width() > 0.0
            && self.height() > 0.0
    }

    /// Returns `true` if `p` lies in the closed rectangle grown by `epsilon`
    /// on every side.
    #[must_use]
    pub fn contains(&self, p: &Point, epsilon: f64) -> bool {
        p.x() >= self.min.x() - epsilon
            && p.x() <= self.max.x() + epsilon
            && p.y() >= self.min.y() - epsilon
            && p.y() <= self.max.y() + epsilon
    }

    /// Moves each coordinate of `p` within `epsilon` of a side onto that
    /// side, which also clamps points up to `epsilon` outside.
    ///
    /// ```rust
    /// use planar_delaunay::geometry::point::Point;
    /// use planar_delaunay::geometry::util::Bounds;
    ///
    /// let b = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
    /// assert_eq!(b.snap(&Point::new(-5e-7, 0.5), 1e-6), Point::new(0.0, 0.5));
    /// assert_eq!(b.snap(&Point::new(0.3, 0.4), 1e-6), Point::new(0.3, 0.4));
    /// ```
    #[must_use]
    pub fn snap(&self, p: &Point, epsilon: f64) -> Point {
        let snap_axis = |v: f64, lo: f64, hi: f64| {
            if v <= lo + epsilon {
                lo
            } else if v >= hi - epsilon {
                hi
            } else {
                v
            }
        };
        Point::new(
            snap_axis(p.x(), self.min.x(), self.max.x()),
            snap_axis(p.y(), self.min.y(), self.max.y()),
        )
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}
