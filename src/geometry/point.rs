//! Data and operations on planar points and displacement vectors.
//!
//! # Special Floating-Point Equality Semantics
//!
//! Points compare coordinates **exactly**: two points are equal only when both
//! coordinates are bit-for-bit the same value (with `NaN == NaN` and
//! `0.0 == -0.0`, so that `Eq` and `Hash` stay consistent). Exact equality is
//! what the mesh uses to decide which endpoint of a rib is which vertex.
//!
//! "Same location" for insertion purposes is a different, tolerance-based
//! question answered by [`Point::is_in_epsilon_area`].

#![forbid(unsafe_code)]

use crate::geometry::predicates::within_epsilon;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Sub;

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

/// An immutable point in the plane with `f64` coordinates.
///
/// Points are plain `Copy` values with no ownership semantics; ribs and
/// triangles store them by value.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
///
/// let p = Point::new(1.0, 2.0);
/// assert_eq!(p.x(), 1.0);
/// assert_eq!(p.y(), 2.0);
/// assert_eq!(p, Point::from([1.0, 2.0]));
/// ```
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// The y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Returns the coordinates as an array `[x, y]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns `true` if `other` lies within the axis-aligned `epsilon`
    /// neighbourhood of this point (component-wise absolute tolerance).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use planar_delaunay::geometry::point::Point;
    ///
    /// let p = Point::new(1.0, 1.0);
    /// assert!(p.is_in_epsilon_area(&Point::new(1.0 + 1e-7, 1.0), 1e-6));
    /// assert!(!p.is_in_epsilon_area(&Point::new(1.0 + 1e-5, 1.0), 1e-6));
    /// ```
    #[must_use]
    pub fn is_in_epsilon_area(&self, other: &Self, epsilon: f64) -> bool {
        within_epsilon(self.x, other.x, epsilon) && within_epsilon(self.y, other.y, epsilon)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Arithmetic mean of three points.
    #[must_use]
    pub fn centroid(a: &Self, b: &Self, c: &Self) -> Self {
        Self::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }
}

/// Canonical bit pattern used for both `Eq` and `Hash`.
///
/// All `NaN` payloads collapse to one pattern and `-0.0` maps to `0.0`.
fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        canonical_bits(self.x) == canonical_bits(other.x)
            && canonical_bits(self.y) == canonical_bits(other.y)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords[0], coords[1])
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        p.to_array()
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Self) -> Vector {
        Vector::between(&rhs, &self)
    }
}

// =============================================================================
// VECTOR
// =============================================================================

/// A displacement in the plane.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::{Point, Vector};
///
/// let v = Vector::between(&Point::new(1.0, 1.0), &Point::new(4.0, 5.0));
/// assert_eq!(v, Vector::new(3.0, 4.0));
/// assert_eq!(v.length(), 5.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// The x component.
    pub x: f64,
    /// The y component.
    pub y: f64,
}

impl Vector {
    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The vector from `from` to `to`.
    #[must_use]
    pub fn between(from: &Point, to: &Point) -> Self {
        Self::new(to.x() - from.x(), to.y() - from.y())
    }

    /// Dot product.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// The z component of the cross product (the pseudoscalar product).
    #[must_use]
    pub fn cross(&self, other: &Self) -> f64 {
        self.x.mul_add(other.y, -(self.y * other.x))
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================
