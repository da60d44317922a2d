//! Geometric predicates for planar triangulation.
//!
//! Every predicate here is a pure, total function over finite coordinates.
//! Orientation, half-plane and in-circle signs come from the adaptive-precision
//! `orient2d`/`incircle` of the [`robust`] crate, so they are exact for any
//! finite input, slivers included. Angle questions use plain dot and cross
//! products. No trigonometric calls, and square roots only where a true
//! distance is requested.
//!
//! `NaN`/infinite input is out of contract: results are unspecified but the
//! functions never panic.

use robust::Coord;

use crate::geometry::point::{Point, Vector};

/// Default absolute tolerance used for "same point" and "on this rib" tests.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Represents the orientation of an ordered triple of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The triple turns clockwise (cross product < 0)
    CLOCKWISE,
    /// The three points are collinear (cross product == 0)
    COLLINEAR,
    /// The triple turns counter-clockwise (cross product > 0)
    COUNTERCLOCKWISE,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CLOCKWISE => write!(f, "CLOCKWISE"),
            Self::COLLINEAR => write!(f, "COLLINEAR"),
            Self::COUNTERCLOCKWISE => write!(f, "COUNTERCLOCKWISE"),
        }
    }
}

/// The z-component of `(a_end - a_start) × (b_end - b_start)`.
///
/// # Example
///
/// ```
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::cross_product_z;
///
/// let a = Point::new(2.0, 0.0);
/// let b = Point::new(3.0, 2.0);
/// let c = Point::new(1.0, 0.0);
/// let d = Point::new(0.0, 2.0);
/// assert_eq!(cross_product_z(&a, &b, &c, &d), 4.0);
/// assert_eq!(cross_product_z(&c, &d, &a, &b), -4.0);
/// ```
#[inline]
#[must_use]
pub fn cross_product_z(a_start: &Point, a_end: &Point, b_start: &Point, b_end: &Point) -> f64 {
    (a_end.x() - a_start.x()) * (b_end.y() - b_start.y())
        - (a_end.y() - a_start.y()) * (b_end.x() - b_start.x())
}

#[inline]
const fn coord(p: &Point) -> Coord<f64> {
    Coord { x: p.x(), y: p.y() }
}

/// Exact-sign orientation determinant of `(a, b, c)`: positive when
/// counter-clockwise, negative when clockwise, zero only for truly collinear
/// points.
#[inline]
fn orient2d(a: &Point, b: &Point, c: &Point) -> f64 {
    robust::orient2d(coord(a), coord(b), coord(c))
}

/// Orientation of the ordered triple `(a, b, c)` in the standard Cartesian
/// plane (y axis pointing up).
///
/// The sign is exact: nearly collinear triples that plain floating-point
/// arithmetic would misclassify are resolved with extended precision.
///
/// # Example
///
/// ```
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::{Orientation, orientation};
///
/// let (a, b) = (Point::new(0.0, 0.0), Point::new(2.0, 0.0));
/// assert_eq!(orientation(&a, &b, &Point::new(1.0, 1e-300)), Orientation::COUNTERCLOCKWISE);
/// assert_eq!(orientation(&a, &b, &Point::new(5.0, 0.0)), Orientation::COLLINEAR);
/// ```
#[must_use]
pub fn orientation(a: &Point, b: &Point, c: &Point) -> Orientation {
    let z = orient2d(a, b, c);
    if z > 0.0 {
        Orientation::COUNTERCLOCKWISE
    } else if z < 0.0 {
        Orientation::CLOCKWISE
    } else {
        Orientation::COLLINEAR
    }
}

/// Returns `true` iff `(a, b, c)` is ordered clockwise.
///
/// Same sign as `cross_product_z(c, a, c, b) < 0`, evaluated exactly.
///
/// # Example
///
/// ```
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::is_clockwise_ordered;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(0.0, 1.0);
/// let c = Point::new(1.0, 0.0);
/// assert!(is_clockwise_ordered(&a, &b, &c));
/// assert!(!is_clockwise_ordered(&a, &c, &b));
/// ```
#[inline]
#[must_use]
pub fn is_clockwise_ordered(a: &Point, b: &Point, c: &Point) -> bool {
    orient2d(a, b, c) < 0.0
}

/// Returns `true` iff `a → b → c` makes a strict left (counter-clockwise) turn.
#[inline]
#[must_use]
pub fn is_left_turn(a: &Point, b: &Point, c: &Point) -> bool {
    orient2d(a, b, c) > 0.0
}

/// Returns `true` iff `x` and `y` lie strictly on opposite sides of the line
/// through `o` and `a`.
///
/// Uses the exact signs of the pseudoscalar products `OA × OX` and `OA × OY`.
/// A point exactly on the line is never separated from anything.
///
/// # Example
///
/// ```
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::is_separated;
///
/// let o = Point::new(0.0, 0.0);
/// let a = Point::new(1.0, 0.0);
/// assert!(is_separated(&o, &a, &Point::new(0.5, 1.0), &Point::new(0.5, -1.0)));
/// assert!(!is_separated(&o, &a, &Point::new(0.5, 1.0), &Point::new(3.0, 2.0)));
/// assert!(!is_separated(&o, &a, &Point::new(7.0, 0.0), &Point::new(0.5, -1.0)));
/// ```
#[must_use]
pub fn is_separated(o: &Point, a: &Point, x: &Point, y: &Point) -> bool {
    let ox = orient2d(o, a, x);
    let oy = orient2d(o, a, y);
    (ox > 0.0 && oy < 0.0) || (ox < 0.0 && oy > 0.0)
}

/// Unsigned distance from `p` to the infinite line through `o` and `x`.
///
/// Uses the general line equation `A·x + B·y + C = 0` with `A = Oy − Xy`,
/// `B = Xx − Ox`, `C = Ox·Xy − Xx·Oy`. If `o == x` the line is undefined and
/// the distance to `o` is returned instead.
#[must_use]
pub fn distance_to_line(o: &Point, x: &Point, p: &Point) -> f64 {
    let a = o.y() - x.y();
    let b = x.x() - o.x();
    let c = o.x() * x.y() - x.x() * o.y();
    let norm = a.hypot(b);
    if norm == 0.0 {
        return o.distance(p);
    }
    (a * p.x() + b * p.y() + c).abs() / norm
}

/// Absolute-tolerance scalar equality: `|a - b| <= epsilon`.
#[inline]
#[must_use]
pub fn within_epsilon(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Returns `true` if `p` lies on the closed segment `a b`, up to `epsilon`.
///
/// Both conditions are required: the distance from `p` to the supporting line
/// is within `epsilon` of zero, and `p` is inside the segment's bounding box
/// expanded by `epsilon`. The second condition rejects points on the line's
/// extension beyond either endpoint.
#[must_use]
pub fn lies_on_segment(a: &Point, b: &Point, p: &Point, epsilon: f64) -> bool {
    if !within_epsilon(distance_to_line(a, b, p), 0.0, epsilon) {
        return false;
    }
    let (min_x, max_x) = if a.x() <= b.x() { (a.x(), b.x()) } else { (b.x(), a.x()) };
    let (min_y, max_y) = if a.y() <= b.y() { (a.y(), b.y()) } else { (b.y(), a.y()) };
    p.x() >= min_x - epsilon
        && p.x() <= max_x + epsilon
        && p.y() >= min_y - epsilon
        && p.y() <= max_y + epsilon
}

/// Checks the Delaunay condition for the quadrilateral `(p1, p2, p3, node)`.
///
/// `p1, p2, p3` is a triangle (conventionally clockwise) and `node` is the
/// vertex of the neighbouring triangle across the rib `p1 p3`, i.e. opposite
/// to `p2`. Returns `true` when `node` is not strictly inside the
/// circumcircle of `p1 p2 p3`.
///
/// With `sa = (node−p1)·(node−p3)` and `sb = (p2−p1)·(p2−p3)`:
///
/// - both negative: both opposite angles are obtuse, the condition fails;
/// - both non-negative: both angles are at most right, the condition holds;
/// - otherwise the sign of `sin(α + β)` (scaled by a positive constant)
///   decides: `|(node−p1)×(node−p3)|·sb + sa·|(p2−p1)×(p2−p3)| >= 0`.
///
/// If `node` turns out to be on the same side of `p1 p3` as `p2`, the
/// quadrilateral is not convex and the opposite-angle sum is meaningless;
/// the inscribed-angle comparison is used instead (the condition holds iff
/// the angle at `node` does not exceed the angle at `p2`), which keeps the
/// predicate equivalent to the empty-circumcircle test in every
/// configuration.
///
/// # Example
///
/// ```
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::satisfies_delaunay_condition;
///
/// let a = Point::new(0.0, 37.0);
/// let b = Point::new(57.0, 64.0);
/// let c = Point::new(60.0, 8.0);
/// assert!(!satisfies_delaunay_condition(&a, &b, &c, &Point::new(67.0, 38.0)));
/// assert!(satisfies_delaunay_condition(&a, &b, &c, &Point::new(119.0, 39.0)));
/// ```
#[must_use]
pub fn satisfies_delaunay_condition(p1: &Point, p2: &Point, p3: &Point, node: &Point) -> bool {
    let (sa, sb) = opposite_angle_cosines(node, p1, p2, p3);
    let sin_at_node = cross_product_z(node, p1, node, p3).abs();
    let sin_at_p2 = cross_product_z(p2, p1, p2, p3).abs();

    let same_side = cross_product_z(p1, p3, p1, p2) * cross_product_z(p1, p3, p1, node) > 0.0;
    if same_side {
        // sin(angle_node - angle_p2) <= 0
        return sin_at_node * sb - sa * sin_at_p2 <= 0.0;
    }

    if sa < 0.0 && sb < 0.0 {
        return false;
    }
    if sa >= 0.0 && sb >= 0.0 {
        return true;
    }
    // sin(angle_node + angle_p2) >= 0
    sin_at_node * sb + sa * sin_at_p2 >= 0.0
}

/// Position of a point relative to the circumcircle of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InCircle {
    /// The point is outside the circumcircle
    OUTSIDE,
    /// The point is exactly on the circumcircle
    BOUNDARY,
    /// The point is strictly inside the circumcircle
    INSIDE,
}

impl std::fmt::Display for InCircle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Classifies `d` against the circumcircle of `a b c` (any orientation).
///
/// The sign of the lifted in-circle determinant is evaluated exactly and
/// corrected for the orientation of `a b c`, so only truly cocircular points
/// are [`InCircle::BOUNDARY`]. A degenerate (collinear) `a b c` yields
/// `BOUNDARY`.
///
/// # Example
///
/// ```
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::{InCircle, incircle};
///
/// let (a, b, c) = (Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0));
/// assert_eq!(incircle(&a, &b, &c, &Point::new(0.5, 0.5)), InCircle::INSIDE);
/// assert_eq!(incircle(&a, &b, &c, &Point::new(1.0, 1.0)), InCircle::BOUNDARY);
/// assert_eq!(incircle(&a, &c, &b, &Point::new(2.0, 2.0)), InCircle::OUTSIDE);
/// ```
#[must_use]
pub fn incircle(a: &Point, b: &Point, c: &Point, d: &Point) -> InCircle {
    let det = robust::incircle(coord(a), coord(b), coord(c), coord(d));
    let signed = match orientation(a, b, c) {
        Orientation::COUNTERCLOCKWISE => det,
        Orientation::CLOCKWISE => -det,
        Orientation::COLLINEAR => return InCircle::BOUNDARY,
    };
    if signed > 0.0 {
        InCircle::INSIDE
    } else if signed < 0.0 {
        InCircle::OUTSIDE
    } else {
        InCircle::BOUNDARY
    }
}

/// Returns `true` iff the quadrilateral `a b c d` is strictly convex, i.e.
/// its diagonals `a c` and `b d` cross at a point interior to both.
///
/// This is exactly when the diagonal `a c` can be flipped to `b d` without
/// folding the mesh.
///
/// # Example
///
/// ```
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::predicates::is_strictly_convex_quad;
///
/// let (a, c) = (Point::new(0.0, 0.0), Point::new(2.0, 0.0));
/// assert!(is_strictly_convex_quad(&a, &Point::new(1.0, 1.0), &c, &Point::new(1.0, -1.0)));
/// // Reflex at `c`: flipping `a c` would fold.
/// assert!(!is_strictly_convex_quad(&a, &Point::new(3.0, 1.0), &c, &Point::new(3.0, -1.0)));
/// ```
#[must_use]
pub fn is_strictly_convex_quad(a: &Point, b: &Point, c: &Point, d: &Point) -> bool {
    is_separated(a, c, b, d) && is_separated(b, d, a, c)
}

/// Returns `true` when the rib `p1 p3` shared by triangle `p1 p2 p3` and the
/// triangle containing `node` must be flipped.
///
/// Requires the quadrilateral `p1 p2 p3 node` to be strictly convex, `node`
/// to be strictly inside the circumcircle per the exact [`incircle`], and
/// [`satisfies_delaunay_condition`] to fail. Every rib this reports can be
/// flipped without folding the mesh, and every such flip is a true Lawson
/// improvement, so repair terminates. Cocircular configurations are never
/// flipped.
#[must_use]
pub fn is_delaunay_violation(p1: &Point, p2: &Point, p3: &Point, node: &Point) -> bool {
    is_strictly_convex_quad(p1, p2, p3, node)
        && incircle(p1, p2, p3, node) == InCircle::INSIDE
        && !satisfies_delaunay_condition(p1, p2, p3, node)
}

/// Scaled cosines of the angles at `p0` and `p2` subtended by `p1 p3`.
///
/// Returns `(sa, sb)` with `sa = (p0−p1)·(p0−p3)` and `sb = (p2−p1)·(p2−p3)`.
fn opposite_angle_cosines(p0: &Point, p1: &Point, p2: &Point, p3: &Point) -> (f64, f64) {
    let sa = Vector::between(p1, p0).dot(&Vector::between(p3, p0));
    let sb = Vector::between(p1, p2).dot(&Vector::between(p3, p2));
    (sa, sb)
}

// =============================================================================
// TESTS
// =============================================================================
