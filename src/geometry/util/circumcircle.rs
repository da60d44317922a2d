//! Circumcircle of a planar triangle.

use crate::geometry::point::{Point, Vector};

pub use super::CircumcircleError;

/// Center of the circle through `a`, `b` and `c`.
///
/// # Errors
///
/// Returns [`CircumcircleError::CollinearPoints`] when the three points are
/// (numerically) collinear.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::util::circumcenter;
///
/// let c = circumcenter(&Point::new(0.0, 0.0), &Point::new(2.0, 0.0), &Point::new(0.0, 2.0)).unwrap();
/// assert_eq!(c, Point::new(1.0, 1.0));
/// ```
pub fn circumcenter(a: &Point, b: &Point, c: &Point) -> Result<Point, CircumcircleError> {
    let ab = Vector::between(a, b);
    let ac = Vector::between(a, c);
    let d = 2.0 * ab.cross(&ac);
    if d == 0.0 || !d.is_finite() {
        return Err(CircumcircleError::CollinearPoints {
            points: [*a, *b, *c],
        });
    }
    let ab2 = ab.dot(&ab);
    let ac2 = ac.dot(&ac);
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    Ok(Point::new(a.x() + ux, a.y() + uy))
}

/// Radius of the circle through `a`, `b` and `c`.
///
/// # Errors
///
/// Same as [`circumcenter`].
pub fn circumradius(a: &Point, b: &Point, c: &Point) -> Result<f64, CircumcircleError> {
    circumcenter(a, b, c).map(|center| center.distance(a))
}

/// Returns `true` if `p` is strictly inside the circumcircle of `a b c`,
/// i.e. closer to the center than the radius by more than `tolerance`.
///
/// # Errors
///
/// Same as [`circumcenter`].
pub fn strictly_inside_circumcircle(
    a: &Point,
    b: &Point,
    c: &Point,
    p: &Point,
    tolerance: f64,
) -> Result<bool, CircumcircleError> {
    let center = circumcenter(a, b, c)?;
    let radius = center.distance(a);
    Ok(center.distance(p) < radius - tolerance)
}
