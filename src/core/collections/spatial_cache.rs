//! Growable grid of triangle hints for point location.
//!
//! The cache splits the bounding rectangle into an `m × m` grid (`m` starts
//! at 2). Each cell remembers one triangle whose centroid last fell into it.
//! The entry is only a starting point for the location walk, so a stale hint
//! costs extra walk steps but is never wrong.
//!
//! The grid doubles once the running node counter reaches
//! `growth_rate · m²`; each old cell seeds its four children, so hints stay
//! spatially meaningful across growth.

use num_traits::cast;
use serde::{Deserialize, Serialize};

use crate::core::triangle::Triangle;
use crate::core::triangulation_data_structure::TriangleKey;
use crate::geometry::point::Point;
use crate::geometry::util::Bounds;

/// Side length of a freshly created cache.
pub const INITIAL_CACHE_SIZE: usize = 2;

/// Default growth rate (average triangles per cell before doubling).
pub const DEFAULT_GROWTH_RATE: usize = 6;

/// A square grid mapping cells of the bounding rectangle to triangle hints.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::collections::SpatialCache;
/// use planar_delaunay::geometry::point::Point;
/// use planar_delaunay::geometry::util::Bounds;
///
/// let bounds = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
/// let mut cache = SpatialCache::new(6, bounds);
/// assert_eq!(cache.size(), 2);
/// assert_eq!(cache.limit(), 24);
///
/// cache.increment_node_count(24);
/// assert_eq!(cache.size(), 4);
/// assert_eq!(cache.limit(), 96);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpatialCache {
    bounds: Bounds,
    growth_rate: usize,
    size: usize,
    cell_width: f64,
    cell_height: f64,
    limit: usize,
    node_count: usize,
    /// Row-major, `size * size` entries. Row follows y, column follows x.
    cells: Vec<Option<TriangleKey>>,
}

impl SpatialCache {
    /// Creates an empty 2×2 cache over `bounds`.
    ///
    /// A `growth_rate` of zero is treated as one.
    #[must_use]
    pub fn new(growth_rate: usize, bounds: Bounds) -> Self {
        let growth_rate = growth_rate.max(1);
        let size = INITIAL_CACHE_SIZE;
        let mut cache = Self {
            bounds,
            growth_rate,
            size,
            cell_width: 0.0,
            cell_height: 0.0,
            limit: growth_rate * size * size,
            node_count: 0,
            cells: vec![None; size * size],
        };
        cache.update_cell_size();
        cache
    }

    /// Current side length `m` of the grid.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Running node counter.
    #[inline]
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Counter value at which the grid doubles next.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Configured growth rate.
    #[inline]
    #[must_use]
    pub const fn growth_rate(&self) -> usize {
        self.growth_rate
    }

    /// The rectangle covered by the grid.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Seeds the grid quadrant by quadrant.
    ///
    /// `t00` covers low y / low x, `t01` low y / high x, `t10` high y / low x
    /// and `t11` high y / high x. On a 2×2 grid this fills exactly one cell
    /// each.
    pub fn initialize(
        &mut self,
        t00: TriangleKey,
        t01: TriangleKey,
        t10: TriangleKey,
        t11: TriangleKey,
    ) {
        let half = self.size / 2;
        for row in 0..self.size {
            for col in 0..self.size {
                let key = match (row >= half, col >= half) {
                    (false, false) => t00,
                    (false, true) => t01,
                    (true, false) => t10,
                    (true, true) => t11,
                };
                self.cells[row * self.size + col] = Some(key);
            }
        }
    }

    /// Stores `key` in the cell containing the centroid of `triangle`.
    pub fn update(&mut self, key: TriangleKey, triangle: &Triangle) {
        let index = self.cell_index(&triangle.centroid());
        self.cells[index] = Some(key);
    }

    /// The hint for `point`, or `None` before [`initialize`](Self::initialize).
    ///
    /// Points outside the bounds are clamped to the nearest border cell.
    #[must_use]
    pub fn get(&self, point: &Point) -> Option<TriangleKey> {
        self.cells[self.cell_index(point)]
    }

    /// Adds `count` to the node counter, doubling the grid when the counter
    /// reaches the limit.
    pub fn increment_node_count(&mut self, count: usize) {
        self.node_count = self.node_count.saturating_add(count);
        if self.node_count >= self.limit {
            self.increase_size();
        }
    }

    /// Doubles the side length. Every old cell is copied into its four
    /// children.
    pub fn increase_size(&mut self) {
        let old_size = self.size;
        let new_size = old_size * 2;
        let mut cells = vec![None; new_size * new_size];
        for row in 0..old_size {
            for col in 0..old_size {
                let value = self.cells[row * old_size + col];
                let (r, c) = (row * 2, col * 2);
                cells[r * new_size + c] = value;
                cells[r * new_size + c + 1] = value;
                cells[(r + 1) * new_size + c] = value;
                cells[(r + 1) * new_size + c + 1] = value;
            }
        }
        self.cells = cells;
        self.size = new_size;
        self.limit = self
            .growth_rate
            .saturating_mul(new_size)
            .saturating_mul(new_size);
        self.update_cell_size();
        tracing::debug!(
            size = new_size,
            limit = self.limit,
            node_count = self.node_count,
            "spatial cache grown"
        );
    }

    fn update_cell_size(&mut self) {
        let m: f64 = cast(self.size).unwrap_or(f64::MAX);
        self.cell_width = self.bounds.width() / m;
        self.cell_height = self.bounds.height() / m;
    }

    /// Row-major cell index of `point`, clamped to the grid.
    fn cell_index(&self, point: &Point) -> usize {
        let col = self.bin(point.x() - self.bounds.min().x(), self.cell_width);
        let row = self.bin(point.y() - self.bounds.min().y(), self.cell_height);
        row * self.size + col
    }

    fn bin(&self, offset: f64, unit: f64) -> usize {
        let last = self.size - 1;
        if unit.is_nan() || unit <= 0.0 {
            return 0;
        }
        // NaN and negative offsets fall through `max` to 0.
        let scaled = (offset / unit).floor().max(0.0);
        cast::<f64, usize>(scaled).map_or(last, |i| i.min(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::triangulation_data_structure::RibKey;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<TriangleKey> {
        let mut arena: SlotMap<TriangleKey, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    fn unit_cache() -> SpatialCache {
        SpatialCache::new(
            DEFAULT_GROWTH_RATE,
            Bounds::from_corners(Point::new(0.0, 0.0), Point::new(8.0, 8.0)),
        )
    }

    fn triangle_around(center: Point) -> Triangle {
        let mut ribs: SlotMap<RibKey, ()> = SlotMap::with_key();
        let r = [ribs.insert(()), ribs.insert(()), ribs.insert(())];
        Triangle::from_canonical(
            r,
            [
                Point::new(center.x() - 0.1, center.y() - 0.1),
                Point::new(center.x() + 0.2, center.y() - 0.1),
                Point::new(center.x() - 0.1, center.y() + 0.2),
            ],
        )
    }

    #[test]
    fn test_get_before_initialize_is_none() {
        let cache = unit_cache();
        assert_eq!(cache.get(&Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_initialize_maps_quadrants() {
        let k = keys(4);
        let mut cache = unit_cache();
        cache.initialize(k[0], k[1], k[2], k[3]);
        assert_eq!(cache.get(&Point::new(1.0, 1.0)), Some(k[0]));
        assert_eq!(cache.get(&Point::new(7.0, 1.0)), Some(k[1]));
        assert_eq!(cache.get(&Point::new(1.0, 7.0)), Some(k[2]));
        assert_eq!(cache.get(&Point::new(7.0, 7.0)), Some(k[3]));
        // Max corner and outside points clamp into the grid.
        assert_eq!(cache.get(&Point::new(8.0, 8.0)), Some(k[3]));
        assert_eq!(cache.get(&Point::new(-3.0, 100.0)), Some(k[2]));
        assert_eq!(cache.get(&Point::new(f64::NAN, 0.0)), Some(k[0]));
    }

    #[test]
    fn test_update_uses_centroid_cell() {
        let k = keys(5);
        let mut cache = unit_cache();
        cache.initialize(k[0], k[1], k[2], k[3]);
        cache.update(k[4], &triangle_around(Point::new(6.0, 2.0)));
        assert_eq!(cache.get(&Point::new(5.0, 3.0)), Some(k[4]));
        assert_eq!(cache.get(&Point::new(2.0, 2.0)), Some(k[0]));
    }

    #[test]
    fn test_growth_copies_parent_cells() {
        let k = keys(5);
        let mut cache = unit_cache();
        cache.initialize(k[0], k[1], k[2], k[3]);
        cache.increment_node_count(23);
        assert_eq!(cache.size(), 2);
        cache.increment_node_count(1);
        assert_eq!(cache.size(), 4);
        assert_eq!(cache.limit(), 96);
        assert_eq!(cache.node_count(), 24);

        // Every child of the high-x/low-y parent still resolves to it.
        for p in [(4.5, 0.5), (7.5, 0.5), (4.5, 3.5), (7.5, 3.5)] {
            assert_eq!(cache.get(&Point::from(p)), Some(k[1]));
        }

        // After growth an update only overwrites one finer cell.
        cache.update(k[4], &triangle_around(Point::new(1.0, 1.0)));
        assert_eq!(cache.get(&Point::new(1.0, 1.0)), Some(k[4]));
        assert_eq!(cache.get(&Point::new(3.0, 3.0)), Some(k[0]));
    }

    #[test]
    fn test_zero_growth_rate_is_clamped() {
        let cache = SpatialCache::new(
            0,
            Bounds::from_corners(Point::new(0.0, 0.0), Point::new(1.0, 1.0)),
        );
        assert_eq!(cache.growth_rate(), 1);
        assert_eq!(cache.limit(), 4);
    }
}
