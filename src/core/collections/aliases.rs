use rustc_hash::{FxBuildHasher, FxHashSet};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::core::triangulation_data_structure::TriangleKey;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Arena storage for ribs and triangles.
///
/// Keys stay valid for the lifetime of the triangulation since nothing is
/// ever removed from the arenas during insertion.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::collections::StorageMap;
/// use planar_delaunay::core::triangulation_data_structure::TriangleKey;
///
/// let mut arena: StorageMap<TriangleKey, u32> = StorageMap::with_key();
/// let key = arena.insert(7);
/// assert_eq!(arena[key], 7);
/// ```
pub type StorageMap<K, V> = SlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// `HashSet` keyed with `rustc_hash::FxHasher`.
///
/// Not DoS-resistant; intended for internal keys only.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::collections::FastHashSet;
///
/// let mut set: FastHashSet<u64> = FastHashSet::default();
/// set.insert(789);
/// assert!(set.contains(&789));
/// ```
pub type FastHashSet<T> = FxHashSet<T>;

/// Build hasher used by [`FastHashSet`].
pub type FastBuildHasher = FxBuildHasher;

/// Small-optimized `Vec`: inline storage for up to `N` elements, heap beyond.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<i32, 4> = SmallBuffer::new();
/// buffer.push(1);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// DOMAIN ALIASES
// =============================================================================

/// Work-list of triangles awaiting a Delaunay check.
pub type TriangleKeySet = FastHashSet<TriangleKey>;

/// Triangles touched by one insertion edit (at most four).
pub type TriangleKeyBuffer = SmallBuffer<TriangleKey, 4>;

/// Creates a `FastHashSet` with pre-allocated capacity.
#[inline]
#[must_use]
pub fn fast_hash_set_with_capacity<T>(capacity: usize) -> FastHashSet<T> {
    FastHashSet::with_capacity_and_hasher(capacity, FastBuildHasher::default())
}
