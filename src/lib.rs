//! # planar-delaunay
//!
//! Incremental 2D Delaunay triangulation of a growing point set inside a
//! fixed bounding rectangle.
//!
//! # Features
//!
//! - One-point-at-a-time insertion with rib flips restoring the Delaunay
//!   property after every edit
//! - Amortized near-constant-time point location through a growable grid of
//!   triangle hints
//! - Arena storage ([`slotmap`]) with stable keys: nothing is ever removed,
//!   so keys handed out stay valid
//! - Structural and Delaunay validation helpers
//! - Graham-scan convex hull over arbitrary point lists
//! - Serialization/Deserialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use planar_delaunay::prelude::*;
//!
//! let mut dt = DelaunayTriangulation::new(Point::new(0.0, 100.0), Point::new(100.0, 0.0)).unwrap();
//!
//! // The empty rectangle is two triangles sharing a diagonal.
//! assert_eq!(dt.number_of_triangles(), 2);
//!
//! let summary = dt
//!     .insert_all([(12.0, 80.0), (55.0, 43.0), (71.0, 12.0), (33.0, 21.0)])
//!     .unwrap();
//! assert_eq!(summary.inserted, 4);
//!
//! // Every interior point adds two triangles.
//! assert_eq!(dt.number_of_triangles(), 2 + 2 * 4);
//! assert!(dt.validate_delaunay().is_ok());
//! ```
//!
//! # Insertion cases
//!
//! A new point is located by walking from a cached hint triangle across
//! separating ribs, then:
//!
//! | Location | Outcome | Triangles |
//! |---|---|---|
//! | Within epsilon of a vertex | [`InsertionOutcome::Ignored`](core::algorithms::incremental_insertion::InsertionOutcome::Ignored) | +0 |
//! | On a rib of the rectangle | [`InsertionOutcome::SplitBoundaryRib`](core::algorithms::incremental_insertion::InsertionOutcome::SplitBoundaryRib) | +1 |
//! | On an interior rib | [`InsertionOutcome::SplitInteriorRib`](core::algorithms::incremental_insertion::InsertionOutcome::SplitInteriorRib) | +2 |
//! | Inside a triangle | [`InsertionOutcome::SplitTriangle`](core::algorithms::incremental_insertion::InsertionOutcome::SplitTriangle) | +2 |
//!
//! The reshaped triangles then seed [`repair_delaunay`](core::algorithms::flips::repair_delaunay),
//! which flips ribs until every rib passes the Delaunay test.
//!
//! # Triangulation Invariants
//!
//! Checked by [`DelaunayTriangulation::is_valid`](core::delaunay_triangulation::DelaunayTriangulation::is_valid)
//! and [`DelaunayTriangulation::validate_delaunay`](core::delaunay_triangulation::DelaunayTriangulation::validate_delaunay):
//!
//! - **Mutual adjacency** - every `Some(t)` slot of a rib names a triangle
//!   that lists the rib, and every rib of a triangle names it back.
//! - **Canonical order** - every triangle's vertices match its ribs.
//! - **Delaunay property** - no interior rib has a far vertex clearly inside
//!   the circumcircle of the triangle on its near side. Cocircular
//!   configurations are accepted with either diagonal.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events: `debug` per insertion and per
//! cache growth, `trace` for walk steps and splits, `warn` when repair runs
//! out of flips. Setting `PLANAR_DELAUNAY_REPAIR_TRACE` adds one `debug`
//! event per flip.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the mesh data structures, the triangulation
/// engine and the algorithms that edit the mesh.
pub mod core {
    /// Algorithms that query and edit the mesh
    pub mod algorithms {
        /// Rib flips and Delaunay repair
        pub mod flips;
        /// Split edits for a single point insertion
        pub mod incremental_insertion;
        /// Point location by separating-rib walking
        pub mod locate;
    }
    /// Collection aliases and the spatial hint cache
    pub mod collections;
    /// The incremental triangulation engine
    pub mod delaunay_triangulation;
    pub mod rib;
    pub mod triangle;
    pub mod triangulation_data_structure;
    pub mod util;

    // Re-export the `core` modules.
    pub use delaunay_triangulation::*;
    pub use rib::*;
    pub use triangle::*;
    pub use triangulation_data_structure::*;
    pub use util::*;
    // Note: collections module not re-exported here to avoid namespace pollution
    // Import specific types via prelude or use crate::core::collections::
}

/// Contains the `Point` type, geometric predicates and geometric utilities.
pub mod geometry {
    /// Geometric algorithms on plain point lists
    pub mod algorithms {
        /// Graham-scan convex hull
        pub mod convex_hull;
        pub use convex_hull::*;
    }
    pub mod point;
    pub mod predicates;
    /// Bounding rectangles, circumcircles and point generation
    pub mod util;

    pub use algorithms::*;
    pub use point::*;
    pub use predicates::*;
    pub use util::*;
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        algorithms::{flips::*, incremental_insertion::*, locate::*},
        delaunay_triangulation::*,
        rib::*,
        triangle::*,
        triangulation_data_structure::*,
        util::*,
    };

    // Re-export commonly used collection types from core::collections
    pub use crate::core::collections::{
        FastHashSet, SmallBuffer, SpatialCache, TriangleKeyBuffer, TriangleKeySet,
        fast_hash_set_with_capacity,
    };

    // Re-export from geometry
    pub use crate::geometry::{algorithms::*, point::*, predicates::*, util::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{
        core::{
            collections::SpatialCache, delaunay_triangulation::DelaunayTriangulation, rib::Rib,
            triangle::Triangle, triangulation_data_structure::Tds,
        },
        geometry::{point::Point, util::Bounds},
        is_normal,
    };

    // =============================================================================
    // TYPE SAFETY TESTS
    // =============================================================================

    #[test]
    fn normal_types() {
        assert!(is_normal::<Point>());
        assert!(is_normal::<Bounds>());
        assert!(is_normal::<Rib>());
        assert!(is_normal::<Triangle>());
        assert!(is_normal::<Tds>());
        assert!(is_normal::<SpatialCache>());
        assert!(is_normal::<DelaunayTriangulation>());
    }

    #[test]
    fn test_prelude_collections_exports() {
        use crate::prelude::*;

        let mut set: FastHashSet<u64> = FastHashSet::default();
        set.insert(789);
        assert!(set.contains(&789));

        let mut buffer: SmallBuffer<i32, 8> = SmallBuffer::new();
        buffer.push(42);
        assert_eq!(buffer.len(), 1);

        let set_with_cap = fast_hash_set_with_capacity::<u64>(50);
        assert!(set_with_cap.capacity() >= 50);

        let work_list = TriangleKeySet::default();
        assert!(work_list.is_empty());
        assert!(TriangleKeyBuffer::new().is_empty());
    }

    #[test]
    fn test_prelude_engine_exports() {
        use crate::prelude::*;

        let mut dt =
            DelaunayTriangulation::new(Point::new(0.0, 1.0), Point::new(1.0, 0.0)).unwrap();
        let report = dt.insert(Point::new(0.25, 0.5)).unwrap();
        assert_eq!(report.outcome, InsertionOutcome::SplitTriangle);
        assert!(matches!(
            dt.locate(&Point::new(0.25, 0.5)),
            Ok(Location::OnVertex { .. })
        ));
        assert!(validate_topology(dt.tds()).is_ok());
        assert_eq!(convex_hull(&dt.vertices()).len(), 4);
    }
}
