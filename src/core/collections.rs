//! Collection types used throughout the triangulation.
//!
//! Hash-based collections use `rustc_hash::FxHasher`, short scratch lists use
//! `smallvec`, and the rib/triangle arenas are `slotmap` maps.

mod aliases;
pub mod spatial_cache;

pub use aliases::*;
pub use spatial_cache::SpatialCache;
