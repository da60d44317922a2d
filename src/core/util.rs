//! General helper utilities.

pub mod delaunay_validation;

pub use delaunay_validation::{
    find_delaunay_violations, validate_delaunay, validate_empty_circumcircles, validate_topology,
};
