//! Geometry shared by image space and viewport space
//!
//! The same types describe both coordinate systems; which one a value lives in is
//! decided by the code that produced it (see [`crate::layer::projection`]).

pub mod selector;
pub mod types;

pub use selector::{Selector, ShapeKind};
pub use types::{Bounds, Point};
