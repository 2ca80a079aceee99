//! Coordinate transformations into the Dutch national grid.
//!
//! Pure functions only; nothing here touches the network.

pub mod rd;

pub use rd::{wgs84_to_rd, RdNew};
