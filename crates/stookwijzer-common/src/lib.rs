//! Common types shared across the stookwijzer crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod point;
pub mod time;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use error::{StookwijzerError, StookwijzerResult};
pub use point::{GeoPoint, ProjectedPoint};
pub use time::ModelRuntime;
