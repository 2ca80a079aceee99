//! OGC WMS protocol pieces needed to query a feature service.
//!
//! Supports the WMS 1.3.0 GetFeatureInfo operation with a JSON
//! (GeoJSON FeatureCollection) response.

pub mod getfeatureinfo;

pub use getfeatureinfo::{
    Feature, FeatureCollection, FeatureProperties, GetFeatureInfoRequest, INFO_FORMAT_JSON,
};
