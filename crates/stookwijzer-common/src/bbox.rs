//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::ProjectedPoint;

/// Edge length of the query box placed at a monitored location, in RD meters.
pub const QUERY_BOX_SIZE: f64 = 10.0;

/// A projected bounding box in RD (EPSG:28992) meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// The feature-service query box for a location: the point itself as the
    /// lower-left corner, extended by [`QUERY_BOX_SIZE`] along both axes.
    pub fn around(point: ProjectedPoint) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x + QUERY_BOX_SIZE,
            max_y: point.y + QUERY_BOX_SIZE,
        }
    }

    /// Parse a WMS BBOX parameter string: "minx,miny,maxx,maxy"
    pub fn from_wms_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))
        };

        Ok(Self {
            min_x: parse(parts[0])?,
            min_y: parse(parts[1])?,
            max_x: parse(parts[2])?,
            max_y: parse(parts[3])?,
        })
    }

    /// Render as a WMS BBOX parameter value.
    pub fn to_wms_string(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_offsets_both_axes() {
        let bbox = BoundingBox::around(ProjectedPoint::new(205419.86, 459726.88));
        assert_eq!(bbox.min_x, 205419.86);
        assert_eq!(bbox.min_y, 459726.88);
        assert_eq!(bbox.max_x, 205419.86 + 10.0);
        assert_eq!(bbox.max_y, 459726.88 + 10.0);
    }

    #[test]
    fn test_wms_string_roundtrip() {
        let bbox = BoundingBox::around(ProjectedPoint::new(155000.0, 463000.0));
        assert_eq!(bbox.to_wms_string(), "155000,463000,155010,463010");

        let parsed = BoundingBox::from_wms_string("155000,463000,155010,463010").unwrap();
        assert_eq!(parsed, bbox);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            BoundingBox::from_wms_string("1,2,3"),
            Err(BboxParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            BoundingBox::from_wms_string("1,2,x,4"),
            Err(BboxParseError::InvalidNumber(_))
        ));
    }
}
