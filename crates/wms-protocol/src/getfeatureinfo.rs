//! WMS GetFeatureInfo handling
//!
//! Builds OGC WMS 1.3.0 GetFeatureInfo query strings and reads the
//! properties of the returned features.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stookwijzer_common::{BoundingBox, CrsCode, StookwijzerError, StookwijzerResult};

/// The only response format the feature parser understands.
pub const INFO_FORMAT_JSON: &str = "application/json";

/// GetFeatureInfo request parameters
#[derive(Debug, Clone)]
pub struct GetFeatureInfoRequest {
    /// Layers to display (same as GetMap)
    pub layers: Vec<String>,
    /// Layers to query for information
    pub query_layers: Vec<String>,
    /// Coordinate reference system of the bbox
    pub crs: CrsCode,
    /// Bounding box of the virtual map
    pub bbox: BoundingBox,
    /// Map width in pixels
    pub width: u32,
    /// Map height in pixels
    pub height: u32,
    /// Pixel column (X coordinate, 0-based from left)
    pub i: u32,
    /// Pixel row (Y coordinate, 0-based from top)
    pub j: u32,
    /// Maximum number of features to return
    pub feature_count: Option<u32>,
    /// Image format of the virtual map
    pub format: String,
    /// Extra pixels around the query point the server may search
    pub buffer: Option<u32>,
    /// Vendor `servicekey` parameter
    pub service_key: Option<String>,
}

impl GetFeatureInfoRequest {
    /// A single-feature JSON query for `layer` over `bbox`.
    ///
    /// The pixel and map dimensions match what the RIVM viewer sends; the
    /// server answers for the feature under the box either way.
    pub fn for_layer(layer: impl Into<String>, bbox: BoundingBox) -> Self {
        let layer = layer.into();
        Self {
            layers: vec![layer.clone()],
            query_layers: vec![layer],
            crs: CrsCode::Epsg28992,
            bbox,
            width: 256,
            height: 256,
            i: 139,
            j: 222,
            feature_count: Some(1),
            format: "image/png".to_string(),
            buffer: Some(1),
            service_key: None,
        }
    }

    pub fn with_service_key(mut self, key: impl Into<String>) -> Self {
        self.service_key = Some(key.into());
        self
    }

    /// Key/value pairs for the request query string, in a stable order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("SERVICE", "WMS".to_string()),
            ("VERSION", "1.3.0".to_string()),
            ("REQUEST", "GetFeatureInfo".to_string()),
            ("FORMAT", self.format.clone()),
            ("TRANSPARENT", "true".to_string()),
            ("QUERY_LAYERS", self.query_layers.join(",")),
            ("LAYERS", self.layers.join(",")),
            ("STYLES", String::new()),
        ];

        if let Some(ref key) = self.service_key {
            pairs.push(("servicekey", key.clone()));
        }
        if let Some(buffer) = self.buffer {
            pairs.push(("BUFFER", buffer.to_string()));
        }

        pairs.push(("EXCEPTIONS", "INIMAGE".to_string()));
        pairs.push(("INFO_FORMAT", INFO_FORMAT_JSON.to_string()));
        if let Some(count) = self.feature_count {
            pairs.push(("FEATURE_COUNT", count.to_string()));
        }
        pairs.push(("I", self.i.to_string()));
        pairs.push(("J", self.j.to_string()));
        pairs.push(("WIDTH", self.width.to_string()));
        pairs.push(("HEIGHT", self.height.to_string()));
        pairs.push(("CRS", self.crs.to_string()));
        pairs.push(("BBOX", self.bbox.to_wms_string()));

        pairs
    }
}

/// GetFeatureInfo JSON response: a GeoJSON FeatureCollection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

/// A single feature; only its properties are of interest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl FeatureCollection {
    /// Parse a raw response body.
    ///
    /// Anything that is not a JSON object with a `features` array is a
    /// malformed response. An empty `features` array is not.
    pub fn from_slice(body: &[u8]) -> StookwijzerResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Properties of the first feature, or an empty set when there is none.
    pub fn into_properties(self) -> FeatureProperties {
        self.features
            .into_iter()
            .next()
            .map(|feature| FeatureProperties::new(feature.properties))
            .unwrap_or_default()
    }
}

/// Property bag of one feature, with lenient typed accessors.
///
/// The feature service is inconsistent about types (`"3.4"` vs `3.4`,
/// `"True"` vs `true`), so every accessor accepts both spellings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureProperties {
    values: Map<String, Value>,
}

impl FeatureProperties {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value of a property. `null` counts as absent.
    pub fn get(&self, name: &str) -> StookwijzerResult<&Value> {
        match self.values.get(name) {
            Some(Value::Null) | None => Err(StookwijzerError::PropertyUnavailable(name.to_string())),
            Some(value) => Ok(value),
        }
    }

    /// Property rendered as text.
    pub fn text(&self, name: &str) -> StookwijzerResult<String> {
        match self.get(name)? {
            Value::String(s) => Ok(s.clone()),
            other => Ok(other.to_string()),
        }
    }

    /// Property as a floating point number.
    pub fn number(&self, name: &str) -> StookwijzerResult<f64> {
        let value = self.get(name)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| not_a(name, "number", value))
    }

    /// Property as an integer. Integral floats ("3.0") are accepted.
    pub fn integer(&self, name: &str) -> StookwijzerResult<i64> {
        let value = self.get(name)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            _ => None,
        };
        parsed.ok_or_else(|| not_a(name, "integer", value))
    }

    /// Property as a boolean flag.
    pub fn flag(&self, name: &str) -> StookwijzerResult<bool> {
        let value = self.get(name)?;
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(true),
                Some(0) => Some(false),
                _ => None,
            },
            Value::String(s) => match s.trim() {
                "True" | "true" | "1" => Some(true),
                "False" | "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed.ok_or_else(|| not_a(name, "flag", value))
    }
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

fn not_a(name: &str, what: &str, value: &Value) -> StookwijzerError {
    StookwijzerError::MalformedResponse(format!(
        "property {} is not a {}: {}",
        name, what, value
    ))
}
