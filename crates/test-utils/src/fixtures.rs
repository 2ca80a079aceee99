//! Canned responses of the RIVM feature service and the coordinate
//! transformation service.

/// A full `stookwijzer_v2` feature at a six-hourly horizon.
///
/// Current advice is orange (`advies_0 = 1`) with 2.46 m/s wind and LKI 5.
pub const ADVISORY_SIX_HOURLY: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": "stookwijzer_v2.1234",
      "geometry": null,
      "properties": {
        "model_runtime": "01-01-2024 00:00",
        "advies_0": "1", "definitief_0": "True", "alert_0": "0",
        "advies_6": "0", "definitief_6": "True", "alert_6": "0",
        "advies_12": "2", "definitief_12": "False", "alert_12": "1",
        "advies_18": "2", "definitief_18": "False", "alert_18": "1",
        "wind": "2.46",
        "wind_bft": "2",
        "lki": "5",
        "pc4": "7411"
      }
    }
  ]
}"#;

/// A feature of the two-hourly layer: `advies_2` .. `advies_24`, numeric
/// values, and no `wind_bft`.
pub const ADVISORY_HOURLY_PAIRS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {
        "model_runtime": "15-03-2024 12:00",
        "advies_0": 0, "alert_0": false,
        "advies_2": 0, "definitief_2": true,
        "advies_4": 0, "definitief_4": true,
        "advies_6": 1, "definitief_6": true,
        "advies_8": 1, "definitief_8": true,
        "advies_10": 1, "definitief_10": false,
        "advies_12": 2, "definitief_12": false,
        "advies_14": 2, "definitief_14": false,
        "advies_16": 2, "definitief_16": false,
        "advies_18": 1, "definitief_18": false,
        "advies_20": 1, "definitief_20": false,
        "advies_22": 0, "definitief_22": false,
        "advies_24": 0, "definitief_24": false,
        "wind": 6.04,
        "lki": 2
      }
    }
  ]
}"#;

/// A location outside the service's coverage.
pub const EMPTY_FEATURES: &str = r#"{"type": "FeatureCollection", "features": []}"#;

/// Valid JSON without a `features` array.
pub const NO_FEATURES_KEY: &str = r#"{"type": "FeatureCollection", "totalFeatures": 0}"#;

/// Not JSON at all, as returned by a misconfigured proxy.
pub const NOT_JSON: &str = "<html><body>Service Unavailable</body></html>";

/// Coordinate transformation result for (52.123456, 6.123456).
pub const TRANSFORM_RESULT: &str =
    r#"{"results": [{"x": 205419.8616495907, "y": 459726.8885157041, "z": 0}]}"#;

/// RD coordinates matching [`TRANSFORM_RESULT`].
pub const TRANSFORM_POINT: (f64, f64) = (205419.8616495907, 459726.8885157041);
