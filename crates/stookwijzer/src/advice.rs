//! Advice codes and the policies that produce them.
//!
//! Two policies exist and they do not agree for every input:
//! - [`RemoteAdviceCode`] trusts the advice the feature service already
//!   computed (`advies_<hour>`).
//! - [`LocalClassifier`] recomputes it from wind speed and LKI with
//!   [`classify`].

use serde::{Deserialize, Serialize};
use std::fmt;

use stookwijzer_common::StookwijzerResult;
use wms_protocol::FeatureProperties;

/// Wind speed (m/s) at or below which smoke does not disperse.
pub const CALM_WIND_MS: f64 = 2.0;
/// LKI above which burning is discouraged.
pub const LKI_ORANGE: i64 = 4;
/// LKI above which burning is strongly discouraged.
pub const LKI_RED: i64 = 7;

/// The advisory level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AdviceCode {
    #[serde(rename = "code_yellow")]
    Yellow,
    #[serde(rename = "code_orange")]
    Orange,
    #[serde(rename = "code_red")]
    Red,
    #[serde(rename = "unknown")]
    #[default]
    Unknown,
}

impl AdviceCode {
    /// Map the feature service's precomputed code.
    pub fn from_remote_code(code: &str) -> Self {
        match code.trim() {
            "0" => AdviceCode::Yellow,
            "1" => AdviceCode::Orange,
            "2" => AdviceCode::Red,
            _ => AdviceCode::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceCode::Yellow => "code_yellow",
            AdviceCode::Orange => "code_orange",
            AdviceCode::Red => "code_red",
            AdviceCode::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AdviceCode::Unknown)
    }
}

impl fmt::Display for AdviceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide the advice from wind speed and air quality.
///
/// First match wins:
/// 1. any input missing (or a non-finite wind speed) → `Unknown`
/// 2. wind ≤ 2.0 m/s or LKI > 7 → `Red`
/// 3. LKI > 4 → `Orange`
/// 4. otherwise → `Yellow`
pub fn classify(windspeed_ms: Option<f64>, air_quality_index: Option<i64>) -> AdviceCode {
    let (wind, lki) = match (windspeed_ms, air_quality_index) {
        (Some(wind), Some(lki)) if wind.is_finite() => (wind, lki),
        _ => return AdviceCode::Unknown,
    };

    if wind <= CALM_WIND_MS || lki > LKI_RED {
        AdviceCode::Red
    } else if lki > LKI_ORANGE {
        AdviceCode::Orange
    } else {
        AdviceCode::Yellow
    }
}

/// Produces the advice for one point of the forecast horizon.
///
/// Offset 0 is the current reading. A property that cannot be read is
/// returned as an error so the caller can report it.
pub trait AdvicePolicy: Send + Sync {
    fn advice_at(&self, properties: &FeatureProperties, offset_hours: u32)
        -> StookwijzerResult<AdviceCode>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Reads the service's own verdict from `advies_<offset>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteAdviceCode;

impl AdvicePolicy for RemoteAdviceCode {
    fn advice_at(
        &self,
        properties: &FeatureProperties,
        offset_hours: u32,
    ) -> StookwijzerResult<AdviceCode> {
        let code = properties.text(&format!("advies_{}", offset_hours))?;
        Ok(AdviceCode::from_remote_code(&code))
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Classifies locally from `wind`/`lki` (offset 0) or
/// `wind_<offset>`/`lki_<offset>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClassifier;

impl LocalClassifier {
    fn key(base: &str, offset_hours: u32) -> String {
        if offset_hours == 0 {
            base.to_string()
        } else {
            format!("{}_{}", base, offset_hours)
        }
    }
}

impl AdvicePolicy for LocalClassifier {
    fn advice_at(
        &self,
        properties: &FeatureProperties,
        offset_hours: u32,
    ) -> StookwijzerResult<AdviceCode> {
        let wind = properties.number(&Self::key("wind", offset_hours))?;
        let lki = properties.integer(&Self::key("lki", offset_hours))?;
        Ok(classify(Some(wind), Some(lki)))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Policy selection for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdvicePolicyKind {
    #[default]
    Remote,
    Local,
}

impl AdvicePolicyKind {
    pub fn build(&self) -> Box<dyn AdvicePolicy> {
        match self {
            AdvicePolicyKind::Remote => Box::new(RemoteAdviceCode),
            AdvicePolicyKind::Local => Box::new(LocalClassifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use stookwijzer_common::StookwijzerError;

    fn properties(value: Value) -> FeatureProperties {
        match value {
            Value::Object(map) => FeatureProperties::new(map),
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(Some(2.0), Some(1)), AdviceCode::Red);
        assert_eq!(classify(Some(2.01), Some(4)), AdviceCode::Yellow);
        assert_eq!(classify(Some(2.01), Some(5)), AdviceCode::Orange);
        assert_eq!(classify(Some(2.01), Some(7)), AdviceCode::Orange);
        assert_eq!(classify(Some(2.01), Some(8)), AdviceCode::Red);
        assert_eq!(classify(Some(12.0), Some(0)), AdviceCode::Yellow);
    }

    #[test]
    fn test_classify_missing_input_is_unknown() {
        assert_eq!(classify(Some(3.0), None), AdviceCode::Unknown);
        // Calm wind would be Red, but a missing LKI wins.
        assert_eq!(classify(Some(1.0), None), AdviceCode::Unknown);
        assert_eq!(classify(None, Some(9)), AdviceCode::Unknown);
        assert_eq!(classify(Some(f64::NAN), Some(2)), AdviceCode::Unknown);
    }

    #[test]
    fn test_remote_codes() {
        assert_eq!(AdviceCode::from_remote_code("0"), AdviceCode::Yellow);
        assert_eq!(AdviceCode::from_remote_code("1"), AdviceCode::Orange);
        assert_eq!(AdviceCode::from_remote_code("2"), AdviceCode::Red);
        assert_eq!(AdviceCode::from_remote_code("3"), AdviceCode::Unknown);
        assert_eq!(AdviceCode::from_remote_code(""), AdviceCode::Unknown);
    }

    #[test]
    fn test_policies_disagree() {
        // The service says yellow, but the wind is calm.
        let props = properties(json!({"advies_0": "0", "wind": "1.5", "lki": "3"}));
        assert_eq!(RemoteAdviceCode.advice_at(&props, 0), Ok(AdviceCode::Yellow));
        assert_eq!(LocalClassifier.advice_at(&props, 0), Ok(AdviceCode::Red));
    }

    #[test]
    fn test_unreadable_inputs_are_errors() {
        let props = properties(json!({"advies_0": "7", "wind": "3.0", "lki": "n/a"}));

        assert_eq!(RemoteAdviceCode.advice_at(&props, 0), Ok(AdviceCode::Unknown));
        assert_eq!(
            RemoteAdviceCode.advice_at(&props, 6),
            Err(StookwijzerError::PropertyUnavailable("advies_6".to_string()))
        );
        assert!(matches!(
            LocalClassifier.advice_at(&props, 0),
            Err(StookwijzerError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_local_classifier_offsets() {
        let props = properties(json!({
            "wind": 5.0, "lki": 2,
            "wind_6": "4.2", "lki_6": "6"
        }));
        assert_eq!(LocalClassifier.advice_at(&props, 0), Ok(AdviceCode::Yellow));
        assert_eq!(LocalClassifier.advice_at(&props, 6), Ok(AdviceCode::Orange));
        assert_eq!(
            LocalClassifier.advice_at(&props, 12),
            Err(StookwijzerError::PropertyUnavailable("wind_12".to_string()))
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&AdviceCode::Orange).unwrap(), "\"code_orange\"");
        assert_eq!(AdviceCode::Red.to_string(), "code_red");
        let kind: AdvicePolicyKind = serde_json::from_str("\"local\"").unwrap();
        assert_eq!(kind.build().name(), "local");
    }
}
