//! The advisory reading derived from one feature response.

use chrono::{DateTime, Utc};
use serde::Serialize;
use stookwijzer_common::StookwijzerError;
use wms_protocol::FeatureProperties;

use crate::advice::{AdviceCode, AdvicePolicy};
use crate::report::{reported, Reporter};
use crate::wind::{beaufort_from_ms, round_one_decimal, MAX_BEAUFORT};

/// Latest advisory for a location. Replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdvisoryReading {
    pub advice_code: AdviceCode,
    pub alert: Option<bool>,
    pub windspeed_bft: Option<u8>,
    pub windspeed_ms: Option<f64>,
    pub air_quality_index: Option<i64>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl AdvisoryReading {
    /// The reading used after a lost response: everything unknown.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Derive a reading from the properties of the first feature.
    ///
    /// Each field is read independently; a field that cannot be read is
    /// reported and left `None`.
    pub fn from_properties(
        properties: &FeatureProperties,
        policy: &dyn AdvicePolicy,
        reporter: &dyn Reporter,
        observed_at: DateTime<Utc>,
    ) -> Self {
        let advice_code = reported(policy.advice_at(properties, 0), reporter).unwrap_or_default();

        let raw_wind = reported(properties.number("wind"), reporter);
        let windspeed_bft = match reported(properties.integer("wind_bft"), reporter) {
            Some(bft) => match u8::try_from(bft).ok().filter(|&b| b <= MAX_BEAUFORT) {
                Some(bft) => Some(bft),
                None => {
                    reporter.report(&StookwijzerError::MalformedResponse(format!(
                        "wind_bft out of range: {}",
                        bft
                    )));
                    raw_wind.map(beaufort_from_ms)
                }
            },
            None => raw_wind.map(beaufort_from_ms),
        };
        let air_quality_index = reported(properties.integer("lki"), reporter);
        let alert = properties.flag("alert_0").ok();

        Self {
            advice_code,
            alert,
            windspeed_bft,
            windspeed_ms: raw_wind.map(round_one_decimal),
            air_quality_index,
            observed_at: Some(observed_at),
        }
    }
}
