//! Forecast projection over the model run's hour offsets.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use stookwijzer_common::time::{ModelRuntime, RUNTIME_FORMAT};
use stookwijzer_common::{StookwijzerError, StookwijzerResult};
use wms_protocol::FeatureProperties;

use crate::advice::{AdviceCode, AdvicePolicy};
use crate::report::{reported, Reporter};

/// Property holding the model run time the forecast is relative to.
pub const RUNTIME_PROPERTY: &str = "model_runtime";

/// One point on the forecast horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSample {
    #[serde(rename = "datetime")]
    pub at: DateTime<Tz>,
    #[serde(rename = "advice")]
    pub advice_code: AdviceCode,
    pub alert: Option<bool>,
    #[serde(rename = "final")]
    pub is_final: Option<bool>,
}

/// Which offsets to project and how to read the runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Hours after the model run, in output order.
    pub offsets: Vec<u32>,
    pub timezone: Tz,
    pub runtime_format: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            offsets: vec![0, 6, 12, 18],
            timezone: chrono_tz::Europe::Amsterdam,
            runtime_format: RUNTIME_FORMAT.to_string(),
        }
    }
}

impl ForecastConfig {
    /// Two-hourly horizon of the newer feature layer: 2, 4, ..., 24.
    pub fn hourly_pairs() -> Self {
        Self {
            offsets: (1..=12).map(|i| i * 2).collect(),
            ..Self::default()
        }
    }

    pub fn with_offsets(mut self, offsets: Vec<u32>) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Build the forecast from one feature's properties.
    ///
    /// Returns `Ok(None)` when the properties carry no model runtime. An
    /// offset whose advice cannot be read is reported and left `Unknown`.
    pub fn project(
        &self,
        properties: &FeatureProperties,
        policy: &dyn AdvicePolicy,
        reporter: &dyn Reporter,
    ) -> StookwijzerResult<Option<Vec<ForecastSample>>> {
        let raw = match properties.text(RUNTIME_PROPERTY) {
            Ok(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(None),
        };

        let runtime = ModelRuntime::parse(&raw, &self.runtime_format, self.timezone)
            .map_err(|e| StookwijzerError::MalformedResponse(e.to_string()))?;

        let samples = self
            .offsets
            .iter()
            .map(|&offset| ForecastSample {
                at: runtime.valid_datetime(offset),
                advice_code: reported(policy.advice_at(properties, offset), reporter)
                    .unwrap_or_default(),
                alert: properties.flag(&format!("alert_{}", offset)).ok(),
                is_final: properties.flag(&format!("definitief_{}", offset)).ok(),
            })
            .collect();

        Ok(Some(samples))
    }
}
