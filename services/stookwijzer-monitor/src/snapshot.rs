//! Serializable view of the client state after an update.

use chrono::{DateTime, Utc};
use serde::Serialize;
use stookwijzer::{AdviceCode, ForecastSample, Stookwijzer};

#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub advice: AdviceCode,
    pub alert: Option<bool>,
    pub windspeed_bft: Option<u8>,
    pub windspeed_ms: Option<f64>,
    pub air_quality_index: Option<i64>,
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<ForecastSample>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Snapshot {
    pub fn from_client(client: &Stookwijzer) -> Self {
        Self {
            advice: client.advice_code(),
            alert: client.alert(),
            windspeed_bft: client.windspeed_bft(),
            windspeed_ms: client.windspeed_ms(),
            air_quality_index: client.air_quality_index(),
            last_updated: client.last_updated(),
            forecast: client.forecast().map(<[ForecastSample]>::to_vec),
            error: client.last_error().map(ToString::to_string),
        }
    }
}
