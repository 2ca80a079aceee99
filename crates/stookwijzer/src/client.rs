//! The per-location advisory client.

use std::time::Duration;

use chrono::{DateTime, Utc};
use stookwijzer_common::{BoundingBox, GeoPoint, ProjectedPoint, StookwijzerError, StookwijzerResult};
use tracing::{debug, info, instrument};
use wms_protocol::FeatureProperties;

use crate::advice::{AdviceCode, AdvicePolicy};
use crate::config::{ClientConfig, DEFAULT_TIMEOUT_SECS};
use crate::forecast::{ForecastConfig, ForecastSample};
use crate::reading::AdvisoryReading;
use crate::report::{Reporter, TracingReporter};
use crate::source::{FeatureSource, HttpFeatureSource};

/// Advisory client for one monitored location.
///
/// Holds the last reading and forecast; both are rebuilt from scratch by
/// every [`update`](Self::update).
pub struct Stookwijzer {
    bbox: BoundingBox,
    source: Box<dyn FeatureSource>,
    policy: Box<dyn AdvicePolicy>,
    forecast_config: ForecastConfig,
    reporter: Box<dyn Reporter>,
    timeout: Duration,
    reading: AdvisoryReading,
    forecast: Option<Vec<ForecastSample>>,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<StookwijzerError>,
}

impl Stookwijzer {
    pub fn new(
        source: Box<dyn FeatureSource>,
        policy: Box<dyn AdvicePolicy>,
        location: ProjectedPoint,
    ) -> Self {
        Self {
            bbox: BoundingBox::around(location),
            source,
            policy,
            forecast_config: ForecastConfig::default(),
            reporter: Box::new(TracingReporter),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            reading: AdvisoryReading::unknown(),
            forecast: None,
            last_updated: None,
            last_error: None,
        }
    }

    /// Build a client from configuration: project the location with the
    /// configured coordinate source, then query the configured endpoint.
    pub async fn for_location(config: &ClientConfig, location: GeoPoint) -> StookwijzerResult<Self> {
        config.validate()?;

        let provider = config.coordinate_source.build(config)?;
        let projected = provider.transform(location).await?;
        info!(
            latitude = location.latitude,
            longitude = location.longitude,
            x = projected.x,
            y = projected.y,
            provider = provider.name(),
            "Resolved location"
        );

        let source = HttpFeatureSource::from_config(config)?;

        Ok(
            Self::new(Box::new(source), config.advice_policy.build(), projected)
                .with_forecast(config.forecast_config()?)
                .with_timeout(config.timeout()),
        )
    }

    pub fn with_forecast(mut self, forecast_config: ForecastConfig) -> Self {
        self.forecast_config = forecast_config;
        self
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Upper bound on one fetch, whatever the source.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch and classify once.
    ///
    /// Never fails: a lost response is reported, leaves an all-unknown
    /// reading without a forecast, and keeps `last_updated` as it was.
    /// Dropping the returned future abandons the request without touching
    /// any state.
    #[instrument(skip(self), fields(bbox = %self.bbox.to_wms_string(), policy = self.policy.name()))]
    pub async fn update(&mut self) -> &AdvisoryReading {
        let fetched = match tokio::time::timeout(self.timeout, self.source.fetch(&self.bbox)).await {
            Ok(result) => result,
            Err(_) => Err(StookwijzerError::Timeout(format!(
                "no response within {:?}",
                self.timeout
            ))),
        };

        match fetched {
            Ok(collection) => self.apply(collection.into_properties(), Utc::now()),
            Err(err) => self.fail(err),
        }

        &self.reading
    }

    fn apply(&mut self, properties: FeatureProperties, now: DateTime<Utc>) {
        if properties.is_empty() {
            debug!("No feature at this location");
        }

        let reading = AdvisoryReading::from_properties(
            &properties,
            self.policy.as_ref(),
            self.reporter.as_ref(),
            now,
        );

        let forecast = match self.forecast_config.project(
            &properties,
            self.policy.as_ref(),
            self.reporter.as_ref(),
        ) {
            Ok(forecast) => forecast,
            Err(err) => {
                self.reporter.report(&err);
                None
            }
        };

        if reading.advice_code.is_known() {
            self.last_updated = Some(now);
        }

        info!(
            advice = %reading.advice_code,
            windspeed_ms = ?reading.windspeed_ms,
            lki = ?reading.air_quality_index,
            forecast_samples = forecast.as_ref().map_or(0, Vec::len),
            "Stookwijzer updated"
        );

        self.reading = reading;
        self.forecast = forecast;
        self.last_error = None;
    }

    fn fail(&mut self, err: StookwijzerError) {
        debug!(kind = err.kind(), "Update failed, advice is unknown");
        self.reporter.report(&err);
        self.reading = AdvisoryReading::unknown();
        self.forecast = None;
        self.last_error = Some(err);
    }

    pub fn reading(&self) -> &AdvisoryReading {
        &self.reading
    }

    pub fn advice_code(&self) -> AdviceCode {
        self.reading.advice_code
    }

    pub fn alert(&self) -> Option<bool> {
        self.reading.alert
    }

    pub fn windspeed_bft(&self) -> Option<u8> {
        self.reading.windspeed_bft
    }

    pub fn windspeed_ms(&self) -> Option<f64> {
        self.reading.windspeed_ms
    }

    pub fn air_quality_index(&self) -> Option<i64> {
        self.reading.air_quality_index
    }

    /// Time of the last update that produced a known advice.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn forecast(&self) -> Option<&[ForecastSample]> {
        self.forecast.as_deref()
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// The failure of the most recent update, if it failed.
    pub fn last_error(&self) -> Option<&StookwijzerError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{LocalClassifier, RemoteAdviceCode};
    use crate::report::MemoryReporter;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use wms_protocol::FeatureCollection;

    /// Replays canned responses, one per fetch.
    struct ScriptedSource {
        responses: Mutex<VecDeque<StookwijzerResult<FeatureCollection>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<StookwijzerResult<FeatureCollection>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl FeatureSource for ScriptedSource {
        async fn fetch(&self, _bbox: &BoundingBox) -> StookwijzerResult<FeatureCollection> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(StookwijzerError::Network("script exhausted".into())))
        }
    }

    /// Never answers.
    struct StalledSource;

    #[async_trait]
    impl FeatureSource for StalledSource {
        async fn fetch(&self, _bbox: &BoundingBox) -> StookwijzerResult<FeatureCollection> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(FeatureCollection::default())
        }
    }

    /// Answers the first fetch, then never again.
    struct StallsAfterFirst {
        answered: AtomicBool,
    }

    #[async_trait]
    impl FeatureSource for StallsAfterFirst {
        async fn fetch(&self, _bbox: &BoundingBox) -> StookwijzerResult<FeatureCollection> {
            if !self.answered.swap(true, Ordering::SeqCst) {
                return Ok(sample_collection());
            }
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(FeatureCollection::default())
        }
    }

    fn collection(value: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(value).unwrap()
    }

    fn sample_collection() -> FeatureCollection {
        collection(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "model_runtime": "01-01-2024 00:00",
                    "advies_0": "1", "definitief_0": "True", "alert_0": "0",
                    "advies_6": "0", "definitief_6": "True",
                    "advies_12": "2", "definitief_12": "False",
                    "advies_18": "2", "definitief_18": "False",
                    "wind": "2.46", "wind_bft": "2", "lki": "5"
                }
            }]
        }))
    }

    fn client(source: impl FeatureSource + 'static, reporter: &MemoryReporter) -> Stookwijzer {
        Stookwijzer::new(
            Box::new(source),
            Box::new(RemoteAdviceCode),
            ProjectedPoint::new(205419.86, 459726.88),
        )
        .with_reporter(reporter.clone())
    }

    #[tokio::test]
    async fn test_successful_update() {
        let reporter = MemoryReporter::new();
        let mut sw = client(ScriptedSource::new(vec![Ok(sample_collection())]), &reporter);

        assert_eq!(sw.advice_code(), AdviceCode::Unknown);
        assert!(sw.last_updated().is_none());

        sw.update().await;

        assert_eq!(sw.advice_code(), AdviceCode::Orange);
        assert_eq!(sw.alert(), Some(false));
        assert_eq!(sw.windspeed_ms(), Some(2.5));
        assert_eq!(sw.windspeed_bft(), Some(2));
        assert_eq!(sw.air_quality_index(), Some(5));
        assert!(sw.last_updated().is_some());
        assert!(sw.last_error().is_none());
        assert_eq!(sw.forecast().map(<[_]>::len), Some(4));
        assert!(reporter.errors().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_last_updated() {
        let reporter = MemoryReporter::new();
        let mut sw = client(
            ScriptedSource::new(vec![
                Ok(sample_collection()),
                Err(StookwijzerError::Network("connection refused".into())),
            ]),
            &reporter,
        );

        sw.update().await;
        let first = sw.last_updated();
        assert!(first.is_some());

        let reading = sw.update().await.clone();
        assert_eq!(reading, AdvisoryReading::unknown());
        assert_eq!(sw.last_updated(), first);
        assert!(sw.forecast().is_none());
        assert!(matches!(sw.last_error(), Some(StookwijzerError::Network(_))));
        assert_eq!(reporter.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_stalled_source_times_out() {
        let reporter = MemoryReporter::new();
        let mut sw = client(StalledSource, &reporter).with_timeout(Duration::from_millis(20));

        sw.update().await;

        assert_eq!(sw.advice_code(), AdviceCode::Unknown);
        assert!(sw.last_updated().is_none());
        assert!(matches!(sw.last_error(), Some(StookwijzerError::Timeout(_))));
        assert_eq!(reporter.errors()[0].kind(), "timeout");
    }

    #[tokio::test]
    async fn test_timeout_after_success_keeps_last_updated() {
        let reporter = MemoryReporter::new();
        let mut sw = client(
            StallsAfterFirst {
                answered: AtomicBool::new(false),
            },
            &reporter,
        )
        .with_timeout(Duration::from_millis(20));

        sw.update().await;
        let first = sw.last_updated();
        assert!(first.is_some());
        assert_eq!(sw.advice_code(), AdviceCode::Orange);

        sw.update().await;

        assert_eq!(sw.last_updated(), first);
        assert_eq!(sw.reading(), &AdvisoryReading::unknown());
        assert!(sw.forecast().is_none());
        assert!(matches!(sw.last_error(), Some(StookwijzerError::Timeout(_))));
        assert_eq!(reporter.errors().len(), 1);
        assert_eq!(reporter.errors()[0].kind(), "timeout");
    }

    #[tokio::test]
    async fn test_empty_features_is_unknown_without_failure() {
        let reporter = MemoryReporter::new();
        let mut sw = client(
            ScriptedSource::new(vec![Ok(collection(json!({"features": []})))]),
            &reporter,
        );

        sw.update().await;

        assert_eq!(sw.advice_code(), AdviceCode::Unknown);
        assert!(sw.last_updated().is_none());
        assert!(sw.last_error().is_none());
        assert!(sw.forecast().is_none());
        assert!(reporter
            .errors()
            .iter()
            .all(|e| matches!(e, StookwijzerError::PropertyUnavailable(_))));
    }

    #[tokio::test]
    async fn test_local_policy_and_custom_forecast() {
        let reporter = MemoryReporter::new();
        let mut sw = Stookwijzer::new(
            Box::new(ScriptedSource::new(vec![Ok(sample_collection())])),
            Box::new(LocalClassifier),
            ProjectedPoint::new(155000.0, 463000.0),
        )
        .with_reporter(reporter.clone())
        .with_forecast(ForecastConfig::default().with_offsets(vec![0, 6]));

        sw.update().await;

        // wind 2.46 m/s, LKI 5 → Orange either way, but offset 6 has no wind_6.
        assert_eq!(sw.advice_code(), AdviceCode::Orange);
        let forecast = sw.forecast().unwrap();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].advice_code, AdviceCode::Orange);
        assert_eq!(forecast[1].advice_code, AdviceCode::Unknown);
        assert_eq!(sw.bounding_box().max_x, 155010.0);
    }

    #[tokio::test]
    async fn test_bad_runtime_reported_but_reading_kept() {
        let reporter = MemoryReporter::new();
        let mut sw = client(
            ScriptedSource::new(vec![Ok(collection(json!({
                "features": [{"properties": {
                    "advies_0": "2", "wind": 1.0, "wind_bft": 1, "lki": 3,
                    "model_runtime": "not a date"
                }}]
            })))]),
            &reporter,
        );

        sw.update().await;

        assert_eq!(sw.advice_code(), AdviceCode::Red);
        assert!(sw.forecast().is_none());
        assert!(sw.last_updated().is_some());
        assert_eq!(reporter.errors()[0].kind(), "malformed_response");
    }
}
