//! Coordinate providers: WGS84 in, RD New out.

use std::time::Duration;

use async_trait::async_trait;
use projection::RdNew;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use stookwijzer_common::{CrsCode, GeoPoint, ProjectedPoint, StookwijzerError, StookwijzerResult};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::http;

/// Converts a WGS84 location into the RD grid.
#[async_trait]
pub trait CoordinateProvider: Send + Sync {
    async fn transform(&self, point: GeoPoint) -> StookwijzerResult<ProjectedPoint>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Local polynomial approximation. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RdPolynomial;

#[async_trait]
impl CoordinateProvider for RdPolynomial {
    async fn transform(&self, point: GeoPoint) -> StookwijzerResult<ProjectedPoint> {
        Ok(RdNew.project(point))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// A remote coordinate transformation service.
///
/// Requests `{base}/{lon},{lat}.json?s_srs=4326&t_srs=28992` and expects
/// `{"results":[{"x":..,"y":..}]}`.
pub struct RemoteTransform {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransformResponse {
    results: Vec<TransformResult>,
}

#[derive(Debug, Deserialize)]
struct TransformResult {
    x: f64,
    y: f64,
}

impl RemoteTransform {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        verify_tls: bool,
    ) -> StookwijzerResult<Self> {
        Ok(Self {
            client: http::build_client(timeout, verify_tls)?,
            base_url: base_url.into(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn request_url(&self, point: GeoPoint) -> StookwijzerResult<Url> {
        let base = format!(
            "{}/{},{}.json",
            self.base_url.trim_end_matches('/'),
            point.longitude,
            point.latitude
        );

        let mut params = vec![
            ("s_srs", CrsCode::Epsg4326.epsg().to_string()),
            ("t_srs", CrsCode::Epsg28992.epsg().to_string()),
        ];
        if let Some(ref key) = self.api_key {
            params.push(("key", key.clone()));
        }

        http::endpoint_url(&base, params)
    }

    /// Extract the first result of a transformation response.
    pub fn parse_response(body: &[u8]) -> StookwijzerResult<ProjectedPoint> {
        let response: TransformResponse = serde_json::from_slice(body)?;
        response
            .results
            .first()
            .map(|r| ProjectedPoint::new(r.x, r.y))
            .ok_or_else(|| {
                StookwijzerError::MalformedResponse("transformation returned no results".into())
            })
    }
}

#[async_trait]
impl CoordinateProvider for RemoteTransform {
    #[instrument(skip(self), fields(service = %self.base_url))]
    async fn transform(&self, point: GeoPoint) -> StookwijzerResult<ProjectedPoint> {
        let url = self.request_url(point)?;
        debug!(url = %url, "Requesting coordinate transformation");

        let body = http::get_bytes(&self.client, url).await?;
        Self::parse_response(&body)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Provider selection for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSource {
    #[default]
    Local,
    Remote,
}

impl CoordinateSource {
    pub fn build(&self, config: &ClientConfig) -> StookwijzerResult<Box<dyn CoordinateProvider>> {
        match self {
            CoordinateSource::Local => Ok(Box::new(RdPolynomial)),
            CoordinateSource::Remote => {
                let remote =
                    RemoteTransform::new(config.transform_url.clone(), config.timeout(), config.verify_tls)?;
                Ok(Box::new(match config.transform_key {
                    Some(ref key) => remote.with_api_key(key.clone()),
                    None => remote,
                }))
            }
        }
    }
}
