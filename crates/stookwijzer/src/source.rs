//! Feature sources: where the advisory properties come from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use stookwijzer_common::{BoundingBox, StookwijzerResult};
use tracing::{debug, instrument};
use wms_protocol::{FeatureCollection, GetFeatureInfoRequest};

use crate::config::ClientConfig;
use crate::http;

/// Anything that can answer a feature query for a bounding box.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn fetch(&self, bbox: &BoundingBox) -> StookwijzerResult<FeatureCollection>;
}

/// The RIVM WMS endpoint, queried with GetFeatureInfo.
pub struct HttpFeatureSource {
    client: Client,
    endpoint: String,
    layer: String,
    service_key: Option<String>,
}

impl HttpFeatureSource {
    pub fn new(
        endpoint: impl Into<String>,
        layer: impl Into<String>,
        timeout: Duration,
        verify_tls: bool,
    ) -> StookwijzerResult<Self> {
        Ok(Self {
            client: http::build_client(timeout, verify_tls)?,
            endpoint: endpoint.into(),
            layer: layer.into(),
            service_key: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> StookwijzerResult<Self> {
        let source = Self::new(
            config.feature_url.clone(),
            config.layer.clone(),
            config.timeout(),
            config.verify_tls,
        )?;

        Ok(match config.service_key {
            Some(ref key) => source.with_service_key(key.clone()),
            None => source,
        })
    }

    pub fn with_service_key(mut self, key: impl Into<String>) -> Self {
        self.service_key = Some(key.into());
        self
    }

    /// Full request URL for a bounding box.
    pub fn request_url(&self, bbox: &BoundingBox) -> StookwijzerResult<Url> {
        let mut request = GetFeatureInfoRequest::for_layer(self.layer.clone(), *bbox);
        request.service_key = self.service_key.clone();
        http::endpoint_url(&self.endpoint, request.to_query_pairs())
    }
}

#[async_trait]
impl FeatureSource for HttpFeatureSource {
    #[instrument(skip(self), fields(layer = %self.layer))]
    async fn fetch(&self, bbox: &BoundingBox) -> StookwijzerResult<FeatureCollection> {
        let url = self.request_url(bbox)?;
        debug!(url = %url, "Requesting feature info");

        let body = http::get_bytes(&self.client, url).await?;
        debug!(size = body.len(), "Received feature info");

        FeatureCollection::from_slice(&body)
    }
}
