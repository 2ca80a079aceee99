//! Client configuration, loadable from YAML.

use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use stookwijzer_common::{StookwijzerError, StookwijzerResult};
use tracing::info;

use crate::advice::AdvicePolicyKind;
use crate::coordinates::CoordinateSource;
use crate::forecast::ForecastConfig;

/// RIVM's WMS endpoint for the Stookwijzer layers.
pub const DEFAULT_FEATURE_URL: &str = "https://data.rivm.nl/geo/alo/wms";
pub const DEFAULT_LAYER: &str = "stookwijzer_v2";
/// Public key the RIVM viewer sends with every request.
pub const DEFAULT_SERVICE_KEY: &str = "82b124ad-834d-4c10-8bd0-ee730d5c1cc8";
pub const DEFAULT_TRANSFORM_URL: &str = "https://api.maptiler.com/coordinates/transform";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Everything needed to build a client for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub feature_url: String,
    pub layer: String,
    pub service_key: Option<String>,
    /// Bound on each network call, in seconds.
    pub timeout_secs: u64,
    pub verify_tls: bool,
    pub coordinate_source: CoordinateSource,
    pub transform_url: String,
    pub transform_key: Option<String>,
    pub advice_policy: AdvicePolicyKind,
    /// Forecast hours after the model run, e.g. [0, 6, 12, 18].
    pub forecast_offsets: Vec<u32>,
    /// IANA name of the zone the model runtime is expressed in.
    pub timezone: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            feature_url: DEFAULT_FEATURE_URL.to_string(),
            layer: DEFAULT_LAYER.to_string(),
            service_key: Some(DEFAULT_SERVICE_KEY.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_tls: true,
            coordinate_source: CoordinateSource::Local,
            transform_url: DEFAULT_TRANSFORM_URL.to_string(),
            transform_key: None,
            advice_policy: AdvicePolicyKind::Remote,
            forecast_offsets: ForecastConfig::default().offsets,
            timezone: "Europe/Amsterdam".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file. Missing keys take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> StookwijzerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StookwijzerError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), "Loaded client configuration");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> StookwijzerResult<Self> {
        let config: ClientConfig = serde_yaml::from_str(content)
            .map_err(|e| StookwijzerError::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> StookwijzerResult<()> {
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs must be > 0"));
        }
        if self.layer.trim().is_empty() {
            return Err(invalid("layer must not be empty"));
        }
        if self.forecast_offsets.is_empty() {
            return Err(invalid("at least one forecast offset must be specified"));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn timezone(&self) -> StookwijzerResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| invalid(&format!("unknown timezone {}: {}", self.timezone, e)))
    }

    pub fn forecast_config(&self) -> StookwijzerResult<ForecastConfig> {
        Ok(ForecastConfig::default()
            .with_offsets(self.forecast_offsets.clone())
            .with_timezone(self.timezone()?))
    }
}

fn invalid(message: &str) -> StookwijzerError {
    StookwijzerError::InvalidConfig(message.to_string())
}
