//! Client configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! is a complete configuration.

use std::path::Path;
use std::time::Duration;

use roadwatch_disruptions::DEFAULT_CONFLICT_THRESHOLD_M;
use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTHORITY_FEED_URL: &str =
    "https://www.journeys.nzta.govt.nz/assets/map-data-cache/delays.json";

pub const DEFAULT_COUNCIL_FEED_URL: &str = "https://apps.ramm.com/GIS/?key=cc6661bdb9e5&SERVICE=WFS&VERSION=1.0.0&REQUEST=GetFeature&TYPENAME=cc6661bdb9e5:wfs_road_closures_combined_nztm&SRSNAME=EPSG:4326&outputFormat=json";

pub const DEFAULT_ROUTING_URL: &str = "https://router.project-osrm.org/route/v1/driving/";

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub authority_feed_url: String,
    pub council_feed_url: String,
    pub routing_url: String,
    pub geocoder_url: String,
    /// Appended to free-text queries before geocoding
    pub search_suffix: String,
    pub country_codes: String,
    pub conflict_threshold_m: f64,
    pub max_alternatives: usize,
    pub refresh_interval_secs: u64,
    /// How long a failed source reports its failure before reverting
    pub status_reset_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            authority_feed_url: DEFAULT_AUTHORITY_FEED_URL.into(),
            council_feed_url: DEFAULT_COUNCIL_FEED_URL.into(),
            routing_url: DEFAULT_ROUTING_URL.into(),
            geocoder_url: DEFAULT_GEOCODER_URL.into(),
            search_suffix: " Nelson New Zealand".into(),
            country_codes: "nz".into(),
            conflict_threshold_m: DEFAULT_CONFLICT_THRESHOLD_M,
            max_alternatives: 3,
            refresh_interval_secs: 120,
            status_reset_secs: 30,
            request_timeout_secs: None,
            user_agent: concat!("roadwatch/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl ClientConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.conflict_threshold_m.is_finite() || self.conflict_threshold_m < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "conflict_threshold_m must be a non-negative number, got {}",
                self.conflict_threshold_m
            )));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh_interval_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn status_reset(&self) -> Duration {
        Duration::from_secs(self.status_reset_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
