//! # roadwatch-client
//!
//! HTTP implementations of the disruption engine's collaborators: feed
//! fetching, OSRM routing and Nominatim place search, plus the periodic
//! feed refresher and the route planner that ties them to a shared
//! registry.

pub mod config;
pub mod http;
pub mod nominatim;
pub mod osrm;
pub mod planner;
pub mod refresh;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use roadwatch_disruptions::{DisruptionRegistry, Result};
use tokio::sync::RwLock;

pub use config::{ClientConfig, ConfigError};
pub use http::HttpFetcher;
pub use nominatim::NominatimSearch;
pub use osrm::OsrmRouter;
pub use planner::{Endpoint, RoutePlan, RoutePlanner};
pub use refresh::{FeedRefresher, FeedStatus, RefreshOutcome, RefreshReport, SharedRegistry};

pub type HttpPlanner = RoutePlanner<OsrmRouter<HttpFetcher>, NominatimSearch<HttpFetcher>>;

/// Everything wired to one shared registry and one HTTP client
pub struct Roadwatch {
    pub registry: SharedRegistry,
    pub refresher: FeedRefresher<HttpFetcher>,
    pub planner: HttpPlanner,
}

impl Roadwatch {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config)?;
        let registry: SharedRegistry = Arc::new(RwLock::new(DisruptionRegistry::new()));

        let refresher = FeedRefresher::new(fetcher.clone(), registry.clone(), config);
        let router = OsrmRouter::new(
            fetcher.clone(),
            config.routing_url.as_str(),
            config.max_alternatives,
        );
        let search = NominatimSearch::new(
            fetcher,
            config.geocoder_url.as_str(),
            config.country_codes.as_str(),
            config.search_suffix.as_str(),
        );
        let planner = RoutePlanner::new(
            router,
            search,
            registry.clone(),
            config.conflict_threshold_m,
        );

        Ok(Self {
            registry,
            refresher,
            planner,
        })
    }
}
