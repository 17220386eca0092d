//! Pluggable collaborator traits.
//!
//! External crates implement these to provide feed fetching, routing and
//! place search. Nothing in this crate performs I/O itself.

use std::future::Future;
use std::pin::Pin;

use geo::Point;

use crate::models::route::{Place, RouteCandidate};
use crate::models::types::Result;

/// Fetch raw bytes from a URL
pub trait DataFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

/// Turn-by-turn routing service returning a bounded set of alternatives
pub trait RoutingService: Send + Sync {
    /// Alternatives from `from` to `to`, best first
    fn routes<'a>(
        &'a self,
        from: Point,
        to: Point,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RouteCandidate>>> + Send + 'a>>;
}

/// Free-text place search (geocoding)
pub trait PlaceSearch: Send + Sync {
    fn search<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Place>>> + Send + 'a>>;
}
