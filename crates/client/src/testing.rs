//! In-memory collaborators for tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use roadwatch_disruptions::geo::Point;
use roadwatch_disruptions::{
    DataFetcher, DisruptionError, Place, PlaceSearch, Result, RouteCandidate, RoutingService,
};

/// Serves canned bodies keyed by URL prefix and records every request
#[derive(Clone, Default)]
pub struct FakeFetcher {
    responses: Arc<Mutex<HashMap<String, std::result::Result<Vec<u8>, String>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn respond(&self, prefix: &str, body: impl Into<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prefix.to_string(), Ok(body.into()));
    }

    pub fn fail(&self, prefix: &str, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(prefix.to_string(), Err(message.to_string()));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl DataFetcher for FakeFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        self.requests.lock().unwrap().push(url.to_string());
        let response = self
            .responses
            .lock()
            .unwrap()
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, response)| response.clone());

        Box::pin(async move {
            match response {
                Some(Ok(body)) => Ok(body),
                Some(Err(message)) => Err(DisruptionError::Transport(message)),
                None => Err(DisruptionError::Transport(format!("HTTP 404 Not Found from {}", url))),
            }
        })
    }
}

/// Returns the same alternatives for every request
#[derive(Default)]
pub struct FakeRouter {
    pub routes: Vec<RouteCandidate>,
    pub requests: Mutex<Vec<(Point, Point)>>,
}

impl RoutingService for FakeRouter {
    fn routes<'a>(
        &'a self,
        from: Point,
        to: Point,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RouteCandidate>>> + Send + 'a>> {
        self.requests.lock().unwrap().push((from, to));
        let routes = self.routes.clone();
        Box::pin(async move { Ok(routes) })
    }
}

/// Looks places up by exact query
#[derive(Default)]
pub struct FakeSearch {
    pub places: HashMap<String, Vec<Place>>,
}

impl PlaceSearch for FakeSearch {
    fn search<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Place>>> + Send + 'a>> {
        let places = self.places.get(query).cloned().unwrap_or_default();
        Box::pin(async move { Ok(places) })
    }
}
