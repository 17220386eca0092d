//! Route planning against the live registry.

use std::str::FromStr;

use roadwatch_disruptions::geo::Point;
use roadwatch_disruptions::models::geometry::validate_point;
use roadwatch_disruptions::planner::suggest::is_searchable;
use roadwatch_disruptions::{
    filter_clear_routes, merge_suggestions, DisruptionError, PlaceSearch, PlaceSuggestion, Result,
    RouteFilter, RoutingService, DEFAULT_SUGGESTION_LIMIT,
};

use crate::refresh::SharedRegistry;

/// A start or end point as the user typed it
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
    Coordinates(Point),
    Query(String),
}

impl Endpoint {
    /// `"lat,lng"` is taken as coordinates; anything else is a search query.
    pub fn parse(s: &str) -> Self {
        let coordinates = s.split_once(',').and_then(|(lat, lng)| {
            let lat = lat.trim().parse::<f64>().ok()?;
            let lng = lng.trim().parse::<f64>().ok()?;
            validate_point(Point::new(lng, lat)).ok()
        });

        match coordinates {
            Some(point) => Self::Coordinates(point),
            None => Self::Query(s.trim().to_string()),
        }
    }
}

impl FromStr for Endpoint {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Routes between two resolved points, split by conflicts
#[derive(Debug)]
pub struct RoutePlan {
    pub from: Point,
    pub to: Point,
    pub filter: RouteFilter,
}

pub struct RoutePlanner<R, S> {
    router: R,
    search: S,
    registry: SharedRegistry,
    threshold_m: f64,
    suggestion_limit: usize,
}

impl<R: RoutingService, S: PlaceSearch> RoutePlanner<R, S> {
    pub fn new(router: R, search: S, registry: SharedRegistry, threshold_m: f64) -> Self {
        Self {
            router,
            search,
            registry,
            threshold_m,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Matching disruptions first, then geocoder results.
    ///
    /// A failed place search still yields the disruption matches.
    pub async fn suggest(&self, query: &str) -> Vec<PlaceSuggestion> {
        if !is_searchable(query) {
            return Vec::new();
        }

        let places = match self.search.search(query).await {
            Ok(places) => places,
            Err(err) => {
                tracing::warn!(query, error = %err, "Place search failed");
                Vec::new()
            }
        };

        let registry = self.registry.read().await;
        merge_suggestions(query, registry.snapshot(), places, self.suggestion_limit)
    }

    /// Coordinates as given, or the first suggestion for a query.
    pub async fn resolve(&self, endpoint: &Endpoint) -> Result<Point> {
        match endpoint {
            Endpoint::Coordinates(point) => Ok(*point),
            Endpoint::Query(query) => self
                .suggest(query)
                .await
                .into_iter()
                .next()
                .map(|suggestion| {
                    tracing::debug!(query = %query, name = %suggestion.name, "Resolved place");
                    suggestion.location
                })
                .ok_or_else(|| DisruptionError::PlaceNotFound(query.clone())),
        }
    }

    pub async fn plan(&self, from: &Endpoint, to: &Endpoint) -> Result<RoutePlan> {
        let from = self.resolve(from).await?;
        let to = self.resolve(to).await?;

        let routes = self.router.routes(from, to).await?;

        let registry = self.registry.read().await;
        let filter = filter_clear_routes(routes, registry.snapshot(), self.threshold_m);
        tracing::info!(
            routes = filter.all.len(),
            clear = filter.clear.len(),
            disruptions = registry.len(),
            "Planned route"
        );

        Ok(RoutePlan { from, to, filter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use roadwatch_disruptions::geo::line_string;
    use roadwatch_disruptions::{
        Disruption, DisruptionIdentifier, DisruptionRegistry, FeedSource, Place, PlanOutcome,
        RouteCandidate, RouteIdentifier,
    };
    use tokio::sync::RwLock;

    use crate::testing::{FakeRouter, FakeSearch};

    fn registry_with_closure() -> SharedRegistry {
        let mut registry = DisruptionRegistry::new();
        registry.add(Disruption::new(
            DisruptionIdentifier::new("rocks"),
            "Rocks Road",
            "Road Closed",
            Point::new(173.25, -41.28),
            FeedSource::Council,
        ));
        Arc::new(RwLock::new(registry))
    }

    fn routes() -> Vec<RouteCandidate> {
        vec![
            RouteCandidate::new(
                RouteIdentifier::new("route-0"),
                line_string![(x: 173.24, y: -41.28), (x: 173.25, y: -41.28), (x: 173.26, y: -41.28)],
                1_700.0,
                180.0,
                "Rocks Road",
            ),
            RouteCandidate::new(
                RouteIdentifier::new("route-1"),
                line_string![(x: 173.24, y: -41.30), (x: 173.26, y: -41.30)],
                2_100.0,
                240.0,
                "Waimea Road",
            ),
        ]
    }

    fn planner(search: FakeSearch) -> RoutePlanner<FakeRouter, FakeSearch> {
        let router = FakeRouter {
            routes: routes(),
            ..Default::default()
        };
        RoutePlanner::new(router, search, registry_with_closure(), 40.0)
    }

    #[test]
    fn test_endpoint_parsing() {
        assert_eq!(
            "-41.27, 173.28".parse::<Endpoint>().unwrap(),
            Endpoint::Coordinates(Point::new(173.28, -41.27))
        );
        assert_eq!(
            "Nelson Airport".parse::<Endpoint>().unwrap(),
            Endpoint::Query("Nelson Airport".into())
        );
        // Out of range latitude is not a coordinate
        assert_eq!(
            "173.28,-41.27".parse::<Endpoint>().unwrap(),
            Endpoint::Query("173.28,-41.27".into())
        );
    }

    #[tokio::test]
    async fn test_plan_filters_conflicting_routes() {
        let planner = planner(FakeSearch::default());

        let plan = planner
            .plan(
                &Endpoint::Coordinates(Point::new(173.24, -41.28)),
                &Endpoint::Coordinates(Point::new(173.26, -41.29)),
            )
            .await
            .unwrap();

        assert_eq!(plan.filter.all.len(), 2);
        let clear: Vec<_> = plan.filter.clear.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(clear, vec!["route-1"]);
        assert_eq!(plan.filter.outcome(), PlanOutcome::Clear(1));
        assert_eq!(
            *planner.router.requests.lock().unwrap(),
            vec![(Point::new(173.24, -41.28), Point::new(173.26, -41.29))]
        );
    }

    #[tokio::test]
    async fn test_plan_routes_between_resolved_places() {
        let mut places = HashMap::new();
        places.insert(
            "Nelson Airport".to_string(),
            vec![Place::new("Nelson Airport", Point::new(173.22, -41.30))],
        );
        let planner = planner(FakeSearch { places });

        let plan = planner
            .plan(
                &Endpoint::Query("Rocks".into()),
                &Endpoint::Query("Nelson Airport".into()),
            )
            .await
            .unwrap();

        assert_eq!(plan.from, Point::new(173.25, -41.28));
        assert_eq!(plan.to, Point::new(173.22, -41.30));
        assert_eq!(
            *planner.router.requests.lock().unwrap(),
            vec![(plan.from, plan.to)]
        );
    }

    #[tokio::test]
    async fn test_suggestion_limit() {
        let mut places = HashMap::new();
        places.insert(
            "rocks".to_string(),
            vec![Place::new("Rocks Road, Nelson", Point::new(173.26, -41.29))],
        );
        let planner = planner(FakeSearch { places }).with_suggestion_limit(1);

        let suggestions = planner.suggest("rocks").await;
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].is_disruption());
    }

    #[tokio::test]
    async fn test_query_resolves_to_disruption_first() {
        let mut places = HashMap::new();
        places.insert(
            "rocks".to_string(),
            vec![Place::new("Rocks Road, Nelson", Point::new(173.26, -41.29))],
        );
        let planner = planner(FakeSearch { places });

        let suggestions = planner.suggest("rocks").await;
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].is_disruption());

        let point = planner
            .resolve(&Endpoint::Query("rocks".into()))
            .await
            .unwrap();
        assert_eq!(point, Point::new(173.25, -41.28));
    }

    #[tokio::test]
    async fn test_unknown_place() {
        let planner = planner(FakeSearch::default());

        assert!(planner.suggest("x").await.is_empty());
        assert!(matches!(
            planner.resolve(&Endpoint::Query("Atlantis".into())).await,
            Err(DisruptionError::PlaceNotFound(q)) if q == "Atlantis"
        ));
    }
}
