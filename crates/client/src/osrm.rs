//! OSRM routing (`route/v1/driving`).

use std::future::Future;
use std::pin::Pin;

use roadwatch_disruptions::geo::{LineString, Point};
use roadwatch_disruptions::geojson;
use roadwatch_disruptions::{
    DataFetcher, DisruptionGeometry, GeometryError, Result, RouteCandidate, RouteIdentifier,
    RoutingService,
};
use serde::Deserialize;

use crate::http::parse_url;

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: geojson::Geometry,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    summary: String,
}

pub struct OsrmRouter<F> {
    fetcher: F,
    base_url: String,
    max_alternatives: usize,
}

impl<F: DataFetcher> OsrmRouter<F> {
    pub fn new(fetcher: F, base_url: impl Into<String>, max_alternatives: usize) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            max_alternatives,
        }
    }

    /// Request URL; OSRM takes coordinates as `lon,lat;lon,lat`
    pub fn route_url(&self, from: Point, to: Point) -> Result<String> {
        let base = format!(
            "{}{},{};{},{}",
            self.base_url,
            from.x(),
            from.y(),
            to.x(),
            to.y()
        );
        let mut url = parse_url(&base)?;
        url.query_pairs_mut()
            .append_pair("geometries", "geojson")
            .append_pair("overview", "full")
            .append_pair("alternatives", "true")
            .append_pair("steps", "false");
        Ok(url.into())
    }
}

impl<F: DataFetcher> RoutingService for OsrmRouter<F> {
    fn routes<'a>(
        &'a self,
        from: Point,
        to: Point,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RouteCandidate>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.route_url(from, to)?;
            let bytes = self.fetcher.fetch(&url).await?;
            parse_osrm_routes(&bytes, self.max_alternatives)
        })
    }
}

/// Parse an OSRM route response into at most `max` candidates.
///
/// A response without routes (e.g. `NoRoute`) is an empty list rather than
/// an error. Routes whose geometry is unusable are dropped.
pub fn parse_osrm_routes(bytes: &[u8], max: usize) -> Result<Vec<RouteCandidate>> {
    let response: OsrmResponse = serde_json::from_slice(bytes)?;

    let Some(routes) = response.routes else {
        tracing::debug!(code = ?response.code, "Routing response has no routes");
        return Ok(Vec::new());
    };

    let candidates = routes
        .into_iter()
        .take(max)
        .enumerate()
        .filter_map(|(index, route)| match route_geometry(&route.geometry) {
            Ok(geometry) => Some(RouteCandidate::new(
                RouteIdentifier::new(format!("route-{}", index)),
                geometry,
                route.distance,
                route.duration,
                route_summary(index, &route),
            )),
            Err(err) => {
                tracing::warn!(index, error = %err, "Dropping route with unusable geometry");
                None
            }
        })
        .collect();

    Ok(candidates)
}

fn route_geometry(geometry: &geojson::Geometry) -> std::result::Result<LineString, GeometryError> {
    let parts = DisruptionGeometry::from_geojson(&geometry.value)?;
    match parts.into_iter().next() {
        Some(DisruptionGeometry::LineString(line)) => Ok(line),
        Some(other) => Err(GeometryError::Unsupported(other.kind().into())),
        None => Err(GeometryError::MissingLocation),
    }
}

fn route_summary(index: usize, route: &OsrmRoute) -> String {
    if let Some(summary) = route.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        return summary.to_string();
    }

    let legs: Vec<&str> = route
        .legs
        .iter()
        .map(|leg| leg.summary.trim())
        .filter(|summary| !summary.is_empty())
        .collect();

    if legs.is_empty() {
        RouteCandidate::label_for_index(index)
    } else {
        legs.join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use roadwatch_disruptions::DisruptionError;
    use serde_json::json;

    fn route(summary: &str, legs: &[&str]) -> serde_json::Value {
        json!({
            "geometry": {
                "type": "LineString",
                "coordinates": [[173.28, -41.27], [173.25, -41.28], [173.20, -41.30]]
            },
            "distance": 9_512.4,
            "duration": 731.9,
            "summary": summary,
            "legs": legs.iter().map(|s| json!({ "summary": s })).collect::<Vec<_>>()
        })
    }

    #[test]
    fn test_takes_first_alternatives_in_order() {
        let body = json!({
            "code": "Ok",
            "routes": [
                route("", &["Rocks Road"]),
                route("", &[""]),
                route("Waimea Road", &[]),
                route("", &[]),
            ]
        });

        let routes = parse_osrm_routes(body.to_string().as_bytes(), 3).unwrap();

        assert_eq!(routes.len(), 3);
        let ids: Vec<_> = routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["route-0", "route-1", "route-2"]);
        let summaries: Vec<_> = routes.iter().map(|r| &*r.summary).collect();
        assert_eq!(summaries, vec!["Rocks Road", "Route B", "Waimea Road"]);
        assert_relative_eq!(routes[0].distance_m, 9_512.4);
        assert_relative_eq!(routes[0].duration_s, 731.9);
        assert_eq!(routes[0].geometry.0.len(), 3);
        assert_relative_eq!(routes[0].geometry.0[0].x, 173.28);
    }

    #[test]
    fn test_no_route_is_empty() {
        let body = br#"{ "code": "NoRoute", "message": "Impossible route between points" }"#;
        assert!(parse_osrm_routes(body, 3).unwrap().is_empty());
    }

    #[test]
    fn test_bad_geometry_is_dropped() {
        let body = json!({
            "routes": [
                { "geometry": { "type": "LineString", "coordinates": [[173.0, -41.0]] }, "distance": 1.0, "duration": 1.0 },
                route("", &[]),
            ]
        });

        let routes = parse_osrm_routes(body.to_string().as_bytes(), 3).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].id.as_str(), "route-1");
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            parse_osrm_routes(b"Too Many Requests", 3),
            Err(DisruptionError::Parse(_))
        ));
    }

    #[test]
    fn test_route_url() {
        let router = OsrmRouter::new(
            crate::testing::FakeFetcher::default(),
            "https://router.example/route/v1/driving/",
            3,
        );
        let url = router
            .route_url(Point::new(173.28, -41.27), Point::new(173.2, -41.3))
            .unwrap();

        assert_eq!(
            url,
            "https://router.example/route/v1/driving/173.28,-41.27;173.2,-41.3?geometries=geojson&overview=full&alternatives=true&steps=false"
        );
    }
}
