//! Partition route alternatives into clear and conflicting.

use std::fmt;

use crate::models::{Disruption, RouteCandidate};
use crate::spatial::conflict::find_conflict;

/// Route alternatives split by whether they avoid every known disruption
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteFilter {
    /// Routes with no conflict, in the order the routing service returned them
    pub clear: Vec<RouteCandidate>,
    /// Every route, unchanged
    pub all: Vec<RouteCandidate>,
}

/// Summary shown to the user after filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanOutcome {
    NoRoutes,
    Clear(usize),
    AllConflicting,
}

impl fmt::Display for PlanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRoutes => write!(f, "No routes found."),
            Self::Clear(n) => write!(f, "Found {} safe route(s).", n),
            Self::AllConflicting => {
                write!(f, "No clear routes found that avoid known disruptions.")
            }
        }
    }
}

impl RouteFilter {
    /// Routes to show: the clear ones, or every route when none is clear so
    /// the user is never shown nothing.
    pub fn displayed(&self) -> &[RouteCandidate] {
        if self.clear.is_empty() {
            &self.all
        } else {
            &self.clear
        }
    }

    pub fn outcome(&self) -> PlanOutcome {
        if self.all.is_empty() {
            PlanOutcome::NoRoutes
        } else if self.clear.is_empty() {
            PlanOutcome::AllConflicting
        } else {
            PlanOutcome::Clear(self.clear.len())
        }
    }

    pub fn is_clear(&self, route: &RouteCandidate) -> bool {
        self.clear.iter().any(|r| r.id == route.id)
    }
}

/// Evaluate each route independently against `disruptions`.
///
/// No re-sorting happens here; the routing service's ranking is kept.
pub fn filter_clear_routes(
    routes: Vec<RouteCandidate>,
    disruptions: &[Disruption],
    threshold_m: f64,
) -> RouteFilter {
    let clear = routes
        .iter()
        .filter(|route| {
            let check = find_conflict(&route.geometry, disruptions, threshold_m);
            if let Some(id) = &check.conflict {
                tracing::debug!(
                    route = %route.id,
                    disruption = %id,
                    "Route conflicts with disruption"
                );
            }
            !check.is_conflict()
        })
        .cloned()
        .collect();

    RouteFilter { clear, all: routes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::*;
    use crate::models::FeedSource;
    use crate::spatial::conflict::conflicts;
    use geo::{line_string, LineString, Point};

    fn candidate(id: &str, geometry: LineString) -> RouteCandidate {
        RouteCandidate::new(RouteIdentifier::new(id), geometry, 10_000.0, 600.0, id)
    }

    fn closure(lon: f64, lat: f64) -> Disruption {
        Disruption::new(
            DisruptionIdentifier::new("closure"),
            "Closure",
            "Closed",
            Point::new(lon, lat),
            FeedSource::Council,
        )
    }

    fn routes() -> Vec<RouteCandidate> {
        vec![
            // Through the closure
            candidate("route-0", line_string![(x: 173.00, y: -41.00), (x: 173.10, y: -41.10)]),
            // Well north of it
            candidate("route-1", line_string![(x: 173.00, y: -40.80), (x: 173.10, y: -40.90)]),
            // Also through it
            candidate("route-2", line_string![(x: 173.05, y: -41.05), (x: 173.20, y: -41.20)]),
            // Far away again
            candidate("route-3", line_string![(x: 174.00, y: -40.00), (x: 174.10, y: -40.10)]),
        ]
    }

    #[test]
    fn test_partition_preserves_order() {
        let disruptions = [closure(173.05, -41.05)];
        let filter = filter_clear_routes(routes(), &disruptions, 40.0);

        let clear: Vec<_> = filter.clear.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(clear, vec!["route-1", "route-3"]);
        assert_eq!(filter.all, routes());
        assert_eq!(filter.outcome(), PlanOutcome::Clear(2));
        assert_eq!(filter.displayed(), &filter.clear[..]);
    }

    #[test]
    fn test_excluded_routes_each_conflict() {
        let disruptions = [closure(173.05, -41.05)];
        let filter = filter_clear_routes(routes(), &disruptions, 40.0);

        for route in &filter.all {
            if !filter.is_clear(route) {
                assert!(conflicts(&route.geometry, &disruptions, 40.0));
            }
        }
        assert!(filter.clear.iter().all(|r| filter.all.contains(r)));
    }

    #[test]
    fn test_falls_back_to_all_when_nothing_is_clear() {
        let disruptions = [closure(173.05, -41.05)];
        let through: Vec<_> = routes()
            .into_iter()
            .filter(|r| r.id.as_str() == "route-0" || r.id.as_str() == "route-2")
            .collect();

        let filter = filter_clear_routes(through, &disruptions, 40.0);
        assert!(filter.clear.is_empty());
        assert_eq!(filter.displayed().len(), 2);
        assert_eq!(filter.outcome(), PlanOutcome::AllConflicting);
    }

    #[test]
    fn test_no_routes() {
        let filter = filter_clear_routes(vec![], &[], 40.0);
        assert_eq!(filter.outcome(), PlanOutcome::NoRoutes);
        assert_eq!(filter.outcome().to_string(), "No routes found.");
    }
}
