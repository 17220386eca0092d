//! Place suggestions for the route planner's start/end inputs.
//!
//! Known disruptions whose name matches the query are listed ahead of
//! geocoder results, so a user can route to (or around) a closure by name.

use std::collections::HashSet;

use geo::Point;

use crate::identifiers::DisruptionIdentifier;
use crate::models::{Disruption, Place};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;

/// Queries shorter than this are not looked up while typing
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct PlaceSuggestion {
    pub name: String,
    pub location: Point,
    /// Set when the suggestion is a known disruption
    pub disruption: Option<DisruptionIdentifier>,
}

impl PlaceSuggestion {
    pub fn is_disruption(&self) -> bool {
        self.disruption.is_some()
    }

    fn dedup_key(&self) -> String {
        format!("{:.5},{:.5}", self.location.y(), self.location.x())
    }
}

impl From<Place> for PlaceSuggestion {
    fn from(place: Place) -> Self {
        Self {
            name: place.name.to_string(),
            location: place.location,
            disruption: None,
        }
    }
}

/// Is `query` long enough to look up while typing?
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Disruptions whose name contains `query`, as suggestions.
pub fn disruption_suggestions(query: &str, disruptions: &[Disruption]) -> Vec<PlaceSuggestion> {
    let query = query.trim();

    disruptions
        .iter()
        .filter(|d| d.name_matches(query))
        .map(|d| PlaceSuggestion {
            name: format!("{} (disruption)", d.name),
            location: d.representative_point,
            disruption: Some(d.id.clone()),
        })
        .collect()
}

/// Merge disruption matches and geocoder `places` into one list.
///
/// Disruptions come first; entries sharing coordinates (to 5 decimal
/// places) keep only the first occurrence; at most `limit` are returned.
pub fn merge_suggestions(
    query: &str,
    disruptions: &[Disruption],
    places: Vec<Place>,
    limit: usize,
) -> Vec<PlaceSuggestion> {
    let mut seen = HashSet::new();

    disruption_suggestions(query, disruptions)
        .into_iter()
        .chain(places.into_iter().map(PlaceSuggestion::from))
        .filter(|suggestion| seen.insert(suggestion.dedup_key()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedSource;

    fn disruption(id: &str, name: &str, lon: f64, lat: f64) -> Disruption {
        Disruption::new(
            DisruptionIdentifier::new(id),
            name,
            "Closed",
            Point::new(lon, lat),
            FeedSource::Council,
        )
    }

    #[test]
    fn test_disruptions_come_first() {
        let disruptions = [
            disruption("c1", "Rocks Road", 173.25, -41.28),
            disruption("c2", "Maitai Valley Road", 173.32, -41.27),
        ];
        let places = vec![Place::new("Rocks Road, Nelson", Point::new(173.26, -41.29))];

        let merged = merge_suggestions("rocks", &disruptions, places, DEFAULT_SUGGESTION_LIMIT);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "Rocks Road (disruption)");
        assert_eq!(merged[0].disruption, Some(DisruptionIdentifier::new("c1")));
        assert_eq!(merged[1].name, "Rocks Road, Nelson");
        assert!(!merged[1].is_disruption());
    }

    #[test]
    fn test_dedup_by_rounded_coordinates() {
        let disruptions = [disruption("c1", "Rocks Road", 173.250001, -41.280001)];
        let places = vec![
            Place::new("Rocks Road, Nelson", Point::new(173.25, -41.28)),
            Place::new("Tahunanui", Point::new(173.24, -41.29)),
        ];

        let merged = merge_suggestions("Rocks", &disruptions, places, DEFAULT_SUGGESTION_LIMIT);
        let names: Vec<_> = merged.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rocks Road (disruption)", "Tahunanui"]);
    }

    #[test]
    fn test_limit() {
        let places = (0..10)
            .map(|i| Place::new(format!("Place {}", i), Point::new(173.0 + i as f64 * 0.01, -41.0)))
            .collect();

        let merged = merge_suggestions("place", &[], places, DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(merged.len(), 6);
        assert_eq!(merged[5].name, "Place 5");
    }

    #[test]
    fn test_searchable() {
        assert!(!is_searchable(" a "));
        assert!(is_searchable("ab"));
        assert!(!is_searchable(""));
    }
}
