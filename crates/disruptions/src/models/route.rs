//! Route candidates from the routing service and places from the geocoder.

use std::sync::Arc;

use geo::{LineString, Point};

use crate::identifiers::RouteIdentifier;

/// One alternative returned by the routing service
///
/// Immutable once built; discarded when a new routing request is issued.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteCandidate {
    pub id: RouteIdentifier,
    pub geometry: LineString,
    pub distance_m: f64,
    pub duration_s: f64,
    pub summary: Arc<str>,
}

impl RouteCandidate {
    pub fn new(
        id: RouteIdentifier,
        geometry: LineString,
        distance_m: f64,
        duration_s: f64,
        summary: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id,
            geometry,
            distance_m,
            duration_s,
            summary: summary.into(),
        }
    }

    /// Display letter for the alternative at `index` ("Route A", "Route B", ...)
    pub fn label_for_index(index: usize) -> String {
        let letter = (b'A' + (index % 26) as u8) as char;
        format!("Route {}", letter)
    }
}

/// A named location returned by place search
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    pub name: Arc<str>,
    pub location: Point,
}

impl Place {
    pub fn new(name: impl Into<Arc<str>>, location: Point) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}
