//! Disruption records as stored in the registry.

use std::borrow::Cow;
use std::sync::Arc;

use geo::Point;
use serde_json::{Map, Value};

use crate::identifiers::DisruptionIdentifier;
use crate::models::geometry::DisruptionGeometry;
use crate::models::types::*;

/// A reported road event (closure, hazard, restriction)
///
/// `representative_point` is always present, even when the feed supplied no
/// usable geometry; it is what gets placed on the map and searched by name.
#[derive(Clone, Debug, PartialEq)]
pub struct Disruption {
    pub id: DisruptionIdentifier,
    pub name: Arc<str>,
    pub status: Arc<str>,
    pub representative_point: Point,
    pub geometry: Option<DisruptionGeometry>,
    pub source: FeedSource,
    pub severity: Severity,
    pub kind: EventKind,
    /// Raw descriptive properties from the feed
    pub properties: Map<String, Value>,
}

impl Disruption {
    pub fn new(
        id: DisruptionIdentifier,
        name: impl Into<Arc<str>>,
        status: impl Into<Arc<str>>,
        representative_point: Point,
        source: FeedSource,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            status: status.into(),
            representative_point,
            geometry: None,
            source,
            severity: Severity::Low,
            kind: EventKind::Other,
            properties: Map::new(),
        }
    }

    pub fn with_geometry(mut self, geometry: DisruptionGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Geometry used for conflict checks: the feed geometry, or a point at
    /// the representative position when there is none.
    pub fn effective_geometry(&self) -> Cow<'_, DisruptionGeometry> {
        match &self.geometry {
            Some(geometry) => Cow::Borrowed(geometry),
            None => Cow::Owned(DisruptionGeometry::Point(self.representative_point)),
        }
    }

    /// Case-insensitive substring match on the display name.
    pub fn name_matches(&self, query: &str) -> bool {
        !query.is_empty() && self.name.to_lowercase().contains(&query.to_lowercase())
    }
}
