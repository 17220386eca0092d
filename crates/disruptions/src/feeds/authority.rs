//! National traffic authority feed (NZTA "delays" cache).
//!
//! The payload is `{ "lastUpdated": <unix seconds>, "features": [...] }`, or
//! occasionally a bare array of items. Items carry either an explicit
//! `location: { lat, lng }`, a GeoJSON `geometry`, or both. Descriptive
//! properties live under `properties` or directly on the item.
//!
//! Representative point priority:
//! 1. `location`
//! 2. Point geometry
//! 3. middle vertex of a LineString
//! 4. middle vertex of a MultiLineString, all parts flattened
//! 5. middle vertex of a Polygon's first ring

use chrono::{DateTime, Utc};
use geo::Point;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::feeds::{first_string, BatchReport, FeedBatch};
use crate::identifiers::DisruptionIdentifier;
use crate::models::geometry::{representative_point, validate_point};
use crate::models::*;

const NAME_KEYS: [&str; 3] = ["Name", "LocationArea", "EventDescription"];
const STATUS_KEYS: [&str; 2] = ["Status", "EventType"];
const ID_KEYS: [&str; 3] = ["EventId", "EventID", "id"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorityPayload {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(rename = "lastUpdated", default)]
        last_updated: Option<f64>,
        features: Vec<Value>,
    },
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AuthorityItem {
    #[serde(default)]
    location: Option<LatLng>,
    #[serde(default)]
    geometry: Option<geojson::Geometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Parse an authority payload into disruptions.
pub fn parse_authority_feed(bytes: &[u8]) -> Result<FeedBatch> {
    let payload: AuthorityPayload = serde_json::from_slice(bytes)?;

    let (last_updated, items) = match payload {
        AuthorityPayload::Bare(items) => (None, items),
        AuthorityPayload::Wrapped {
            last_updated,
            features,
        } => (last_updated, features),
    };

    let mut batch = FeedBatch {
        timestamp: last_updated.and_then(timestamp_from_unix_seconds),
        disruptions: Vec::with_capacity(items.len()),
        report: BatchReport::default(),
    };

    for (index, item) in items.into_iter().enumerate() {
        let label = item_label(&item);
        match parse_item(index, item) {
            Ok(disruptions) => {
                batch.report.record_processed();
                batch.disruptions.extend(disruptions);
            }
            Err(err) => batch.report.record_skipped(index, label, err),
        }
    }

    tracing::debug!(
        disruptions = batch.disruptions.len(),
        report = %batch.report,
        "Parsed authority feed"
    );

    Ok(batch)
}

fn parse_item(index: usize, item: Value) -> Result<Vec<Disruption>> {
    let item: AuthorityItem = serde_json::from_value(item)?;
    let properties = item.properties.unwrap_or(item.rest);

    let representative = match (&item.location, &item.geometry) {
        (Some(location), _) => validate_point(Point::new(location.lng, location.lat))?,
        (None, Some(geometry)) => representative_point(&geometry.value)?,
        (None, None) => return Err(GeometryError::MissingLocation.into()),
    };

    let geometries = match &item.geometry {
        Some(geometry) => match DisruptionGeometry::from_geojson(&geometry.value) {
            Ok(parts) => parts,
            // The explicit location still places the item on the map
            Err(err) if item.location.is_some() => {
                tracing::warn!(index, error = %err, "Keeping authority item without geometry");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        },
        None => Vec::new(),
    };

    let id = first_string(&properties, &ID_KEYS)
        .map(DisruptionIdentifier::new)
        .unwrap_or_else(|| DisruptionIdentifier::new(format!("authority-{}", index)));
    let name = first_string(&properties, &NAME_KEYS).unwrap_or_else(|| "NZTA event".into());
    let status = first_string(&properties, &STATUS_KEYS).unwrap_or_else(|| "unknown".into());
    let kind = first_string(&properties, &["EventType"])
        .map(|event_type| EventKind::from_event_type(&event_type))
        .unwrap_or(EventKind::Other);

    let base = Disruption::new(id.clone(), name, status, representative, FeedSource::Authority)
        .with_kind(kind)
        .with_severity(kind.severity())
        .with_properties(properties);

    let disruptions = match geometries.len() {
        0 => vec![base],
        1 => geometries
            .into_iter()
            .map(|geometry| base.clone().with_geometry(geometry))
            .collect(),
        // MultiLineString: one disruption per part, sharing the metadata
        _ => geometries
            .into_iter()
            .enumerate()
            .map(|(part, geometry)| Disruption {
                id: id.part(part),
                ..base.clone().with_geometry(geometry)
            })
            .collect(),
    };

    Ok(disruptions)
}

fn timestamp_from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}

fn item_label(item: &Value) -> String {
    let properties = item
        .get("properties")
        .and_then(Value::as_object)
        .or_else(|| item.as_object());

    properties
        .and_then(|props| first_string(props, &["Name", "LocationArea"]))
        .unwrap_or_else(|| "unnamed".into())
}
