//! Regional council road closures (RAMM WFS, GeoJSON output).
//!
//! A FeatureCollection with an extra top-level `timeStamp` member. Only
//! Point, LineString and Polygon features are used.

use chrono::{DateTime, Utc};
use geojson::feature::Id;
use geojson::Feature;
use serde::Deserialize;
use serde_json::Value;

use crate::feeds::{first_string, BatchReport, FeedBatch};
use crate::identifiers::DisruptionIdentifier;
use crate::models::geometry::geojson_type_name;
use crate::models::*;

#[derive(Debug, Deserialize)]
struct CouncilPayload {
    #[serde(rename = "timeStamp", default)]
    time_stamp: Option<String>,
    features: Vec<Value>,
}

/// Parse a council payload into disruptions.
pub fn parse_council_feed(bytes: &[u8]) -> Result<FeedBatch> {
    let payload: CouncilPayload = serde_json::from_slice(bytes)?;

    let timestamp = payload.time_stamp.as_deref().and_then(|raw| {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(err) => {
                tracing::warn!(raw, error = %err, "Council feed timestamp is not RFC 3339");
                None
            }
        }
    });

    let mut batch = FeedBatch {
        timestamp,
        disruptions: Vec::with_capacity(payload.features.len()),
        report: BatchReport::default(),
    };

    for (index, feature) in payload.features.into_iter().enumerate() {
        let label = feature
            .get("properties")
            .and_then(Value::as_object)
            .and_then(|props| first_string(props, &["Location"]))
            .unwrap_or_else(|| "unnamed".into());

        match parse_feature(index, feature) {
            Ok(disruption) => {
                batch.report.record_processed();
                batch.disruptions.push(disruption);
            }
            Err(err) => batch.report.record_skipped(index, label, err),
        }
    }

    tracing::debug!(
        disruptions = batch.disruptions.len(),
        report = %batch.report,
        "Parsed council feed"
    );

    Ok(batch)
}

fn parse_feature(index: usize, feature: Value) -> Result<Disruption> {
    let feature: Feature = serde_json::from_value(feature)?;
    let properties = feature.properties.unwrap_or_default();

    let value = match &feature.geometry {
        Some(geometry) => &geometry.value,
        None => return Err(GeometryError::MissingLocation.into()),
    };

    let fallback_name = match value {
        geojson::Value::Point(_) => "Council point",
        geojson::Value::LineString(_) => "Council closure",
        geojson::Value::Polygon(_) => "Council area",
        other => return Err(GeometryError::Unsupported(geojson_type_name(other).into()).into()),
    };

    let geometry = DisruptionGeometry::from_geojson(value)?
        .into_iter()
        .next()
        .ok_or(GeometryError::MissingLocation)?;
    let representative = geometry
        .representative_point()
        .ok_or(GeometryError::MissingLocation)?;

    let id = match feature.id {
        Some(Id::String(id)) => DisruptionIdentifier::new(id),
        Some(Id::Number(id)) => DisruptionIdentifier::new(id.to_string()),
        None => DisruptionIdentifier::new(format!("council-{}", index)),
    };
    let name = first_string(&properties, &["Location", "Type"])
        .unwrap_or_else(|| fallback_name.into());
    let status = first_string(&properties, &["Status"]);
    let severity = Severity::from_council_status(status.as_deref().unwrap_or_default());
    let kind = first_string(&properties, &["Type"])
        .map(|kind| EventKind::from_event_type(&kind))
        .unwrap_or(EventKind::Other);

    let disruption = Disruption::new(
        id,
        name,
        status.unwrap_or_else(|| "unknown".into()),
        representative,
        FeedSource::Council,
    )
    .with_geometry(geometry)
    .with_kind(kind)
    .with_severity(severity)
    .with_properties(properties);

    Ok(disruption)
}
