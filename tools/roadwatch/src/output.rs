use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use roadwatch_client::FeedStatus;
use roadwatch_disruptions::{Disruption, FeedSource, RouteCandidate, RouteFilter};
use std::path::Path;

/// Travel time the way the planner shows it: "45 s", "12 min", "1h 5m"
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{} s", seconds.round());
    }
    let minutes = (seconds / 60.0).round() as u64;
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Whole kilometres
pub fn format_distance(meters: f64) -> String {
    format!("{} km", (meters / 1000.0).round())
}

/// Create a GeoJSON Feature from a disruption, falling back to its
/// representative point when it has no geometry
fn disruption_to_feature(disruption: &Disruption) -> Feature {
    let value = disruption.effective_geometry().to_geojson();

    let mut properties = disruption.properties.clone();
    properties.insert("name".to_string(), serde_json::json!(&*disruption.name));
    properties.insert("status".to_string(), serde_json::json!(&*disruption.status));
    properties.insert("source".to_string(), serde_json::json!(disruption.source.as_str()));
    properties.insert("kind".to_string(), serde_json::json!(disruption.kind.label()));
    properties.insert("colour".to_string(), serde_json::json!(disruption.severity.colour()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: Some(geojson::feature::Id::String(disruption.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn route_to_feature(route: &RouteCandidate, clear: bool) -> Feature {
    let coordinates = route.geometry.0.iter().map(|c| vec![c.x, c.y]).collect();

    let mut properties = serde_json::Map::new();
    properties.insert("summary".to_string(), serde_json::json!(&*route.summary));
    properties.insert("distance_m".to_string(), serde_json::json!(route.distance_m));
    properties.insert("duration_s".to_string(), serde_json::json!(route.duration_s));
    properties.insert("clear".to_string(), serde_json::json!(clear));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coordinates))),
        id: Some(geojson::feature::Id::String(route.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn write_features(features: Vec<Feature>, output_path: &Path) -> Result<()> {
    log::info!("Writing {} features to {}", features.len(), output_path.display());

    let feature_collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let geojson = GeoJson::from(feature_collection);
    let json_string = serde_json::to_string_pretty(&geojson)
        .context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}

/// Write disruptions to a GeoJSON file (one feature each)
pub fn write_disruptions_geojson(disruptions: &[Disruption], output_path: &Path) -> Result<()> {
    write_features(disruptions.iter().map(disruption_to_feature).collect(), output_path)
}

/// Write every route alternative, tagged with whether it is clear
pub fn write_routes_geojson(filter: &RouteFilter, output_path: &Path) -> Result<()> {
    let features = filter
        .all
        .iter()
        .map(|route| route_to_feature(route, filter.is_clear(route)))
        .collect();
    write_features(features, output_path)
}

pub fn print_disruptions<'a>(disruptions: impl IntoIterator<Item = &'a Disruption>) {
    for d in disruptions {
        let position = d.representative_point;
        println!(
            "  [{:<9}] {:<8} {:<40} {:<30} ({:.5}, {:.5})",
            d.source.as_str(),
            format!("{:?}", d.severity),
            d.name,
            d.status,
            position.y(),
            position.x()
        );
    }
}

pub fn print_status(source: FeedSource, status: &FeedStatus) {
    println!("{:<9} {}", source.as_str(), status);
}

pub fn print_routes(filter: &RouteFilter) {
    println!("{}", filter.outcome());
    for (index, route) in filter.all.iter().enumerate() {
        let marker = if filter.is_clear(route) { "clear" } else { "blocked" };
        println!(
            "  {} [{}] {}: {} ({})",
            RouteCandidate::label_for_index(index),
            marker,
            route.summary,
            format_duration(route.duration_s),
            format_distance(route.distance_m)
        );
    }
}
