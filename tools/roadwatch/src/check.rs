use anyhow::{bail, Context, Result};
use geo::LineString;
use geojson::GeoJson;
use roadwatch_disruptions::{
    find_conflict, parse_authority_feed, parse_council_feed, ConflictCheck, DisruptionGeometry,
    DisruptionRegistry, FeedBatch,
};
use std::path::Path;

/// Read the first LineString from a GeoJSON file (bare geometry, feature,
/// or feature collection)
pub fn read_route(path: &Path) -> Result<LineString> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route file {}", path.display()))?;
    let geojson: GeoJson = text
        .parse()
        .with_context(|| format!("Failed to parse route GeoJSON {}", path.display()))?;

    let geometries: Vec<geojson::Geometry> = match geojson {
        GeoJson::Geometry(geometry) => vec![geometry],
        GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .collect(),
    };

    for geometry in &geometries {
        if let geojson::Value::LineString(_) = geometry.value {
            let parts = DisruptionGeometry::from_geojson(&geometry.value)
                .with_context(|| format!("Invalid route geometry in {}", path.display()))?;
            if let Some(DisruptionGeometry::LineString(line)) = parts.into_iter().next() {
                return Ok(line);
            }
        }
    }

    bail!("No LineString found in {}", path.display())
}

/// Load feed payloads saved to disk into a fresh registry
pub fn load_registry(
    authority: Option<&Path>,
    council: Option<&Path>,
) -> Result<DisruptionRegistry> {
    let mut registry = DisruptionRegistry::new();

    if let Some(path) = authority {
        let batch = read_feed(path, parse_authority_feed)?;
        log::info!("Authority feed {}: {}", path.display(), batch.report);
        registry.extend(batch.disruptions);
    }

    if let Some(path) = council {
        let batch = read_feed(path, parse_council_feed)?;
        log::info!("Council feed {}: {}", path.display(), batch.report);
        registry.extend(batch.disruptions);
    }

    Ok(registry)
}

fn read_feed(
    path: &Path,
    parse: fn(&[u8]) -> roadwatch_disruptions::Result<FeedBatch>,
) -> Result<FeedBatch> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read feed {}", path.display()))?;
    parse(&bytes).with_context(|| format!("Failed to parse feed {}", path.display()))
}

/// Evaluate a route against the loaded registry
pub fn check_route(
    route: &LineString,
    registry: &DisruptionRegistry,
    threshold_m: f64,
) -> ConflictCheck {
    let check = find_conflict(route, registry.snapshot(), threshold_m);
    if check.skipped > 0 {
        log::warn!("{} disruptions had unusable geometry and were not checked", check.skipped);
    }
    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("roadwatch-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_route_through_council_closure() {
        let route = temp_file(
            "route.geojson",
            r#"{ "type": "Feature", "properties": {},
                 "geometry": { "type": "LineString", "coordinates": [[173.24, -41.28], [173.25, -41.28], [173.26, -41.28]] } }"#,
        );
        let council = temp_file(
            "council.json",
            r#"{ "timeStamp": "2025-03-01T10:15:00Z", "features": [
                 { "type": "Feature", "id": "rocks",
                   "geometry": { "type": "Point", "coordinates": [173.25, -41.28] },
                   "properties": { "Location": "Rocks Road", "Status": "Road Closed" } } ] }"#,
        );

        let line = read_route(&route).unwrap();
        let registry = load_registry(None, Some(&council)).unwrap();
        let check = check_route(&line, &registry, 40.0);

        assert_eq!(registry.len(), 1);
        assert_eq!(check.conflict.map(|id| id.to_string()), Some("rocks".to_string()));

        std::fs::remove_file(route).ok();
        std::fs::remove_file(council).ok();
    }

    #[test]
    fn test_route_file_without_line() {
        let route = temp_file(
            "point.geojson",
            r#"{ "type": "Point", "coordinates": [173.24, -41.28] }"#,
        );

        assert!(read_route(&route).is_err());
        std::fs::remove_file(route).ok();
    }
}
