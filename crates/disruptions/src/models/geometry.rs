//! Disruption geometries and their GeoJSON conversions.
//!
//! Only the shapes the feeds actually carry are modelled. Coordinates follow
//! the `geo` convention: `x` is longitude, `y` is latitude, both in degrees.

use geo::{Coord, LineString, Point, Polygon};
use geojson::Value;

use crate::models::types::GeometryError;

/// Geometry of a single disruption
#[derive(Clone, Debug, PartialEq)]
pub enum DisruptionGeometry {
    Point(Point),
    LineString(LineString),
    /// Outer ring only; holes are dropped on construction.
    Polygon(Polygon),
}

impl DisruptionGeometry {
    pub fn point(point: Point) -> Result<Self, GeometryError> {
        Ok(Self::Point(validate_point(point)?))
    }

    pub fn line_string(line: LineString) -> Result<Self, GeometryError> {
        check_vertices(&line.0, "LineString", 2)?;
        Ok(Self::LineString(line))
    }

    /// Build a polygon from its outer ring. The ring must already be closed.
    pub fn polygon(exterior: LineString) -> Result<Self, GeometryError> {
        check_ring(&exterior.0)?;
        Ok(Self::Polygon(Polygon::new(exterior, vec![])))
    }

    /// Convert a GeoJSON geometry into one or more disruption geometries.
    ///
    /// MultiLineString is flattened into its parts; every other supported
    /// kind yields exactly one geometry.
    pub fn from_geojson(value: &Value) -> Result<Vec<Self>, GeometryError> {
        match value {
            Value::Point(position) => {
                Ok(vec![Self::point(Point::from(coord_from_position(position)?))?])
            }
            Value::LineString(positions) => Ok(vec![Self::line_string(LineString::new(
                coords_from_positions(positions)?,
            ))?]),
            Value::MultiLineString(lines) => lines
                .iter()
                .map(|positions| {
                    Self::line_string(LineString::new(coords_from_positions(positions)?))
                })
                .collect(),
            Value::Polygon(rings) => {
                let outer = rings.first().ok_or(GeometryError::TooFewVertices {
                    kind: "Polygon",
                    min: 4,
                    found: 0,
                })?;
                Ok(vec![Self::polygon(LineString::new(coords_from_positions(outer)?))?])
            }
            other => Err(GeometryError::Unsupported(geojson_type_name(other).into())),
        }
    }

    pub fn to_geojson(&self) -> Value {
        match self {
            Self::Point(point) => Value::Point(vec![point.x(), point.y()]),
            Self::LineString(line) => Value::LineString(positions(line)),
            Self::Polygon(polygon) => Value::Polygon(vec![positions(polygon.exterior())]),
        }
    }

    /// Re-run the construction checks. Geometries built directly through the
    /// enum variants have not been checked.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Self::Point(point) => validate_point(*point).map(|_| ()),
            Self::LineString(line) => check_vertices(&line.0, "LineString", 2),
            Self::Polygon(polygon) => check_ring(&polygon.exterior().0),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::Polygon(_) => "Polygon",
        }
    }

    /// The point itself, or the middle vertex of the line / outer ring.
    pub fn representative_point(&self) -> Option<Point> {
        match self {
            Self::Point(point) => Some(*point),
            Self::LineString(line) => middle_vertex(&line.0).map(Point::from),
            Self::Polygon(polygon) => middle_vertex(&polygon.exterior().0).map(Point::from),
        }
    }
}

// ============================================================================
// Coordinate helpers
// ============================================================================

pub fn validate_coord(coord: Coord) -> Result<Coord, GeometryError> {
    if !coord.x.is_finite() || !coord.y.is_finite() {
        return Err(GeometryError::NonFinite {
            lon: coord.x,
            lat: coord.y,
        });
    }

    if !(-90.0..=90.0).contains(&coord.y) || !(-180.0..=180.0).contains(&coord.x) {
        return Err(GeometryError::OutOfRange {
            lon: coord.x,
            lat: coord.y,
        });
    }

    Ok(coord)
}

pub fn validate_point(point: Point) -> Result<Point, GeometryError> {
    validate_coord(point.0).map(Point::from)
}

/// GeoJSON positions are `[lon, lat, ...]`; extra ordinates are ignored.
pub fn coord_from_position(position: &[f64]) -> Result<Coord, GeometryError> {
    match position {
        [lon, lat, ..] => validate_coord(Coord { x: *lon, y: *lat }),
        _ => Err(GeometryError::MalformedPosition(position.len())),
    }
}

fn coords_from_positions(positions: &[Vec<f64>]) -> Result<Vec<Coord>, GeometryError> {
    positions
        .iter()
        .map(|position| coord_from_position(position))
        .collect()
}

fn positions(line: &LineString) -> Vec<Vec<f64>> {
    line.0.iter().map(|c| vec![c.x, c.y]).collect()
}

pub fn middle_vertex<T: Copy>(items: &[T]) -> Option<T> {
    items.get(items.len() / 2).copied()
}

/// Representative point of a raw GeoJSON geometry.
///
/// Point → itself; LineString → middle vertex; MultiLineString → middle
/// vertex of all parts flattened; Polygon → middle vertex of the first ring.
pub fn representative_point(value: &Value) -> Result<Point, GeometryError> {
    let position = match value {
        Value::Point(position) => Some(position),
        Value::LineString(positions) => middle_vertex(&positions.iter().collect::<Vec<_>>()),
        Value::MultiLineString(lines) => {
            middle_vertex(&lines.iter().flatten().collect::<Vec<_>>())
        }
        Value::Polygon(rings) => rings
            .first()
            .and_then(|ring| middle_vertex(&ring.iter().collect::<Vec<_>>())),
        other => return Err(GeometryError::Unsupported(geojson_type_name(other).into())),
    };

    let position = position.ok_or(GeometryError::MissingLocation)?;
    coord_from_position(position).map(Point::from)
}

pub fn geojson_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn check_vertices(coords: &[Coord], kind: &'static str, min: usize) -> Result<(), GeometryError> {
    if coords.len() < min {
        return Err(GeometryError::TooFewVertices {
            kind,
            min,
            found: coords.len(),
        });
    }

    for coord in coords {
        validate_coord(*coord)?;
    }

    Ok(())
}

fn check_ring(coords: &[Coord]) -> Result<(), GeometryError> {
    check_vertices(coords, "Polygon", 4)?;

    match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if first == last => Ok(()),
        _ => Err(GeometryError::UnclosedRing),
    }
}
