//! Route conflict evaluation.
//!
//! Decides whether a candidate route passes within a distance threshold of
//! any known disruption.
//!
//! ## Endpoint sampling
//!
//! Segment-to-segment proximity is approximated by measuring each segment's
//! endpoints against the other segment (four point-to-segment checks per
//! pair). Two segments whose interiors cross while all four endpoints stay
//! farther than the threshold from the other segment are *not* reported.
//! For the short, nearly straight segments that routing services and road
//! feeds produce this rarely matters, but it is a known false-negative case.

use geo::{Line, LineString};

use crate::identifiers::DisruptionIdentifier;
use crate::models::{Disruption, DisruptionGeometry, GeometryError};
use crate::spatial::queries::{haversine_distance, point_to_segment_distance};

/// Threshold used by the route planner
pub const DEFAULT_CONFLICT_THRESHOLD_M: f64 = 40.0;

/// Outcome of checking one route against a set of disruptions
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConflictCheck {
    /// First disruption found within the threshold, if any
    pub conflict: Option<DisruptionIdentifier>,
    /// Disruptions ignored because their geometry was unusable
    pub skipped: usize,
}

impl ConflictCheck {
    pub fn is_conflict(&self) -> bool {
        self.conflict.is_some()
    }
}

/// Does `route` pass within `threshold_m` of any disruption?
pub fn conflicts(route: &LineString, disruptions: &[Disruption], threshold_m: f64) -> bool {
    find_conflict(route, disruptions, threshold_m).is_conflict()
}

/// Check `route` against every disruption, stopping at the first conflict.
///
/// A disruption whose geometry fails validation is logged and counted as
/// skipped; it never aborts the check.
pub fn find_conflict(
    route: &LineString,
    disruptions: &[Disruption],
    threshold_m: f64,
) -> ConflictCheck {
    let mut check = ConflictCheck::default();

    for disruption in disruptions {
        match disruption_conflicts(route, disruption, threshold_m) {
            Ok(true) => {
                check.conflict = Some(disruption.id.clone());
                return check;
            }
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(
                    disruption = %disruption.id,
                    error = %err,
                    "Error checking disruption geometry; treating as clear"
                );
                check.skipped += 1;
            }
        }
    }

    check
}

/// Check `route` against a single disruption.
pub fn disruption_conflicts(
    route: &LineString,
    disruption: &Disruption,
    threshold_m: f64,
) -> Result<bool, GeometryError> {
    let geometry = disruption.effective_geometry();
    geometry.validate()?;

    let hit = match &*geometry {
        DisruptionGeometry::Point(point) => {
            route
                .points()
                .any(|vertex| haversine_distance(vertex, *point) <= threshold_m)
                || route.lines().any(|segment| {
                    point_to_segment_distance(*point, segment.start_point(), segment.end_point())
                        <= threshold_m
                })
        }
        DisruptionGeometry::LineString(line) => segments_within(route, line, threshold_m),
        DisruptionGeometry::Polygon(polygon) => {
            segments_within(route, polygon.exterior(), threshold_m)
        }
    };

    Ok(hit)
}

fn segments_within(route: &LineString, other: &LineString, threshold_m: f64) -> bool {
    route.lines().any(|route_segment| {
        other
            .lines()
            .any(|segment| segment_pair_within(route_segment, segment, threshold_m))
    })
}

fn segment_pair_within(a: Line, b: Line, threshold_m: f64) -> bool {
    let (a_start, a_end) = (a.start_point(), a.end_point());
    let (b_start, b_end) = (b.start_point(), b.end_point());

    point_to_segment_distance(a_start, b_start, b_end) <= threshold_m
        || point_to_segment_distance(a_end, b_start, b_end) <= threshold_m
        || point_to_segment_distance(b_start, a_start, a_end) <= threshold_m
        || point_to_segment_distance(b_end, a_start, a_end) <= threshold_m
}
