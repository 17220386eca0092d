//! Core enums and error types for disruption data.

use std::fmt;

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Which feed a disruption came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedSource {
    /// National traffic authority (NZTA delays feed)
    Authority,
    /// Regional council GIS (RAMM road closures)
    Council,
}

impl FeedSource {
    pub const ALL: [FeedSource; 2] = [FeedSource::Authority, FeedSource::Council];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authority => "authority",
            Self::Council => "council",
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Council status phrases that mean the road is open with restrictions
pub const PARTIAL_RESTRICTION_PHRASES: [&str; 4] = [
    "residents only",
    "4wd access only",
    "single lane operation",
    "programmed road works",
];

/// How badly a disruption affects travel; drives marker colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Classify a free-form council `Status` string.
    pub fn from_council_status(status: &str) -> Self {
        let status = status.to_lowercase();

        if status.contains("closed") {
            Self::High
        } else if PARTIAL_RESTRICTION_PHRASES
            .iter()
            .any(|phrase| status.contains(phrase))
        {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Marker colour for map overlays
    pub fn colour(&self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "orange",
            Self::Low => "gray",
        }
    }
}

/// Event category reported by the authority feed (`EventType`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    RoadClosure,
    RoadHazard,
    AreaWarning,
    RoadWork,
    Other,
}

impl EventKind {
    pub fn from_event_type(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "road closure" => Self::RoadClosure,
            "road hazard" => Self::RoadHazard,
            "area warning" => Self::AreaWarning,
            "road work" | "scheduled road work" => Self::RoadWork,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RoadClosure => "Road Closure",
            Self::RoadHazard => "Road Hazard",
            Self::AreaWarning => "Area Warning",
            Self::RoadWork => "Road Work",
            Self::Other => "Default",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::RoadClosure => Severity::High,
            Self::RoadHazard | Self::AreaWarning | Self::RoadWork => Severity::Medium,
            Self::Other => Severity::Low,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// A single feature or disruption has coordinates we cannot work with
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("Non-finite coordinate ({lon}, {lat})")]
    NonFinite { lon: f64, lat: f64 },

    #[error("Coordinate out of range ({lon}, {lat})")]
    OutOfRange { lon: f64, lat: f64 },

    #[error("Position has {0} ordinates, expected at least 2")]
    MalformedPosition(usize),

    #[error("{kind} needs at least {min} vertices, found {found}")]
    TooFewVertices {
        kind: &'static str,
        min: usize,
        found: usize,
    },

    #[error("Polygon ring is not closed")]
    UnclosedRing,

    #[error("Unsupported geometry type: {0}")]
    Unsupported(String),

    #[error("No usable location or geometry")]
    MissingLocation,
}

#[derive(Debug, thiserror::Error)]
pub enum DisruptionError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Disruption not found: {0}")]
    DisruptionNotFound(DisruptionIdentifier),

    #[error("No place found for {0:?}")]
    PlaceNotFound(String),
}

impl From<serde_json::Error> for DisruptionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DisruptionError>;
