//! # roadwatch-disruptions
//!
//! Road disruption tracking and route conflict evaluation.
//!
//! ## Features
//!
//! - **Feed parsing**: National authority and regional council payloads
//!   become one normalized disruption model, item by item
//! - **Registry**: An explicit, generation-counted store of current disruptions
//! - **Conflict checks**: Geodesic distance tests between a route and
//!   point, line and area disruptions
//! - **Planner support**: Filter routing alternatives, merge place suggestions
//! - **Pluggable networking**: Implement your own fetching, routing and search
//!
//! ## Example
//!
//! ```
//! use roadwatch_disruptions::prelude::*;
//! use geo::{line_string, Point};
//!
//! let mut registry = DisruptionRegistry::new();
//! registry.add(Disruption::new(
//!     DisruptionIdentifier::new("rocks-road"),
//!     "Rocks Road",
//!     "Road Closed",
//!     Point::new(173.2500, -41.2800),
//!     FeedSource::Council,
//! ));
//!
//! let through = RouteCandidate::new(
//!     RouteIdentifier::new("route-0"),
//!     line_string![(x: 173.2400, y: -41.2800), (x: 173.2500, y: -41.2800), (x: 173.2600, y: -41.2800)],
//!     1_700.0,
//!     180.0,
//!     "Rocks Road",
//! );
//! let around = RouteCandidate::new(
//!     RouteIdentifier::new("route-1"),
//!     line_string![(x: 173.2400, y: -41.3000), (x: 173.2600, y: -41.3000)],
//!     2_100.0,
//!     240.0,
//!     "Waimea Road",
//! );
//!
//! let filter = filter_clear_routes(
//!     vec![through, around],
//!     registry.snapshot(),
//!     DEFAULT_CONFLICT_THRESHOLD_M,
//! );
//! assert_eq!(filter.clear.len(), 1);
//! assert_eq!(filter.outcome(), PlanOutcome::Clear(1));
//! ```

pub mod feeds;
pub mod identifiers;
pub mod models;
pub mod network;
pub mod planner;
pub mod registry;
pub mod spatial;

pub use geo;
pub use geojson;

// Re-exports for convenience
pub mod prelude {
    pub use crate::feeds::{
        parse_authority_feed, parse_council_feed, BatchReport, FeedBatch, SkippedItem,
    };
    pub use crate::identifiers::*;
    pub use crate::models::{
        Disruption, DisruptionError, DisruptionGeometry, EventKind, FeedSource, GeometryError,
        Place, Result, RouteCandidate, Severity,
    };
    pub use crate::network::traits::*;
    pub use crate::planner::{
        filter_clear_routes, merge_suggestions, PlaceSuggestion, PlanOutcome, RouteFilter,
        DEFAULT_SUGGESTION_LIMIT,
    };
    pub use crate::registry::DisruptionRegistry;
    pub use crate::spatial::{
        conflicts, find_conflict, haversine_distance, point_to_segment_distance, ConflictCheck,
        DEFAULT_CONFLICT_THRESHOLD_M,
    };
}

pub use prelude::*;
