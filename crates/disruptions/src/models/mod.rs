//! Disruption data models, geometries, and types.

pub mod disruption;
pub mod geometry;
pub mod route;
pub mod types;

// Re-exports for convenience
pub use disruption::Disruption;
pub use geometry::DisruptionGeometry;
pub use route::{Place, RouteCandidate};
pub use types::{DisruptionError, EventKind, FeedSource, GeometryError, Result, Severity};
