//! Distance primitives and route conflict evaluation.

pub mod conflict;
pub mod queries;

pub use conflict::{conflicts, find_conflict, ConflictCheck, DEFAULT_CONFLICT_THRESHOLD_M};
pub use queries::{haversine_distance, point_to_segment_distance};
