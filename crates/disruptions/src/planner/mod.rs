//! Route planner support: conflict filtering and place suggestions.

pub mod ranking;
pub mod suggest;

pub use ranking::{filter_clear_routes, PlanOutcome, RouteFilter};
pub use suggest::{merge_suggestions, PlaceSuggestion, DEFAULT_SUGGESTION_LIMIT};
