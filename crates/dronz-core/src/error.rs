//! Planner error kinds.

use thiserror::Error;

/// Recoverable planning failures, reported to the caller as values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("invalid region '{name}': {reason}")]
    InvalidRegion { name: String, reason: String },

    #[error("no route found: frontier exhausted after {nodes_expanded} expansions")]
    NoRouteFound { nodes_expanded: usize },

    #[error("search budget exceeded: more than {limit} expansions")]
    SearchBudgetExceeded { limit: usize },
}

pub type PlannerResult<T> = Result<T, PlannerError>;
