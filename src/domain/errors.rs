// Error taxonomy for the allocation pipeline

use super::solver_adapter::SolverError;
use super::value_objects::{SourceId, UserId};

/// Malformed input, detected before any backend call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("duplicate user id `{0}`")]
    DuplicateUserId(UserId),

    #[error("duplicate source id `{0}`")]
    DuplicateSourceId(SourceId),

    #[error("user `{id}`: {field} must be a non-negative number, got {value}")]
    NegativeUserField {
        id: UserId,
        field: &'static str,
        value: f64,
    },

    #[error("source `{id}`: {field} must be a non-negative number, got {value}")]
    NegativeSourceField {
        id: SourceId,
        field: &'static str,
        value: f64,
    },

    #[error("budget must be a non-negative number, got {0}")]
    NegativeBudget(f64),

    #[error("infeasible pair references unknown source `{0}`")]
    UnknownPairSource(SourceId),

    #[error("infeasible pair references unknown user `{0}`")]
    UnknownPairUser(UserId),
}

/// Failure of one build/solve/project cycle. Every kind is surfaced
/// explicitly; no partial or degraded results are returned on failure.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("invalid problem: {0}")]
    Validation(#[from] ValidationError),

    #[error("model is infeasible: no allocation satisfies all constraints")]
    Infeasible,

    /// A correct formulation of this model is never unbounded, so this points
    /// at a missing constraint rather than at the input data.
    #[error("model is unbounded: the formulation is missing a constraint")]
    Unbounded,

    #[error(transparent)]
    Solver(#[from] SolverError),
}
