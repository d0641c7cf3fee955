// Domain layer: allocation records, solver capability, errors
pub mod domain;

// Application layer: formulation, projection and the solve pipeline
pub mod application;

// Solver adapters: concrete implementations of LpBackend
pub mod solver;

// Re-export commonly used types
pub use domain::{
    AllocationError, AllocationProblem, AllocationReport, InfeasiblePairSet, LinearExpr,
    LpBackend, Relation, SolveStatus, SolverBackend, SolverError, Source, SourceId, User, UserId,
    ValidationError, VariableHandle, TOLERANCE,
};

pub use application::{formulate, project, solve_allocation, solve_with, FormulatedModel};

pub use solver::{ClarabelBackend, SolverFactory};

#[cfg(feature = "highs")]
pub use solver::HighsBackend;
