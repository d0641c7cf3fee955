// Result Projector: reads solved values back through the adapter and builds
// the domain-level report, or propagates a typed failure.

use std::collections::BTreeMap;

use crate::domain::{
    errors::AllocationError,
    models::{AllocationProblem, AllocationReport},
    solver_adapter::{LpBackend, SolverError, VariableHandle},
    value_objects::SolveStatus,
};

use super::formulator::FormulatedModel;

/// Project the solve outcome into an `AllocationReport`.
///
/// Must be called exactly once, after `solve()` has returned. Non-successful
/// statuses are propagated as typed failures, never replaced by defaults.
pub fn project(
    problem: &AllocationProblem,
    model: &FormulatedModel,
    status: SolveStatus,
    backend: &dyn LpBackend,
) -> Result<AllocationReport, AllocationError> {
    match status {
        SolveStatus::Optimal | SolveStatus::Feasible => {}
        SolveStatus::Infeasible => return Err(AllocationError::Infeasible),
        SolveStatus::Unbounded => return Err(AllocationError::Unbounded),
    }

    // All variables are non-negative by construction, so anything below zero
    // is engine noise and is clamped.
    let value = |handle: VariableHandle| -> Result<f64, AllocationError> {
        backend
            .value_of(handle)
            .map(|v| v.max(0.0))
            .ok_or_else(|| {
                AllocationError::Solver(SolverError::ExecutionFailed(format!(
                    "backend `{}` reported {status} but returned no value",
                    backend.name()
                )))
            })
    };

    let users = problem.users();
    let sources = problem.sources();

    let mut allocations = BTreeMap::new();
    for (s, source) in sources.iter().enumerate() {
        for (u, user) in users.iter().enumerate() {
            allocations.insert(
                (source.id.clone(), user.id.clone()),
                value(model.allocation(s, u))?,
            );
        }
    }

    let mut deficits = BTreeMap::new();
    let mut objective = 0.0;
    for (u, user) in users.iter().enumerate() {
        let deficit = value(model.deficit(u))?;
        objective += user.deficit_weight * deficit;
        deficits.insert(user.id.clone(), deficit);
    }

    let mut over_extractions = BTreeMap::new();
    for (s, source) in sources.iter().enumerate() {
        let excess = value(model.over_extraction(s))?;
        objective += source.over_extraction_weight * excess;
        over_extractions.insert(source.id.clone(), excess);
    }

    let budget_used = value(model.budget_used())?;

    Ok(AllocationReport {
        status,
        objective,
        allocations,
        deficits,
        over_extractions,
        budget_used,
    })
}
