// Allocation use case: the Built -> Solving -> {Reported | Failed} pipeline.

use crate::domain::{
    errors::AllocationError,
    models::{AllocationProblem, AllocationReport, InfeasiblePairSet, Source, User},
    solver_adapter::LpBackend,
};
use crate::solver::SolverFactory;
use log::{debug, info};

use super::formulator::formulate;
use super::projector::project;

/// Validate the scenario and solve it with the default engine.
///
/// Validation failures are reported before any backend call; solve failures
/// come back as the typed `AllocationError` variants.
pub fn solve_allocation(
    users: Vec<User>,
    sources: Vec<Source>,
    budget: f64,
    infeasible_pairs: InfeasiblePairSet,
) -> Result<AllocationReport, AllocationError> {
    let problem = AllocationProblem::new(users, sources, budget, infeasible_pairs)?;
    let mut backend = SolverFactory::default_backend();
    solve_with(&problem, backend.as_mut())
}

/// Solve a validated problem against any conforming backend.
///
/// The backend is exclusively owned by this cycle; solving another scenario
/// requires a fresh instance.
pub fn solve_with(
    problem: &AllocationProblem,
    backend: &mut dyn LpBackend,
) -> Result<AllocationReport, AllocationError> {
    let model = formulate(problem, backend);
    debug!("solving with backend `{}`", backend.name());
    let status = backend.solve()?;
    info!("solve finished with status {status}");
    project(problem, &model, status, backend)
}
