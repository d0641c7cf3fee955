// Problem Formulator: translates a validated AllocationProblem into an LP
// instance through the LpBackend capability.

use crate::domain::{
    models::AllocationProblem,
    solver_adapter::{LinearExpr, LpBackend, VariableHandle},
    value_objects::Relation,
};
use log::debug;

/// Index of the decision-variable handles created for one scenario.
/// Allocation handles are stored row-major, sources × users; zero-fixed
/// pairs stay in the index space so iteration is uniform.
#[derive(Debug)]
pub struct FormulatedModel {
    num_users: usize,
    allocations: Vec<VariableHandle>,
    deficits: Vec<VariableHandle>,
    over_extractions: Vec<VariableHandle>,
    budget_used: VariableHandle,
}

impl FormulatedModel {
    /// Handle of Q(s, u)
    pub fn allocation(&self, source_idx: usize, user_idx: usize) -> VariableHandle {
        self.allocations[source_idx * self.num_users + user_idx]
    }

    /// Handle of D(u)
    pub fn deficit(&self, user_idx: usize) -> VariableHandle {
        self.deficits[user_idx]
    }

    /// Handle of E(s)
    pub fn over_extraction(&self, source_idx: usize) -> VariableHandle {
        self.over_extractions[source_idx]
    }

    pub fn budget_used(&self) -> VariableHandle {
        self.budget_used
    }
}

/// Emit all decision variables, constraints and the objective for `problem`.
///
/// The input is already validated, so formulation itself cannot fail.
pub fn formulate(problem: &AllocationProblem, backend: &mut dyn LpBackend) -> FormulatedModel {
    let users = problem.users();
    let sources = problem.sources();

    // Q(s,u): non-negative flow, fixed at zero for disallowed pairs
    let mut allocations = Vec::with_capacity(sources.len() * users.len());
    for source in sources {
        for user in users {
            let upper = if problem.infeasible_pairs().contains(&source.id, &user.id) {
                Some(0.0)
            } else {
                None
            };
            allocations.push(backend.add_variable(0.0, upper));
        }
    }

    // D(u) and E(s): penalized slack variables
    let deficits: Vec<_> = users
        .iter()
        .map(|_| backend.add_variable(0.0, None))
        .collect();
    let over_extractions: Vec<_> = sources
        .iter()
        .map(|_| backend.add_variable(0.0, None))
        .collect();

    // The budget cap is carried as the variable's upper bound.
    let budget_used = backend.add_variable(0.0, Some(problem.budget()));

    let model = FormulatedModel {
        num_users: users.len(),
        allocations,
        deficits,
        over_extractions,
        budget_used,
    };

    // Demand satisfaction: Σ_s Q(s,u) + D(u) ≥ demand(u)
    for (u, user) in users.iter().enumerate() {
        let mut expr = LinearExpr::new();
        for s in 0..sources.len() {
            expr.add_term(model.allocation(s, u), 1.0);
        }
        expr.add_term(model.deficit(u), 1.0);
        backend.add_constraint(expr, Relation::GreaterThanOrEqual, user.demand);
    }

    // Supply capacity: Σ_u Q(s,u) + E(s) ≤ supply(s)
    for (s, source) in sources.iter().enumerate() {
        let mut expr = LinearExpr::new();
        for u in 0..users.len() {
            expr.add_term(model.allocation(s, u), 1.0);
        }
        expr.add_term(model.over_extraction(s), 1.0);
        backend.add_constraint(expr, Relation::LessThanOrEqual, source.supply);
    }

    // Quality blending, linearized by multiplying the blend ratio through the
    // total inflow: Σ_s (ppm(s) − ppm_max(u))·Q(s,u) ≤ 0. Trivially holds at
    // zero inflow.
    for (u, user) in users.iter().enumerate() {
        let mut expr = LinearExpr::new();
        for (s, source) in sources.iter().enumerate() {
            expr.add_term(model.allocation(s, u), source.ppm - user.ppm_max);
        }
        backend.add_constraint(expr, Relation::LessThanOrEqual, 0.0);
    }

    // Budget accounting: Σ_s cost(s)·Σ_u Q(s,u) − budget_used = 0
    let mut expr = LinearExpr::new();
    for (s, source) in sources.iter().enumerate() {
        for u in 0..users.len() {
            expr.add_term(model.allocation(s, u), source.extraction_cost);
        }
    }
    expr.add_term(model.budget_used(), -1.0);
    backend.add_constraint(expr, Relation::Equal, 0.0);

    // Objective: weighted deficit + over-extraction penalties. Allocation
    // volume itself is not rewarded.
    let mut objective = LinearExpr::new();
    for (u, user) in users.iter().enumerate() {
        objective.add_term(model.deficit(u), user.deficit_weight);
    }
    for (s, source) in sources.iter().enumerate() {
        objective.add_term(model.over_extraction(s), source.over_extraction_weight);
    }
    backend.set_objective(objective);

    debug!(
        "formulated allocation model: {} users, {} sources, {} variables, {} infeasible pairs",
        users.len(),
        sources.len(),
        sources.len() * users.len() + users.len() + sources.len() + 1,
        problem.infeasible_pairs().len(),
    );

    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::RecordingBackend;
    use crate::domain::{InfeasiblePairSet, Source, User};

    fn problem() -> AllocationProblem {
        AllocationProblem::new(
            vec![
                User::new("HH", 50.0, 0.5, 2.0),
                User::new("PG", 200.0, 1.0, 1.0),
            ],
            vec![
                Source::new("GW", 75.0, 0.2, 1.0, 5.0),
                Source::new("SW", 75.0, 0.1, 1.0, 1.0),
                Source::new("WW", 300.0, 1.0, 1.0, 3.0),
            ],
            1000.0,
            InfeasiblePairSet::new().with("GW", "PG"),
        )
        .expect("valid problem")
    }

    #[test]
    fn creates_one_variable_per_pair_slack_and_budget() {
        let mut backend = RecordingBackend::default();
        formulate(&problem(), &mut backend);
        // 3×2 allocations + 2 deficits + 3 over-extractions + budget_used
        assert_eq!(backend.variables.len(), 12);
    }

    #[test]
    fn fixes_infeasible_pairs_at_zero_without_removing_them() {
        let mut backend = RecordingBackend::default();
        let model = formulate(&problem(), &mut backend);
        // (GW, PG) is source 0, user 1
        let handle = model.allocation(0, 1);
        assert_eq!(backend.variables[handle.index()], (0.0, Some(0.0)));
        // an allowed pair stays unbounded above
        let open = model.allocation(1, 1);
        assert_eq!(backend.variables[open.index()], (0.0, None));
    }

    #[test]
    fn caps_budget_used_by_the_budget() {
        let mut backend = RecordingBackend::default();
        let model = formulate(&problem(), &mut backend);
        assert_eq!(
            backend.variables[model.budget_used().index()],
            (0.0, Some(1000.0))
        );
    }

    #[test]
    fn emits_demand_supply_quality_and_budget_rows() {
        let mut backend = RecordingBackend::default();
        formulate(&problem(), &mut backend);
        // 2 demand + 3 supply + 2 quality + 1 budget equality
        assert_eq!(backend.constraints.len(), 8);

        let demand = &backend.constraints[0];
        assert_eq!(demand.1, Relation::GreaterThanOrEqual);
        assert_eq!(demand.2, 50.0);

        let supply = &backend.constraints[2];
        assert_eq!(supply.1, Relation::LessThanOrEqual);
        assert_eq!(supply.2, 75.0);

        let budget = backend.constraints.last().unwrap();
        assert_eq!(budget.1, Relation::Equal);
        assert_eq!(budget.2, 0.0);
    }

    #[test]
    fn quality_rows_use_concentration_gaps() {
        let mut backend = RecordingBackend::default();
        let model = formulate(&problem(), &mut backend);
        // quality row for HH (user 0) follows the 3 supply rows
        let (expr, relation, bound) = &backend.constraints[5];
        assert_eq!(*relation, Relation::LessThanOrEqual);
        assert_eq!(*bound, 0.0);
        let coefficient_of = |handle| {
            expr.terms()
                .iter()
                .find(|(var, _)| *var == handle)
                .map(|(_, c)| *c)
                .unwrap()
        };
        assert!((coefficient_of(model.allocation(0, 0)) - (0.2 - 0.5)).abs() < 1e-12);
        assert!((coefficient_of(model.allocation(2, 0)) - (1.0 - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn objective_carries_penalty_weights_only() {
        let mut backend = RecordingBackend::default();
        let model = formulate(&problem(), &mut backend);
        let objective = backend.objective.expect("objective set");
        assert_eq!(objective.terms().len(), 5);
        assert!(objective
            .terms()
            .contains(&(model.deficit(0), 2.0)));
        assert!(objective
            .terms()
            .contains(&(model.over_extraction(2), 1.0)));
    }
}
