// Solver adapter capability consumed by the formulator.
// Concrete LP engines live in the solver module; the domain only sees this
// trait (Dependency Inversion Principle).

use super::value_objects::{Relation, SolveStatus};

/// Opaque handle to a decision variable, scoped to one backend instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableHandle(usize);

impl VariableHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Finite weighted sum of variable handles.
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    terms: Vec<(VariableHandle, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-term expression `coefficient * variable`.
    pub fn term(variable: VariableHandle, coefficient: f64) -> Self {
        Self {
            terms: vec![(variable, coefficient)],
        }
    }

    pub fn add_term(&mut self, variable: VariableHandle, coefficient: f64) {
        self.terms.push((variable, coefficient));
    }

    pub fn with_term(mut self, variable: VariableHandle, coefficient: f64) -> Self {
        self.add_term(variable, coefficient);
        self
    }

    pub fn terms(&self) -> &[(VariableHandle, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Error raised by a concrete LP engine
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("solver execution failed: {0}")]
    ExecutionFailed(String),
}

/// Capability over an external LP engine.
///
/// The formulator builds the model incrementally through this trait and never
/// inspects engine internals beyond the returned status and values. One
/// instance is exclusively owned by one build/solve cycle; a second scenario
/// takes a fresh instance.
pub trait LpBackend {
    /// Create a non-negative-or-bounded variable; `upper` of `None` means
    /// unbounded above.
    fn add_variable(&mut self, lower: f64, upper: Option<f64>) -> VariableHandle;

    /// Add the constraint `expr <relation> bound`.
    fn add_constraint(&mut self, expr: LinearExpr, relation: Relation, bound: f64);

    /// Set the objective to minimize.
    fn set_objective(&mut self, objective: LinearExpr);

    /// Run the engine. Engine execution failures (as opposed to infeasible or
    /// unbounded models, which are regular statuses) surface as `SolverError`.
    fn solve(&mut self) -> Result<SolveStatus, SolverError>;

    /// Value of a variable; `Some` only after a solve that produced values.
    fn value_of(&self, variable: VariableHandle) -> Option<f64>;

    /// Name of this engine, for diagnostics.
    fn name(&self) -> &str;
}
