// In-memory LpBackend used to exercise the formulator and projector without
// a real engine.

use crate::domain::{
    solver_adapter::{LinearExpr, LpBackend, SolverError, VariableHandle},
    value_objects::{Relation, SolveStatus},
};

#[derive(Default)]
pub struct RecordingBackend {
    pub variables: Vec<(f64, Option<f64>)>,
    pub constraints: Vec<(LinearExpr, Relation, f64)>,
    pub objective: Option<LinearExpr>,
    /// Status to report from solve()
    pub status: Option<SolveStatus>,
    /// Values to hand out after solve(); padded with zeros if short
    pub solution: Vec<f64>,
    solved: bool,
}

impl RecordingBackend {
    pub fn reporting(status: SolveStatus, solution: Vec<f64>) -> Self {
        Self {
            status: Some(status),
            solution,
            ..Self::default()
        }
    }
}

impl LpBackend for RecordingBackend {
    fn add_variable(&mut self, lower: f64, upper: Option<f64>) -> VariableHandle {
        self.variables.push((lower, upper));
        VariableHandle::new(self.variables.len() - 1)
    }

    fn add_constraint(&mut self, expr: LinearExpr, relation: Relation, bound: f64) {
        self.constraints.push((expr, relation, bound));
    }

    fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = Some(objective);
    }

    fn solve(&mut self) -> Result<SolveStatus, SolverError> {
        let status = self
            .status
            .ok_or_else(|| SolverError::ExecutionFailed("no scripted status".to_owned()))?;
        if status.has_values() {
            self.solution.resize(self.variables.len(), 0.0);
            self.solved = true;
        }
        Ok(status)
    }

    fn value_of(&self, variable: VariableHandle) -> Option<f64> {
        if !self.solved {
            return None;
        }
        self.solution.get(variable.index()).copied()
    }

    fn name(&self) -> &str {
        "recording"
    }
}
