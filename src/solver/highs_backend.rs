// HiGHS Backend Adapter
// Implements the LpBackend capability over the HiGHS solver. HiGHS takes
// objective coefficients at column-creation time, so everything is buffered
// and the RowProblem is assembled when solve() is called.

use crate::domain::{
    solver_adapter::{LinearExpr, LpBackend, SolverError, VariableHandle},
    value_objects::{Relation, SolveStatus},
};
use highs::{HighsModelStatus, RowProblem, Sense};

struct Column {
    lower: f64,
    upper: Option<f64>,
}

struct Row {
    expr: LinearExpr,
    relation: Relation,
    bound: f64,
}

pub struct HighsBackend {
    columns: Vec<Column>,
    rows: Vec<Row>,
    objective: LinearExpr,
    values: Option<Vec<f64>>,
}

impl HighsBackend {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            objective: LinearExpr::new(),
            values: None,
        }
    }
}

impl Default for HighsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LpBackend for HighsBackend {
    fn add_variable(&mut self, lower: f64, upper: Option<f64>) -> VariableHandle {
        self.columns.push(Column { lower, upper });
        VariableHandle::new(self.columns.len() - 1)
    }

    fn add_constraint(&mut self, expr: LinearExpr, relation: Relation, bound: f64) {
        self.rows.push(Row {
            expr,
            relation,
            bound,
        });
    }

    fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    fn solve(&mut self) -> Result<SolveStatus, SolverError> {
        let mut objective_coefficients = vec![0.0; self.columns.len()];
        for &(var, coefficient) in self.objective.terms() {
            objective_coefficients[var.index()] += coefficient;
        }

        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(self.columns.len());
        for (i, column) in self.columns.iter().enumerate() {
            let upper = column.upper.unwrap_or(f64::INFINITY);
            cols.push(pb.add_column(objective_coefficients[i], column.lower..upper));
        }

        for row in &self.rows {
            let mut terms = Vec::new();
            for &(var, coefficient) in row.expr.terms() {
                if coefficient != 0.0 {
                    terms.push((cols[var.index()], coefficient));
                }
            }
            match row.relation {
                Relation::LessThanOrEqual => {
                    pb.add_row(..=row.bound, &terms);
                }
                Relation::Equal => {
                    pb.add_row(row.bound..=row.bound, &terms);
                }
                Relation::GreaterThanOrEqual => {
                    pb.add_row(row.bound.., &terms);
                }
            }
        }

        let solved = pb.optimise(Sense::Minimise).solve();
        match solved.status() {
            HighsModelStatus::Optimal => {
                self.values = Some(solved.get_solution().columns().to_vec());
                Ok(SolveStatus::Optimal)
            }
            HighsModelStatus::Infeasible => Ok(SolveStatus::Infeasible),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(SolveStatus::Unbounded)
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS returned status {status:?}"
            ))),
        }
    }

    fn value_of(&self, variable: VariableHandle) -> Option<f64> {
        self.values
            .as_ref()
            .and_then(|values| values.get(variable.index()).copied())
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_a_two_variable_lp() {
        let mut backend = HighsBackend::new();
        let x = backend.add_variable(0.0, Some(0.5));
        let y = backend.add_variable(0.0, None);
        backend.add_constraint(
            LinearExpr::term(x, 1.0).with_term(y, 1.0),
            Relation::GreaterThanOrEqual,
            2.0,
        );
        backend.set_objective(LinearExpr::term(x, 1.0).with_term(y, 1.0));

        let status = backend.solve().expect("solve should run");
        assert!(status.has_values());
        let x_val = backend.value_of(x).unwrap();
        let y_val = backend.value_of(y).unwrap();
        assert!((x_val + y_val - 2.0).abs() < 1e-6);
    }

    #[test]
    fn reports_infeasible_models() {
        let mut backend = HighsBackend::new();
        let x = backend.add_variable(0.0, Some(1.0));
        backend.add_constraint(LinearExpr::term(x, 1.0), Relation::GreaterThanOrEqual, 2.0);
        backend.set_objective(LinearExpr::term(x, 1.0));

        assert_eq!(backend.solve().unwrap(), SolveStatus::Infeasible);
    }
}
