// Clarabel Backend Adapter
// Implements the LpBackend capability over good_lp's pure-Rust Clarabel
// solver. Variables and constraints are buffered and the good_lp model is
// built when solve() is called.

use crate::domain::{
    solver_adapter::{LinearExpr, LpBackend, SolverError, VariableHandle},
    value_objects::{Relation, SolveStatus},
};
use good_lp::{
    solvers::clarabel::clarabel, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolution, SolverModel,
};

struct Column {
    lower: f64,
    upper: Option<f64>,
}

struct Row {
    expr: LinearExpr,
    relation: Relation,
    bound: f64,
}

pub struct ClarabelBackend {
    columns: Vec<Column>,
    rows: Vec<Row>,
    objective: LinearExpr,
    values: Option<Vec<f64>>,
}

impl ClarabelBackend {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            objective: LinearExpr::new(),
            values: None,
        }
    }
}

impl Default for ClarabelBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LpBackend for ClarabelBackend {
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
        let mut vars = variables!();
        let mut lp_variables = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let mut definition = variable().min(column.lower);
            if let Some(upper) = column.upper {
                definition = definition.max(upper);
            }
            lp_variables.push(vars.add(definition));
        }

        let mut objective: Expression = 0.into();
        for &(var, coefficient) in self.objective.terms() {
            if coefficient != 0.0 {
                objective += coefficient * lp_variables[var.index()];
            }
        }

        let mut model = vars.minimise(objective).using(clarabel);
        for row in &self.rows {
            let mut lhs: Expression = 0.into();
            for &(var, coefficient) in row.expr.terms() {
                if coefficient != 0.0 {
                    lhs += coefficient * lp_variables[var.index()];
                }
            }
            model = model.with(match row.relation {
                Relation::LessThanOrEqual => lhs.leq(row.bound),
                Relation::Equal => lhs.eq(row.bound),
                Relation::GreaterThanOrEqual => lhs.geq(row.bound),
            });
        }

        match model.solve() {
            Ok(solution) => {
                self.values = Some(
                    lp_variables
                        .iter()
                        .map(|&var| solution.value(var))
                        .collect(),
                );
                Ok(SolveStatus::Optimal)
            }
            Err(ResolutionError::Infeasible) => Ok(SolveStatus::Infeasible),
            Err(ResolutionError::Unbounded) => Ok(SolveStatus::Unbounded),
            Err(error) => Err(SolverError::ExecutionFailed(format!("{error:?}"))),
        }
    }

    fn value_of(&self, variable: VariableHandle) -> Option<f64> {
        self.values
            .as_ref()
            .and_then(|values| values.get(variable.index()).copied())
    }

    fn name(&self) -> &str {
        "Clarabel"
    }
}
