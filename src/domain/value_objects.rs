// Domain value objects representing core allocation concepts

use std::fmt;

/// Identifier of a demand-side user class (households, agriculture, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a supply-side source (groundwater, surface water, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sense of a linear constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

/// Status reported by the LP engine after a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Found optimal solution
    Optimal,
    /// Found feasible solution (may not be optimal)
    Feasible,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
}

impl SolveStatus {
    /// True for statuses under which variable values are defined.
    pub fn has_values(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Feasible => write!(f, "Feasible"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Unbounded => write!(f, "Unbounded"),
        }
    }
}

/// LP engine to solve with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverBackend {
    /// Automatically select the default engine
    #[default]
    Auto,
    /// Clarabel interior-point solver (pure Rust)
    Clarabel,
    /// HiGHS solver
    #[cfg(feature = "highs")]
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::Clarabel => write!(f, "Clarabel"),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}
