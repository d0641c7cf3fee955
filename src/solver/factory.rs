use crate::domain::{solver_adapter::LpBackend, value_objects::SolverBackend};
#[cfg(feature = "highs")]
use crate::solver::HighsBackend;
use crate::solver::ClarabelBackend;

/// Factory for creating LP backend instances. Each instance is owned by
/// exactly one build/solve cycle.
pub struct SolverFactory;

impl SolverFactory {
    pub fn create(backend: SolverBackend) -> Box<dyn LpBackend> {
        match backend {
            SolverBackend::Auto | SolverBackend::Clarabel => Box::new(ClarabelBackend::new()),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => Box::new(HighsBackend::new()),
        }
    }

    /// Default engine (Clarabel)
    pub fn default_backend() -> Box<dyn LpBackend> {
        Box::new(ClarabelBackend::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_selects_clarabel() {
        assert_eq!(SolverFactory::create(SolverBackend::Auto).name(), "Clarabel");
        assert_eq!(SolverFactory::default_backend().name(), "Clarabel");
    }

    #[cfg(feature = "highs")]
    #[test]
    fn highs_is_selectable() {
        assert_eq!(SolverFactory::create(SolverBackend::Highs).name(), "HiGHS");
    }
}
