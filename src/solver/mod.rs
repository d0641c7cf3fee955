// Solver adapters module

pub mod clarabel_backend;
pub mod factory;
#[cfg(feature = "highs")]
pub mod highs_backend;

pub use clarabel_backend::ClarabelBackend;
pub use factory::SolverFactory;
#[cfg(feature = "highs")]
pub use highs_backend::HighsBackend;
