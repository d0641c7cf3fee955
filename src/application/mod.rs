// Application layer: formulation, projection and the solve pipeline

pub mod allocation_service;
pub mod formulator;
pub mod projector;

#[cfg(test)]
pub(crate) mod testing;

pub use allocation_service::{solve_allocation, solve_with};
pub use formulator::{formulate, FormulatedModel};
pub use projector::project;
