// Domain module: allocation records, solver capability and errors

pub mod errors;
pub mod models;
pub mod solver_adapter;
pub mod value_objects;

pub use errors::*;
pub use models::*;
pub use solver_adapter::*;
pub use value_objects::*;
