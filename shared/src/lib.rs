//! Shared types and domain logic for the Festa Buffet ordering platform
//!
//! This crate contains the models and the pure pricing/scheduling
//! computations shared between the backend and any other components of
//! the system.

pub mod models;
pub mod pricing;
pub mod scheduling;
pub mod types;
pub mod validation;

pub use models::*;
pub use pricing::*;
pub use scheduling::*;
pub use types::*;
pub use validation::*;
