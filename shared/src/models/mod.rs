//! Domain models for the Festa Buffet ordering platform

mod order;
mod party_type;

pub use order::*;
pub use party_type::*;
