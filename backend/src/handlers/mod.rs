//! HTTP handlers for the Festa Buffet Platform

mod availability;
mod health;
mod order;
mod party_type;
mod quote;

pub use availability::*;
pub use health::*;
pub use order::*;
pub use party_type::*;
pub use quote::*;
