//! Business logic services for the Festa Buffet Platform

pub mod allocation;
pub mod catalog;
pub mod cost;
pub mod order;
pub mod quote;
pub mod scheduling;

pub use allocation::AllocationService;
pub use catalog::CatalogService;
pub use cost::CostService;
pub use order::OrderService;
pub use quote::QuoteService;
pub use scheduling::SchedulingService;
