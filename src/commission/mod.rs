//! Periodic affiliate commissions and their payment state

pub mod model;
pub mod store;

pub use model::*;
pub use store::CommissionStore;
