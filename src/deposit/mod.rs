//! Affiliate deposits, their audit log and status rollups

pub mod model;
pub mod store;

pub use model::*;
pub use store::DepositStore;
