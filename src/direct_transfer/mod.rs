//! Affiliate-to-affiliate balance transfers and their audit log

pub mod model;
pub mod store;

pub use model::*;
pub use store::TransferStore;
