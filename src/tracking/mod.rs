//! Affiliate tracking links and their click/registration/deposit events

pub mod model;
pub mod store;

pub use model::*;
pub use store::TrackingStore;
