//! Back-office notes attached to an affiliate, with file attachments

pub mod model;
pub mod store;

pub use model::*;
pub use store::AnnotationStore;
