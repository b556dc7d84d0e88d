//! Public information requests.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{ContactDraft, ContactRequest};
pub use repository::ContactRepository;
pub use router::contact_router;
pub use service::{ContactError, ContactService};

#[cfg(test)]
mod tests;
