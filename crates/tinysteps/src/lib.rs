//! TinySteps: child records, a parents forum, moderated guides and the REST
//! API over them.

pub mod accounts;
pub mod api;
pub mod children;
pub mod config;
pub mod contact;
pub mod engagement;
pub mod error;
pub mod external;
pub mod forum;
pub mod guides;
pub mod ids;
pub mod notifications;
pub mod pagination;
pub mod search;
pub mod storage;
pub mod telemetry;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;
