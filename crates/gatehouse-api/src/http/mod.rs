//! HTTP surface: login filter, adapter, handlers and operational routes.

pub mod adapter;
pub(crate) mod constants;
pub(crate) mod errors;
pub mod filter;
pub mod handlers;
pub(crate) mod health;
pub mod router;
pub mod store;
pub mod submission;
pub(crate) mod telemetry;
#[cfg(test)]
pub(crate) mod test_support;
