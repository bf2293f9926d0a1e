#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Environment-backed configuration for the Gatehouse login gateway.
//!
//! Layout: `model.rs` (typed settings), `validate.rs` (parsing helpers),
//! `loader.rs` (environment and user file loading), `error.rs`.

pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_from_env, load_with, load_users_file};
pub use model::{AppConfig, LoginSettings, LoggingSettings, UserSeed};
