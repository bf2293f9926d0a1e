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

//! Authentication domain types shared by the Gatehouse HTTP layer.
//!
//! Layout: `model.rs` (login request, tokens, authentication results),
//! `error.rs` (failure taxonomy), `service.rs` (`AuthenticationService`),
//! `password.rs` (argon2-backed in-memory directory).

pub mod error;
pub mod model;
pub mod password;
pub mod service;

pub use error::{AuthenticationError, BoxError, PasswordError};
pub use model::{Authentication, AuthenticationDetails, LoginRequest, UsernamePasswordToken};
pub use password::{PasswordAuthenticator, UserAccount, hash_password, verify_password};
pub use service::AuthenticationService;
