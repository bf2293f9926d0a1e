//! HTTP login endpoint for Gatehouse.
//!
//! A [`LoginFilterLayer`] intercepts submissions to the configured path and
//! hands them to a [`LoginRequestAdapter`], which reads the credentials through
//! a [`LoginRequestStore`], verifies them with an
//! [`AuthenticationService`](gatehouse_auth::AuthenticationService), and renders
//! the outcome through the configured [`SuccessHandler`] or [`FailureHandler`].

pub mod error;
pub mod http;
pub mod models;
pub(crate) mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::adapter::{AdapterConfigError, AuthenticationAttemptHandler, LoginRequestAdapter};
pub use http::filter::{LoginFilterLayer, LoginFilterService};
pub use http::handlers::{FailureHandler, JsonSuccessHandler, ProblemFailureHandler, SuccessHandler};
pub use http::router::ApiServer;
pub use http::store::{LoginRequestError, LoginRequestStore, RequestAttributeStore};
pub use http::submission::LoginSubmission;
