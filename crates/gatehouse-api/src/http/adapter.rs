//! Username/password login attempt bound to a single endpoint.
//!
//! # Design
//!
//! - The adapter owns no per-request state. The parsed credentials travel in
//!   the submission's extensions through a [`LoginRequestStore`].
//! - Rejections reach the failure handler untouched. Any other failure is
//!   normalized into `AuthenticationError::InternalService` with the original
//!   error kept as its source.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, Uri};
use axum::response::Response;
use gatehouse_auth::{
    Authentication, AuthenticationError, AuthenticationService, UsernamePasswordToken,
};
use thiserror::Error;

use crate::http::handlers::{FailureHandler, SuccessHandler};
use crate::http::store::LoginRequestStore;
use crate::http::submission::LoginSubmission;

/// Contract between [`LoginFilterLayer`](crate::LoginFilterLayer) and the
/// component that performs the attempt.
#[async_trait]
pub trait AuthenticationAttemptHandler: Send + Sync {
    /// Whether a request to `uri` is a login attempt.
    fn requires_authentication(&self, uri: &Uri) -> bool;

    /// Authenticate the submission.
    ///
    /// # Errors
    ///
    /// Returns the rejection from the authentication service, or
    /// `InternalService` for any other failure.
    async fn attempt_authentication(
        &self,
        submission: &mut LoginSubmission,
    ) -> Result<Authentication, AuthenticationError>;

    /// Response for a successful attempt.
    async fn on_authentication_success(
        &self,
        submission: &LoginSubmission,
        authentication: Authentication,
    ) -> Response;

    /// Response for a failed attempt.
    async fn on_authentication_failure(
        &self,
        submission: &LoginSubmission,
        failure: AuthenticationError,
    ) -> Response;
}

/// Invalid adapter wiring.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdapterConfigError {
    /// The login path is not an absolute path.
    #[error("login path must start with '/': {path:?}")]
    InvalidPath {
        /// Rejected path.
        path: String,
    },
}

/// Login adapter that reads credentials from a [`LoginRequestStore`] and
/// delegates verification to an [`AuthenticationService`].
#[derive(Clone)]
pub struct LoginRequestAdapter {
    path: String,
    post_only: bool,
    authentication_service: Arc<dyn AuthenticationService>,
    success_handler: Arc<dyn SuccessHandler>,
    failure_handler: Arc<dyn FailureHandler>,
    login_request_store: Arc<dyn LoginRequestStore>,
}

impl LoginRequestAdapter {
    /// Wire an adapter for `path`. Only `POST` is accepted until
    /// [`with_post_only`](Self::with_post_only) says otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterConfigError::InvalidPath`] when `path` does not start
    /// with `/`.
    pub fn new(
        path: impl Into<String>,
        authentication_service: Arc<dyn AuthenticationService>,
        success_handler: Arc<dyn SuccessHandler>,
        failure_handler: Arc<dyn FailureHandler>,
        login_request_store: Arc<dyn LoginRequestStore>,
    ) -> Result<Self, AdapterConfigError> {
        let path = path.into();
        if !path.starts_with('/') {
            return Err(AdapterConfigError::InvalidPath { path });
        }
        Ok(Self {
            path,
            post_only: true,
            authentication_service,
            success_handler,
            failure_handler,
            login_request_store,
        })
    }

    /// Accept only `POST` submissions when `true`.
    #[must_use]
    pub const fn with_post_only(mut self, post_only: bool) -> Self {
        self.post_only = post_only;
        self
    }

    /// Username of the associated login request, or `""` when none is associated.
    #[must_use]
    pub fn obtain_username(&self, submission: &LoginSubmission) -> String {
        self.login_request_store
            .lookup(submission)
            .map(|login| login.username().to_string())
            .unwrap_or_default()
    }

    /// Password of the associated login request, or `""` when none is associated.
    #[must_use]
    pub fn obtain_password(&self, submission: &LoginSubmission) -> String {
        self.login_request_store
            .lookup(submission)
            .map(|login| login.password().to_string())
            .unwrap_or_default()
    }

    async fn authenticate_submission(
        &self,
        submission: &mut LoginSubmission,
    ) -> Result<Authentication, AuthenticationError> {
        self.login_request_store
            .associate(submission)
            .map_err(AuthenticationError::internal)?;

        if self.post_only && submission.method() != Method::POST {
            return Err(AuthenticationError::MethodNotSupported {
                method: submission.method().to_string(),
            });
        }

        let username = self.obtain_username(submission);
        let password = self.obtain_password(submission);
        let token = UsernamePasswordToken::new(username.trim(), password, submission.details());
        self.authentication_service.authenticate(token).await
    }
}

#[async_trait]
impl AuthenticationAttemptHandler for LoginRequestAdapter {
    fn requires_authentication(&self, uri: &Uri) -> bool {
        uri.path() == self.path
    }

    async fn attempt_authentication(
        &self,
        submission: &mut LoginSubmission,
    ) -> Result<Authentication, AuthenticationError> {
        self.authenticate_submission(submission)
            .await
            .map_err(AuthenticationError::normalize)
    }

    async fn on_authentication_success(
        &self,
        submission: &LoginSubmission,
        authentication: Authentication,
    ) -> Response {
        self.success_handler
            .on_authentication_success(submission, authentication)
            .await
    }

    async fn on_authentication_failure(
        &self,
        submission: &LoginSubmission,
        failure: AuthenticationError,
    ) -> Response {
        self.failure_handler
            .on_authentication_failure(submission, failure)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    use axum::body::Bytes;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use gatehouse_auth::{BoxError, LoginRequest};
    use gatehouse_test_support::StaticAuthenticationService;

    use crate::http::store::RequestAttributeStore;
    use crate::http::test_support::{FailingStore, RecordingFailureHandler, RecordingSuccessHandler};

    struct Harness {
        adapter: LoginRequestAdapter,
        service: Arc<StaticAuthenticationService>,
        success: Arc<RecordingSuccessHandler>,
        failure: Arc<RecordingFailureHandler>,
    }

    fn harness_with(
        service: StaticAuthenticationService,
        store: Arc<dyn LoginRequestStore>,
    ) -> anyhow::Result<Harness> {
        let service = Arc::new(service);
        let success = Arc::new(RecordingSuccessHandler::default());
        let failure = Arc::new(RecordingFailureHandler::default());
        let adapter = LoginRequestAdapter::new(
            "/login",
            service.clone(),
            success.clone(),
            failure.clone(),
            store,
        )?;
        Ok(Harness {
            adapter,
            service,
            success,
            failure,
        })
    }

    fn harness(service: StaticAuthenticationService) -> anyhow::Result<Harness> {
        harness_with(service, Arc::new(RequestAttributeStore::default()))
    }

    fn json_submission(method: &str, body: &'static str) -> LoginSubmission {
        LoginSubmission::from_request(
            Request::builder()
                .method(method)
                .uri("/login")
                .header(CONTENT_TYPE, "application/json")
                .body(Bytes::from_static(body.as_bytes()))
                .expect("request"),
        )
    }

    #[test]
    fn relative_path_is_rejected() -> anyhow::Result<()> {
        let valid = harness(StaticAuthenticationService::rejecting())?;
        let err = LoginRequestAdapter::new(
            "login",
            valid.service,
            valid.success,
            valid.failure,
            Arc::new(RequestAttributeStore::default()),
        )
        .err();
        assert_eq!(
            err,
            Some(AdapterConfigError::InvalidPath {
                path: "login".into()
            })
        );
        Ok(())
    }

    #[test]
    fn matches_only_the_configured_path() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::rejecting())?;
        assert!(h.adapter.requires_authentication(&Uri::from_static("/login")));
        assert!(h.adapter.requires_authentication(&Uri::from_static("/login?next=/home")));
        assert!(!h.adapter.requires_authentication(&Uri::from_static("/login/extra")));
        assert!(!h.adapter.requires_authentication(&Uri::from_static("/health")));
        Ok(())
    }

    #[test]
    fn obtain_reads_the_associated_request() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::rejecting())?;
        let mut submission = json_submission("POST", "");
        submission
            .extensions_mut()
            .insert(LoginRequest::new("alice", "secret"));
        assert_eq!(h.adapter.obtain_username(&submission), "alice");
        assert_eq!(h.adapter.obtain_password(&submission), "secret");
        Ok(())
    }

    #[test]
    fn obtain_defaults_to_empty_strings() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::rejecting())?;
        let submission = json_submission("POST", "");
        assert_eq!(h.adapter.obtain_username(&submission), "");
        assert_eq!(h.adapter.obtain_password(&submission), "");
        Ok(())
    }

    #[tokio::test]
    async fn credentials_reach_the_service_trimmed() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::accepting(["ROLE_USER"]))?;
        let mut submission = json_submission("POST", r#"{"username":"  alice ","password":" secret "}"#);
        let authentication = h.adapter.attempt_authentication(&mut submission).await?;
        assert_eq!(authentication.principal, "alice");
        assert_eq!(
            h.service.calls(),
            vec![("alice".to_string(), " secret ".to_string())]
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_body_authenticates_empty_credentials() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::rejecting())?;
        let mut submission = json_submission("POST", "");
        let err = h
            .adapter
            .attempt_authentication(&mut submission)
            .await
            .expect_err("rejected");
        assert!(matches!(err, AuthenticationError::BadCredentials));
        assert_eq!(h.service.calls(), vec![(String::new(), String::new())]);
        Ok(())
    }

    #[tokio::test]
    async fn store_failure_becomes_internal_service() -> anyhow::Result<()> {
        let store: Arc<dyn LoginRequestStore> =
            Arc::new(FailingStore::new(|| -> BoxError { Box::new(io::Error::other("store down")) }));
        let h = harness_with(StaticAuthenticationService::accepting(["ROLE_USER"]), store)?;
        let mut submission = json_submission("POST", r#"{"username":"alice"}"#);
        let err = h
            .adapter
            .attempt_authentication(&mut submission)
            .await
            .expect_err("store failure");

        assert_eq!(err.kind(), "internal_service");
        assert_eq!(err.to_string(), "store down");
        let source = err.source().expect("source kept");
        assert!(source.downcast_ref::<io::Error>().is_some());
        assert!(h.service.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_is_refused_when_post_only() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::accepting(["ROLE_USER"]))?;
        let mut submission = json_submission("GET", r#"{"username":"alice","password":"secret"}"#);
        let err = h
            .adapter
            .attempt_authentication(&mut submission)
            .await
            .expect_err("GET refused");
        assert_eq!(err.kind(), "internal_service");
        let inner = err
            .source()
            .and_then(|source| source.downcast_ref::<AuthenticationError>());
        assert!(matches!(
            inner,
            Some(AuthenticationError::MethodNotSupported { method }) if method == "GET"
        ));
        assert!(h.service.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_is_accepted_when_post_only_is_off() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::accepting(["ROLE_USER"]))?;
        let adapter = h.adapter.with_post_only(false);
        let mut submission = json_submission("GET", r#"{"username":"alice","password":"secret"}"#);
        let authentication = adapter.attempt_authentication(&mut submission).await?;
        assert_eq!(authentication.principal, "alice");
        Ok(())
    }

    #[tokio::test]
    async fn service_failure_is_normalized() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::failing_with(|| {
            AuthenticationError::MethodNotSupported {
                method: "LDAP".into(),
            }
        }))?;
        let mut submission = json_submission("POST", r#"{"username":"alice","password":"x"}"#);
        let err = h
            .adapter
            .attempt_authentication(&mut submission)
            .await
            .expect_err("service failure");
        assert_eq!(err.kind(), "internal_service");
        assert_eq!(err.to_string(), "authentication method not supported");
        Ok(())
    }

    #[tokio::test]
    async fn success_is_forwarded_once_with_the_original_authentication() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::accepting(["ROLE_ADMIN"]))?;
        let mut submission = json_submission("POST", r#"{"username":"alice","password":"secret"}"#);
        let authentication = h.adapter.attempt_authentication(&mut submission).await?;
        let response = h
            .adapter
            .on_authentication_success(&submission, authentication.clone())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(h.success.received(), vec![authentication]);
        assert!(h.failure.received().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rejection_is_forwarded_once_unchanged() -> anyhow::Result<()> {
        let h = harness(StaticAuthenticationService::rejecting())?;
        let mut submission = json_submission("POST", r#"{"username":"alice","password":"nope"}"#);
        let failure = h
            .adapter
            .attempt_authentication(&mut submission)
            .await
            .expect_err("rejected");
        let response = h.adapter.on_authentication_failure(&submission, failure).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(h.failure.received(), vec!["bad_credentials".to_string()]);
        assert!(h.success.received().is_empty());
        Ok(())
    }
}
