//! Recording collaborators for adapter and filter tests.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gatehouse_auth::{Authentication, AuthenticationError, BoxError, LoginRequest};

use crate::http::handlers::{FailureHandler, SuccessHandler};
use crate::http::store::LoginRequestStore;
use crate::http::submission::LoginSubmission;

#[derive(Default)]
pub(crate) struct RecordingSuccessHandler {
    received: Mutex<Vec<Authentication>>,
}

impl RecordingSuccessHandler {
    pub(crate) fn received(&self) -> Vec<Authentication> {
        self.received.lock().expect("success lock").clone()
    }
}

#[async_trait]
impl SuccessHandler for RecordingSuccessHandler {
    async fn on_authentication_success(
        &self,
        _submission: &LoginSubmission,
        authentication: Authentication,
    ) -> Response {
        self.received
            .lock()
            .expect("success lock")
            .push(authentication);
        StatusCode::OK.into_response()
    }
}

/// Records the `kind()` of every failure it sees.
#[derive(Default)]
pub(crate) struct RecordingFailureHandler {
    received: Mutex<Vec<String>>,
}

impl RecordingFailureHandler {
    pub(crate) fn received(&self) -> Vec<String> {
        self.received.lock().expect("failure lock").clone()
    }
}

#[async_trait]
impl FailureHandler for RecordingFailureHandler {
    async fn on_authentication_failure(
        &self,
        _submission: &LoginSubmission,
        failure: AuthenticationError,
    ) -> Response {
        let status = if failure.is_rejection() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        self.received
            .lock()
            .expect("failure lock")
            .push(failure.kind().to_string());
        status.into_response()
    }
}

/// Store whose `associate` always fails with the produced error.
pub(crate) struct FailingStore {
    make_error: Box<dyn Fn() -> BoxError + Send + Sync>,
}

impl FailingStore {
    pub(crate) fn new(make_error: impl Fn() -> BoxError + Send + Sync + 'static) -> Self {
        Self {
            make_error: Box::new(make_error),
        }
    }
}

impl LoginRequestStore for FailingStore {
    fn associate(&self, _submission: &mut LoginSubmission) -> Result<(), BoxError> {
        Err((self.make_error)())
    }

    fn lookup(&self, submission: &LoginSubmission) -> Option<LoginRequest> {
        submission.extensions().get::<LoginRequest>().cloned()
    }
}
