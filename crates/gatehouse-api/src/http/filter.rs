//! Tower layer that intercepts login submissions.

use std::error::Error as StdError;
use std::future::Future;
use std::iter;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use axum::body::{Body, Bytes, to_bytes};
use axum::http::request::Parts;
use axum::http::{Request, header::CONTENT_LENGTH};
use axum::response::Response;
use gatehouse_auth::AuthenticationError;
use gatehouse_telemetry::{LoginOutcome, Metrics};
use http_body_util::LengthLimitError;
use tower::{Layer, Service};
use tracing::{error, info, warn};

use crate::http::adapter::AuthenticationAttemptHandler;
use crate::http::handlers::failure_status;
use crate::http::store::LoginRequestError;
use crate::http::submission::LoginSubmission;

/// Routes requests for the login path through an [`AuthenticationAttemptHandler`]
/// and passes everything else to the wrapped service.
#[derive(Clone)]
pub struct LoginFilterLayer {
    handler: Arc<dyn AuthenticationAttemptHandler>,
    max_body_bytes: usize,
    telemetry: Option<Metrics>,
}

impl LoginFilterLayer {
    /// Layer driven by `handler`, buffering at most `max_body_bytes` per attempt.
    #[must_use]
    pub fn new(handler: Arc<dyn AuthenticationAttemptHandler>, max_body_bytes: usize) -> Self {
        Self {
            handler,
            max_body_bytes,
            telemetry: None,
        }
    }

    /// Count attempts in `login_attempts_total`.
    #[must_use]
    pub fn with_metrics(mut self, telemetry: Metrics) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub(crate) fn handler(&self) -> Arc<dyn AuthenticationAttemptHandler> {
        Arc::clone(&self.handler)
    }
}

impl<S> Layer<S> for LoginFilterLayer {
    type Service = LoginFilterService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoginFilterService {
            inner,
            handler: Arc::clone(&self.handler),
            max_body_bytes: self.max_body_bytes,
            telemetry: self.telemetry.clone(),
        }
    }
}

/// Service produced by [`LoginFilterLayer`].
#[derive(Clone)]
pub struct LoginFilterService<S> {
    inner: S,
    handler: Arc<dyn AuthenticationAttemptHandler>,
    max_body_bytes: usize,
    telemetry: Option<Metrics>,
}

impl<S> Service<Request<Body>> for LoginFilterService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if !self.handler.requires_authentication(req.uri()) {
            return Box::pin(self.inner.call(req));
        }

        let handler = Arc::clone(&self.handler);
        let telemetry = self.telemetry.clone();
        let max_body_bytes = self.max_body_bytes;
        Box::pin(async move {
            Ok(process_login(handler.as_ref(), telemetry.as_ref(), max_body_bytes, req).await)
        })
    }
}

async fn process_login(
    handler: &dyn AuthenticationAttemptHandler,
    telemetry: Option<&Metrics>,
    max_body_bytes: usize,
    req: Request<Body>,
) -> Response {
    let (parts, body) = req.into_parts();
    let (submission, outcome) = match read_body(&parts, body, max_body_bytes).await {
        Ok(bytes) => {
            let mut submission = LoginSubmission::new(parts, bytes);
            let outcome = handler.attempt_authentication(&mut submission).await;
            (submission, outcome)
        }
        Err(err) => (
            LoginSubmission::new(parts, Bytes::new()),
            Err(AuthenticationError::internal(err)),
        ),
    };
    let request_id = submission.request_id().unwrap_or_default().to_string();

    match outcome {
        Ok(authentication) => {
            info!(
                principal = %authentication.principal,
                request_id = %request_id,
                "login succeeded"
            );
            record(telemetry, LoginOutcome::Success);
            let mut response = handler
                .on_authentication_success(&submission, authentication.clone())
                .await;
            response.extensions_mut().insert(authentication);
            response
        }
        Err(failure) => {
            if failure.is_rejection() {
                warn!(reason = failure.kind(), request_id = %request_id, "login rejected");
                record(telemetry, LoginOutcome::Rejected);
            } else if failure_status(&failure).is_client_error() {
                warn!(error = %failure, request_id = %request_id, "login request refused");
                record(telemetry, LoginOutcome::Error);
            } else {
                error!(error = %failure, request_id = %request_id, "login attempt failed");
                record(telemetry, LoginOutcome::Error);
            }
            handler.on_authentication_failure(&submission, failure).await
        }
    }
}

async fn read_body(parts: &Parts, body: Body, limit: usize) -> Result<Bytes, LoginRequestError> {
    let declared = parts
        .headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        return Err(LoginRequestError::BodyTooLarge { limit });
    }
    to_bytes(body, limit).await.map_err(|source| {
        if exceeds_limit(&source) {
            LoginRequestError::BodyTooLarge { limit }
        } else {
            LoginRequestError::BodyRead { source }
        }
    })
}

fn exceeds_limit(err: &axum::Error) -> bool {
    iter::successors(Some(err as &(dyn StdError + 'static)), |current| (*current).source())
        .any(|current| current.is::<LengthLimitError>())
}

fn record(telemetry: Option<&Metrics>, outcome: LoginOutcome) {
    if let Some(telemetry) = telemetry {
        telemetry.inc_login_attempt(outcome);
    }
}
