//! HTTP metrics middleware for request counting.
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use axum::extract::MatchedPath;
use axum::http::Request;
use gatehouse_telemetry::Metrics;
use tower::{Layer, Service};

use crate::http::adapter::AuthenticationAttemptHandler;

/// Route label for requests that match neither a route nor the login path.
pub(crate) const UNMATCHED_ROUTE: &str = "unmatched";

/// Records `http_requests_total` per route and status code.
#[derive(Clone)]
pub(crate) struct HttpMetricsLayer {
    telemetry: Metrics,
    login: Arc<dyn AuthenticationAttemptHandler>,
}

impl HttpMetricsLayer {
    pub(crate) fn new(telemetry: Metrics, login: Arc<dyn AuthenticationAttemptHandler>) -> Self {
        Self { telemetry, login }
    }
}

impl<S> Layer<S> for HttpMetricsLayer {
    type Service = HttpMetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpMetricsService {
            inner,
            telemetry: self.telemetry.clone(),
            login: Arc::clone(&self.login),
        }
    }
}

#[derive(Clone)]
pub(crate) struct HttpMetricsService<S> {
    inner: S,
    telemetry: Metrics,
    login: Arc<dyn AuthenticationAttemptHandler>,
}

impl<S, B> Service<Request<B>> for HttpMetricsService<S>
where
    S: Service<Request<B>, Response = axum::response::Response> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // Raw paths would give every client-chosen URL its own series.
        let route = match req.extensions().get::<MatchedPath>() {
            Some(matched) => matched.as_str().to_string(),
            None if self.login.requires_authentication(req.uri()) => req.uri().path().to_string(),
            None => UNMATCHED_ROUTE.to_string(),
        };
        let telemetry = self.telemetry.clone();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let response = fut.await?;
            telemetry.inc_http_request(&route, response.status().as_u16());
            Ok(response)
        })
    }
}
