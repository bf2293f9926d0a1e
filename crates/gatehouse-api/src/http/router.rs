//! Router construction and server bootstrap.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, http::Request, routing::get};
use gatehouse_telemetry::{Metrics, build_sha};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::filter::LoginFilterLayer;
use crate::http::health::{health, metrics, not_found};
use crate::http::telemetry::HttpMetricsLayer;
use crate::state::ApiState;

/// Axum router wrapper hosting the login endpoint and operational routes.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build the router with `login` layered in front of every route.
    ///
    /// Login attempts are counted in `telemetry`.
    #[must_use]
    pub fn new(login: LoginFilterLayer, telemetry: Metrics) -> Self {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(gatehouse_telemetry::set_request_id_layer())
            .layer(gatehouse_telemetry::propagate_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry.clone(), login.handler()))
            .layer(login.with_metrics(telemetry.clone()));

        // The login path has no route of its own; the filter intercepts it on
        // the fallback, so layering must happen after the fallback is set.
        let router = Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .fallback(not_found)
            .layer(layered)
            .with_state(ApiState::new(telemetry));

        Self { router }
    }

    /// Serve until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError::Bind`] when the listener cannot be opened and
    /// [`ApiServerError::Serve`] when the server loop fails.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(%addr, "starting gatehouse api");
        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|source| ApiServerError::Serve { source })
    }

    /// Consume the server, returning the configured router.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }
}
