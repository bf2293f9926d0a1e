//! Shared state for the operational routes.

use gatehouse_telemetry::Metrics;

/// State handed to `/health` and `/metrics`.
#[derive(Clone)]
pub(crate) struct ApiState {
    pub(crate) telemetry: Metrics,
}

impl ApiState {
    pub(crate) const fn new(telemetry: Metrics) -> Self {
        Self { telemetry }
    }
}
