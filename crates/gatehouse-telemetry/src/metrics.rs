//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes the counters relevant to the login gateway.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Outcome label recorded for each login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials were accepted.
    Success,
    /// Credentials were rejected by the authentication service.
    Rejected,
    /// The attempt failed for an internal reason.
    Error,
}

impl LoginOutcome {
    /// Label value used in the `login_attempts_total` counter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }
}

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    login_attempts_total: IntCounterVec,
}

/// Snapshot of the login counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Successful login attempts.
    pub login_success_total: u64,
    /// Login attempts rejected by the authentication service.
    pub login_rejected_total: u64,
    /// Login attempts that failed for any reason other than a rejection.
    pub login_error_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "http_requests_total",
            source,
        })?;
        let login_attempts_total = IntCounterVec::new(
            Opts::new("login_attempts_total", "Login attempts by outcome"),
            &["outcome"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "login_attempts_total",
            source,
        })?;

        registry
            .register(Box::new(http_requests_total.clone()))
            .map_err(|source| TelemetryError::MetricsRegister {
                name: "http_requests_total",
                source,
            })?;
        registry
            .register(Box::new(login_attempts_total.clone()))
            .map_err(|source| TelemetryError::MetricsRegister {
                name: "login_attempts_total",
                source,
            })?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                login_attempts_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        let code = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[route, code.as_str()])
            .inc();
    }

    /// Increment the login attempt counter for the given outcome.
    pub fn inc_login_attempt(&self, outcome: LoginOutcome) {
        self.inner
            .login_attempts_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Take a point-in-time snapshot of the login counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let attempts = |outcome: LoginOutcome| {
            self.inner
                .login_attempts_total
                .with_label_values(&[outcome.as_str()])
                .get()
        };
        MetricsSnapshot {
            login_success_total: attempts(LoginOutcome::Success),
            login_rejected_total: attempts(LoginOutcome::Rejected),
            login_error_total: attempts(LoginOutcome::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_snapshot_reflects_updates() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_http_request("/login", 200);
        metrics.inc_login_attempt(LoginOutcome::Success);
        metrics.inc_login_attempt(LoginOutcome::Rejected);
        metrics.inc_login_attempt(LoginOutcome::Rejected);
        metrics.inc_login_attempt(LoginOutcome::Error);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.login_success_total, 1);
        assert_eq!(snapshot.login_rejected_total, 2);
        assert_eq!(snapshot.login_error_total, 1);

        let rendered = metrics.render()?;
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains("login_attempts_total{outcome=\"rejected\"} 2"));
        Ok(())
    }

    #[test]
    fn fresh_registry_reports_zero_attempts() -> Result<()> {
        let snapshot = Metrics::new()?.snapshot();
        assert_eq!(snapshot.login_success_total, 0);
        assert_eq!(snapshot.login_rejected_total, 0);
        assert_eq!(snapshot.login_error_total, 0);
        Ok(())
    }
}
