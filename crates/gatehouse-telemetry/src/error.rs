//! Telemetry failures: subscriber installation and Prometheus plumbing.

use std::string::FromUtf8Error;

use prometheus::Error as PrometheusError;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised while setting up logging or exporting metrics.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global tracing subscriber was already installed.
    #[error("tracing subscriber already installed")]
    SubscriberInstall {
        /// Error reported by `try_init`.
        source: TryInitError,
    },
    /// A counter vector could not be constructed.
    #[error("invalid metric definition: {name}")]
    MetricsCollector {
        /// Metric name.
        name: &'static str,
        /// Prometheus error.
        source: PrometheusError,
    },
    /// A counter vector was rejected by the registry.
    #[error("metric registration rejected: {name}")]
    MetricsRegister {
        /// Metric name.
        name: &'static str,
        /// Prometheus error.
        source: PrometheusError,
    },
    /// The registry could not be written in text exposition format.
    #[error("metric exposition failed")]
    MetricsEncode {
        /// Prometheus error.
        source: PrometheusError,
    },
    /// The exposition buffer held invalid UTF-8.
    #[error("metric exposition is not utf-8")]
    MetricsUtf8 {
        /// Conversion error.
        source: FromUtf8Error,
    },
}
