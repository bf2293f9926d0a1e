//! Error types for the API server.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::net::SocketAddr;

/// Errors returned by the API server.
#[derive(Debug)]
pub enum ApiServerError {
    /// Binding to the requested address failed.
    Bind {
        /// Address that failed to bind.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Serving the HTTP router failed.
    Serve {
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl Display for ApiServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, .. } => write!(f, "failed to bind {addr}"),
            Self::Serve { .. } => f.write_str("api server failed"),
        }
    }
}

impl Error for ApiServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Bind { source, .. } | Self::Serve { source } => Some(source),
        }
    }
}

/// Convenience result type for API server operations.
pub type ApiServerResult<T> = Result<T, ApiServerError>;
