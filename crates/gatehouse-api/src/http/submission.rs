//! Buffered login request handed to the adapter and its collaborators.

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::http::request::Parts;
use axum::http::{Extensions, Method, Request, header::CONTENT_TYPE};
use gatehouse_auth::AuthenticationDetails;

use crate::http::constants::HEADER_REQUEST_ID;

/// A login request whose body has already been read into memory.
///
/// Request-scoped attributes (such as the parsed
/// [`LoginRequest`](gatehouse_auth::LoginRequest)) live in [`extensions`](Self::extensions)
/// and are dropped together with the submission.
#[derive(Debug)]
pub struct LoginSubmission {
    parts: Parts,
    body: Bytes,
}

impl LoginSubmission {
    /// Wrap request head and buffered body.
    #[must_use]
    pub const fn new(parts: Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    /// Build a submission from a request whose body is already in memory.
    #[must_use]
    pub fn from_request(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts, body)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Buffered body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Request-scoped attributes.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    /// Mutable request-scoped attributes.
    pub const fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    /// `Content-Type` header value, if present and valid ASCII.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Peer address recorded by the connection acceptor.
    #[must_use]
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr)
    }

    /// Value of the `x-request-id` header.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.parts
            .headers
            .get(HEADER_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
    }

    /// Request metadata carried on the authentication token.
    #[must_use]
    pub fn details(&self) -> AuthenticationDetails {
        AuthenticationDetails {
            remote_addr: self.remote_addr(),
            request_id: self.request_id().map(ToString::to_string),
        }
    }
}
