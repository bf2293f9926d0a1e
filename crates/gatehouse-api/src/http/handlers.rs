//! Hooks that turn the outcome of a login attempt into an HTTP response.

use async_trait::async_trait;
use axum::Json;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use gatehouse_auth::{Authentication, AuthenticationError};

use crate::http::errors::ApiError;
use crate::http::store::LoginRequestError;
use crate::http::submission::LoginSubmission;
use crate::models::LoginSuccessResponse;

/// Renders the response for a successful login.
#[async_trait]
pub trait SuccessHandler: Send + Sync {
    /// Produce the response for `authentication`.
    async fn on_authentication_success(
        &self,
        submission: &LoginSubmission,
        authentication: Authentication,
    ) -> Response;
}

/// Renders the response for a failed login.
#[async_trait]
pub trait FailureHandler: Send + Sync {
    /// Produce the response for `failure`.
    async fn on_authentication_failure(
        &self,
        submission: &LoginSubmission,
        failure: AuthenticationError,
    ) -> Response;
}

/// Replies `200 OK` with the authenticated principal as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSuccessHandler;

#[async_trait]
impl SuccessHandler for JsonSuccessHandler {
    async fn on_authentication_success(
        &self,
        _submission: &LoginSubmission,
        authentication: Authentication,
    ) -> Response {
        let body = LoginSuccessResponse {
            username: authentication.principal,
            authorities: authentication.authorities,
            authenticated_at: authentication.authenticated_at,
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

/// Replies with an RFC9457 problem document chosen from the failure kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProblemFailureHandler;

#[async_trait]
impl FailureHandler for ProblemFailureHandler {
    async fn on_authentication_failure(
        &self,
        _submission: &LoginSubmission,
        failure: AuthenticationError,
    ) -> Response {
        problem_for(&failure).into_response()
    }
}

/// Status [`ProblemFailureHandler`] answers `failure` with.
pub(crate) fn failure_status(failure: &AuthenticationError) -> StatusCode {
    problem_for(failure).status
}

fn problem_for(failure: &AuthenticationError) -> ApiError {
    match failure {
        AuthenticationError::BadCredentials
        | AuthenticationError::Disabled { .. }
        | AuthenticationError::Locked { .. } => ApiError::unauthorized(failure.to_string()),
        AuthenticationError::MethodNotSupported { method } => ApiError::method_not_allowed(
            format!("{method} is not supported for login"),
            Method::POST,
        ),
        AuthenticationError::InternalService { source, .. } => {
            if let Some(inner) = source.downcast_ref::<AuthenticationError>() {
                if !matches!(inner, AuthenticationError::InternalService { .. }) {
                    return problem_for(inner);
                }
            }
            match source.downcast_ref::<LoginRequestError>() {
                Some(LoginRequestError::UnsupportedContentType { .. }) => {
                    ApiError::unsupported_media_type(source.to_string())
                }
                Some(LoginRequestError::MalformedJson { .. }) => {
                    ApiError::bad_request(source.to_string())
                }
                Some(LoginRequestError::BodyTooLarge { .. }) => {
                    ApiError::payload_too_large(source.to_string())
                }
                Some(LoginRequestError::BodyRead { .. }) | None => {
                    ApiError::internal("authentication could not be completed")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Bytes, to_bytes};
    use axum::http::{Request, header::ALLOW};
    use gatehouse_auth::AuthenticationDetails;
    use std::io;

    use crate::models::ProblemDetails;

    fn submission() -> LoginSubmission {
        LoginSubmission::from_request(
            Request::builder()
                .method("POST")
                .uri("/login")
                .body(Bytes::new())
                .expect("request"),
        )
    }

    async fn problem(failure: AuthenticationError) -> anyhow::Result<(StatusCode, ProblemDetails)> {
        let response = ProblemFailureHandler
            .on_authentication_failure(&submission(), failure)
            .await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    #[tokio::test]
    async fn success_renders_principal() -> anyhow::Result<()> {
        let authentication = Authentication::new(
            "alice",
            vec!["ROLE_USER".into()],
            AuthenticationDetails::default(),
        );
        let response = JsonSuccessHandler
            .on_authentication_success(&submission(), authentication.clone())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body: LoginSuccessResponse = serde_json::from_slice(&bytes)?;
        assert_eq!(body.username, "alice");
        assert_eq!(body.authorities, vec!["ROLE_USER".to_string()]);
        assert_eq!(body.authenticated_at, authentication.authenticated_at);
        Ok(())
    }

    #[tokio::test]
    async fn rejections_are_unauthorized() -> anyhow::Result<()> {
        let (status, body) = problem(AuthenticationError::BadCredentials).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.detail.as_deref(), Some("bad credentials"));

        let (status, body) = problem(AuthenticationError::Locked {
            username: "dave".into(),
        })
        .await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.detail.as_deref(), Some("account locked"));
        Ok(())
    }

    #[tokio::test]
    async fn wrapped_method_not_supported_is_405() -> anyhow::Result<()> {
        let failure = AuthenticationError::MethodNotSupported {
            method: "GET".into(),
        }
        .normalize();
        let response = ProblemFailureHandler
            .on_authentication_failure(&submission(), failure)
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(ALLOW).and_then(|v| v.to_str().ok()),
            Some("POST")
        );
        Ok(())
    }

    #[tokio::test]
    async fn wrapped_store_errors_map_to_client_errors() -> anyhow::Result<()> {
        let (status, _) = problem(AuthenticationError::internal(
            LoginRequestError::UnsupportedContentType {
                content_type: "text/plain".into(),
            },
        ))
        .await?;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (status, body) =
            problem(AuthenticationError::internal(LoginRequestError::BodyTooLarge { limit: 8 }))
                .await?;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body.detail.as_deref(), Some("login body exceeds 8 bytes"));
        Ok(())
    }

    #[test]
    fn failure_status_separates_client_and_server_faults() {
        let refused = AuthenticationError::MethodNotSupported {
            method: "GET".into(),
        }
        .normalize();
        assert!(failure_status(&refused).is_client_error());
        let oversized =
            AuthenticationError::internal(LoginRequestError::BodyTooLarge { limit: 64 });
        assert_eq!(failure_status(&oversized), StatusCode::PAYLOAD_TOO_LARGE);
        let broken = AuthenticationError::internal(io::Error::other("directory offline"));
        assert!(failure_status(&broken).is_server_error());
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() -> anyhow::Result<()> {
        let (status, body) =
            problem(AuthenticationError::internal(io::Error::other("db password=hunter2"))).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.detail.as_deref(),
            Some("authentication could not be completed")
        );
        Ok(())
    }
}
