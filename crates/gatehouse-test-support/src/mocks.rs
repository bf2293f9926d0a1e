//! Scripted [`AuthenticationService`] for adapter and HTTP tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use gatehouse_auth::{
    Authentication, AuthenticationError, AuthenticationService, UsernamePasswordToken,
};

type Outcome =
    Box<dyn Fn(&UsernamePasswordToken) -> Result<Authentication, AuthenticationError> + Send + Sync>;

/// Authentication service with a fixed verdict that records every token it sees.
pub struct StaticAuthenticationService {
    outcome: Outcome,
    calls: Mutex<Vec<(String, String)>>,
}

impl StaticAuthenticationService {
    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Accept every token, granting `authorities`.
    #[must_use]
    pub fn accepting<I, S>(authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let authorities: Vec<String> = authorities.into_iter().map(Into::into).collect();
        Self::with_outcome(Box::new(move |token| {
            Ok(Authentication::new(
                token.principal(),
                authorities.clone(),
                token.details().clone(),
            ))
        }))
    }

    /// Reject every token with `BadCredentials`.
    #[must_use]
    pub fn rejecting() -> Self {
        Self::with_outcome(Box::new(|_| Err(AuthenticationError::BadCredentials)))
    }

    /// Fail every token with the error produced by `make_error`.
    #[must_use]
    pub fn failing_with(
        make_error: impl Fn() -> AuthenticationError + Send + Sync + 'static,
    ) -> Self {
        Self::with_outcome(Box::new(move |_| Err(make_error())))
    }

    /// `(principal, credentials)` of every token received, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AuthenticationService for StaticAuthenticationService {
    async fn authenticate(
        &self,
        token: UsernamePasswordToken,
    ) -> Result<Authentication, AuthenticationError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((token.principal().to_string(), token.credentials().to_string()));
        (self.outcome)(&token)
    }
}
