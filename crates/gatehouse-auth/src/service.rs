//! Authentication service abstraction.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AuthenticationError;
use crate::model::{Authentication, UsernamePasswordToken};

/// Verifies submitted credentials.
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Check the token's credentials.
    ///
    /// # Errors
    ///
    /// Returns a rejection (`BadCredentials`, `Disabled`, `Locked`) when the
    /// credentials are refused, or `InternalService` when the check itself
    /// could not be completed.
    async fn authenticate(
        &self,
        token: UsernamePasswordToken,
    ) -> Result<Authentication, AuthenticationError>;
}

#[async_trait]
impl<T> AuthenticationService for Arc<T>
where
    T: AuthenticationService + ?Sized,
{
    async fn authenticate(
        &self,
        token: UsernamePasswordToken,
    ) -> Result<Authentication, AuthenticationError> {
        (**self).authenticate(token).await
    }
}
