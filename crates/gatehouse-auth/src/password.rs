//! Argon2-backed in-memory user directory.

use std::collections::HashMap;
use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    rand_core::OsRng,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{AuthenticationError, PasswordError};
use crate::model::{Authentication, UsernamePasswordToken};
use crate::service::AuthenticationService;

/// Plaintext hashed once so unknown usernames cost the same as known ones.
const UNKNOWN_USER_PASSWORD: &str = "gatehouse-unknown-user";

/// Hash a plaintext password into an argon2 PHC string.
///
/// # Errors
///
/// Returns [`PasswordError::HashFailed`] when argon2 rejects the input.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|detail| PasswordError::HashFailed { detail })?;
    Ok(hash.to_string())
}

/// Check a candidate password against a stored PHC string.
///
/// A mismatch is `Ok(false)`; only malformed hashes and argon2 failures are errors.
///
/// # Errors
///
/// Returns [`PasswordError::StoredHashInvalid`] for unparsable hashes and
/// [`PasswordError::VerifyFailed`] for other verification failures.
pub fn verify_password(expected_hash: &str, candidate: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(expected_hash)
        .map_err(|detail| PasswordError::StoredHashInvalid { detail })?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(detail) => Err(PasswordError::VerifyFailed { detail }),
    }
}

/// Account record held by [`PasswordAuthenticator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Login name.
    pub username: String,
    /// Argon2 PHC string of the password.
    pub password_hash: String,
    /// Authorities granted on successful login.
    pub authorities: Vec<String>,
    /// Whether the account may log in.
    pub enabled: bool,
    /// Whether the account is locked.
    pub locked: bool,
}

impl UserAccount {
    /// Enabled, unlocked account with no authorities.
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            authorities: Vec::new(),
            enabled: true,
            locked: false,
        }
    }

    /// Replace the granted authorities.
    #[must_use]
    pub fn with_authorities<I, S>(mut self, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorities = authorities.into_iter().map(Into::into).collect();
        self
    }
}

/// [`AuthenticationService`] that verifies passwords against in-memory accounts.
#[derive(Clone)]
pub struct PasswordAuthenticator {
    accounts: Arc<HashMap<String, UserAccount>>,
    unknown_user_hash: Arc<str>,
}

impl PasswordAuthenticator {
    /// Build a directory from the supplied accounts. Later duplicates win.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::HashFailed`] if the timing-equalisation hash
    /// cannot be computed.
    pub fn new(accounts: impl IntoIterator<Item = UserAccount>) -> Result<Self, PasswordError> {
        let accounts = accounts
            .into_iter()
            .map(|account| (account.username.clone(), account))
            .collect();
        Ok(Self {
            accounts: Arc::new(accounts),
            unknown_user_hash: Arc::from(hash_password(UNKNOWN_USER_PASSWORD)?),
        })
    }

    /// Number of accounts known to the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the directory has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AuthenticationService for PasswordAuthenticator {
    async fn authenticate(
        &self,
        token: UsernamePasswordToken,
    ) -> Result<Authentication, AuthenticationError> {
        let account = self.accounts.get(token.principal()).cloned();
        let expected_hash = account.as_ref().map_or_else(
            || self.unknown_user_hash.to_string(),
            |account| account.password_hash.clone(),
        );
        let candidate = token.credentials().to_string();

        let matches =
            tokio::task::spawn_blocking(move || verify_password(&expected_hash, &candidate))
                .await
                .map_err(AuthenticationError::internal)?
                .map_err(AuthenticationError::internal)?;

        let Some(account) = account else {
            debug!(username = %token.principal(), "login for unknown user");
            return Err(AuthenticationError::BadCredentials);
        };
        if !matches {
            debug!(username = %account.username, "password mismatch");
            return Err(AuthenticationError::BadCredentials);
        }
        if !account.enabled {
            warn!(username = %account.username, "login attempt for disabled account");
            return Err(AuthenticationError::Disabled {
                username: account.username,
            });
        }
        if account.locked {
            warn!(username = %account.username, "login attempt for locked account");
            return Err(AuthenticationError::Locked {
                username: account.username,
            });
        }

        Ok(Authentication::new(
            account.username,
            account.authorities,
            token.into_details(),
        ))
    }
}
