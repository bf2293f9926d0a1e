//! Seeded accounts for login tests.

use gatehouse_auth::{PasswordAuthenticator, UserAccount, hash_password};

/// Enabled account whose password hash is computed from `password`.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn account(
    username: &str,
    password: &str,
    authorities: &[&str],
) -> anyhow::Result<UserAccount> {
    let hash = hash_password(password)?;
    Ok(UserAccount::new(username, hash).with_authorities(authorities.iter().copied()))
}

/// Directory with `alice` (`ROLE_USER`), disabled `carol` and locked `dave`.
/// Every password is `secret`.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn sample_directory() -> anyhow::Result<PasswordAuthenticator> {
    let mut carol = account("carol", "secret", &[])?;
    carol.enabled = false;
    let mut dave = account("dave", "secret", &[])?;
    dave.locked = true;
    Ok(PasswordAuthenticator::new([
        account("alice", "secret", &["ROLE_USER"])?,
        carol,
        dave,
    ])?)
}
