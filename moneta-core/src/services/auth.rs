//! Auth service - signup and login against the credential store
//!
//! Passwords are stored as Argon2id hashes in PHC string format; login
//! verifies against the stored hash, never against plaintext.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::domain::result::{Error as CoreError, Result};
use crate::domain::{username_is_alphanumeric, Credential, PASSWORD_MIN_LEN, USERNAME_MIN_LEN};
use crate::ports::CredentialStore;

/// Login attempts allowed per session
pub const LOGIN_ATTEMPTS: u32 = 3;

/// A signup rejection, specific enough to re-prompt just the offending field
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("username must be at least 3 characters long")]
    UsernameTooShort,
    #[error("username must contain only letters and numbers")]
    UsernameNotAlphanumeric,
    #[error("password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Outcome of a signup request
#[derive(Debug)]
pub enum SignupOutcome {
    /// Account created and persisted
    Created,
    /// Request rejected before any mutation
    Rejected(SignupError),
    /// Validation passed but the store could not be written; the account
    /// is not durable and the caller must inform the user
    PersistFailure(String),
}

/// Outcome of one login attempt
///
/// An unknown username and a wrong password produce the same outcome, so
/// the interface cannot be used to enumerate accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(String),
    InvalidCredentials { attempts_remaining: u32 },
    TooManyAttempts,
}

/// Auth service for signup and login
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Register a new account
    ///
    /// Validation runs in a fixed order and stops at the first violation:
    /// duplicate username, username length, username charset, password
    /// length, password confirmation. The store is held under an exclusive
    /// lock from the duplicate check through the persist so concurrent
    /// signups cannot lose updates.
    pub fn signup(&self, username: &str, password: &str, confirm: &str) -> Result<SignupOutcome> {
        let _guard = self.store.acquire()?;
        let (mut users, _load_warning) = self.store.load_or_empty();

        if users.contains_key(username) {
            return Ok(SignupOutcome::Rejected(SignupError::DuplicateUsername));
        }
        if username.chars().count() < USERNAME_MIN_LEN {
            return Ok(SignupOutcome::Rejected(SignupError::UsernameTooShort));
        }
        if !username_is_alphanumeric(username) {
            return Ok(SignupOutcome::Rejected(SignupError::UsernameNotAlphanumeric));
        }
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Ok(SignupOutcome::Rejected(SignupError::PasswordTooShort));
        }
        if password != confirm {
            return Ok(SignupOutcome::Rejected(SignupError::PasswordMismatch));
        }

        let hash = hash_password(password)?;
        users.insert(username.to_string(), Credential::new(hash));

        match self.store.save(&users) {
            Ok(()) => Ok(SignupOutcome::Created),
            Err(e) => Ok(SignupOutcome::PersistFailure(e.to_string())),
        }
    }

    /// Begin a login session with a fresh attempts budget
    pub fn start_login(&self) -> LoginSession {
        LoginSession {
            store: Arc::clone(&self.store),
            attempts_remaining: LOGIN_ATTEMPTS,
        }
    }
}

/// A bounded-retry login session
///
/// The budget belongs to the session: once exhausted, every further call
/// yields `TooManyAttempts` and the caller must restart the login flow.
pub struct LoginSession {
    store: Arc<dyn CredentialStore>,
    attempts_remaining: u32,
}

impl LoginSession {
    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    /// Try one username/password pair
    pub fn attempt(&mut self, username: &str, password: &str) -> LoginOutcome {
        if self.attempts_remaining == 0 {
            return LoginOutcome::TooManyAttempts;
        }

        // A corrupt store behaves as empty: attempts still burn down and
        // no credential matches.
        let (users, _load_warning) = self.store.load_or_empty();
        let matched = users
            .get(username)
            .map(|cred| verify_password(password, &cred.password_hash))
            .unwrap_or(false);

        if matched {
            return LoginOutcome::Success(username.to_string());
        }

        self.attempts_remaining -= 1;
        if self.attempts_remaining == 0 {
            LoginOutcome::TooManyAttempts
        } else {
            LoginOutcome::InvalidCredentials {
                attempts_remaining: self.attempts_remaining,
            }
        }
    }
}

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::auth(format!("failed to hash password: {}", e)))
}

/// Verify a password against a stored PHC hash string
///
/// An unparseable hash verifies as false rather than erroring, so a
/// damaged record behaves like a wrong password.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
