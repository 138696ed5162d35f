//! Credential domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum username length accepted at signup
pub const USERNAME_MIN_LEN: usize = 3;

/// Minimum password length accepted at signup
pub const PASSWORD_MIN_LEN: usize = 6;

/// A stored user credential
///
/// The password is kept as a PHC-format Argon2id hash string, never as
/// plaintext. Usernames are unique within the store; uniqueness is
/// enforced at signup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(password_hash: impl Into<String>) -> Self {
        Self {
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

/// True if the username contains only letters and digits
///
/// Length is checked separately so the caller can report the right
/// violation. Duplicate detection is the store's concern.
pub fn username_is_alphanumeric(username: &str) -> bool {
    !username.is_empty() && username.chars().all(|c| c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_alphanumeric() {
        assert!(username_is_alphanumeric("bob42"));
        assert!(!username_is_alphanumeric("bob!"));
        assert!(!username_is_alphanumeric("bob smith"));
        assert!(!username_is_alphanumeric(""));
    }

    #[test]
    fn test_credential_holds_hash_verbatim() {
        let cred = Credential::new("$argon2id$v=19$m=19456,t=2,p=1$abc$def");
        assert!(cred.password_hash.starts_with("$argon2id$"));
    }
}
