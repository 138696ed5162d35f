//! In-memory credential store adapter
//!
//! Used by tests and ephemeral sessions; nothing survives the process.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::Credential;
use crate::ports::{CredentialStore, StoreGuard};

#[derive(Default)]
pub struct MemoryCredentialStore {
    users: Mutex<HashMap<String, Credential>>,
    fail_saves: bool,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail, for exercising persist-failure paths
    pub fn failing() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            fail_saves: true,
        }
    }

    pub fn with_users(users: HashMap<String, Credential>) -> Self {
        Self {
            users: Mutex::new(users),
            fail_saves: false,
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<HashMap<String, Credential>> {
        let users = self
            .users
            .lock()
            .map_err(|_| Error::store("store mutex poisoned"))?;
        Ok(users.clone())
    }

    fn save(&self, users: &HashMap<String, Credential>) -> Result<()> {
        if self.fail_saves {
            return Err(Error::store("in-memory store configured to fail saves"));
        }
        let mut guard = self
            .users
            .lock()
            .map_err(|_| Error::store("store mutex poisoned"))?;
        *guard = users.clone();
        Ok(())
    }

    fn acquire(&self) -> Result<StoreGuard> {
        Ok(StoreGuard::noop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().unwrap().is_empty());

        let mut users = HashMap::new();
        users.insert("alice".to_string(), Credential::new("hash"));
        store.save(&users).unwrap();
        assert_eq!(store.load().unwrap(), users);
    }

    #[test]
    fn test_failing_store_rejects_saves() {
        let store = MemoryCredentialStore::failing();
        assert!(store.save(&HashMap::new()).is_err());
    }
}
