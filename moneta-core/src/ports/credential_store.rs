//! Credential store port - persistence abstraction

use std::collections::HashMap;

use crate::domain::result::Result;
use crate::domain::Credential;

/// Credential persistence abstraction
///
/// The store is a flat mapping from username to credential record.
/// Implementations (adapters) provide the actual persistence logic.
pub trait CredentialStore: Send + Sync {
    /// Load the full mapping
    ///
    /// A missing backing resource yields an empty mapping. A present but
    /// unparseable resource is a recoverable `Store` error: callers report
    /// it and continue with an empty mapping, never abort.
    fn load(&self) -> Result<HashMap<String, Credential>>;

    /// Load, recovering from a corrupt backing resource
    ///
    /// Returns the mapping plus the recoverable error, if any, so the
    /// caller can report it. A missing resource is not an error.
    fn load_or_empty(&self) -> (HashMap<String, Credential>, Option<crate::domain::result::Error>) {
        match self.load() {
            Ok(users) => (users, None),
            Err(e) => (HashMap::new(), Some(e)),
        }
    }

    /// Persist the full mapping, overwriting prior state
    ///
    /// Failure is surfaced to the caller, which is responsible for
    /// informing the user; it must never crash the process.
    fn save(&self, users: &HashMap<String, Credential>) -> Result<()>;

    /// Acquire exclusive access for a read-modify-write sequence
    ///
    /// Held for the span of "check duplicate" through "persist" so that
    /// concurrent signups from separate instances cannot lose updates.
    /// Released on drop.
    fn acquire(&self) -> Result<StoreGuard>;
}

/// Scoped exclusive access to the store's backing resource
///
/// Wraps whatever the adapter uses to hold the lock; dropping the guard
/// releases it.
pub struct StoreGuard {
    _inner: Box<dyn std::any::Any + Send>,
}

impl StoreGuard {
    pub fn new(inner: impl std::any::Any + Send) -> Self {
        Self { _inner: Box::new(inner) }
    }

    /// A guard for adapters with no real locking (e.g. in-memory)
    pub fn noop() -> Self {
        Self { _inner: Box::new(()) }
    }
}
