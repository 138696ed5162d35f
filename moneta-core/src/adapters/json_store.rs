//! JSON file credential store adapter
//!
//! Persists the username -> credential mapping as a pretty-printed JSON
//! document, rewritten in full on every save. A sidecar lock file carries
//! the fs2 exclusive lock for signup's read-modify-write span.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::result::{Error, Result};
use crate::domain::Credential;
use crate::ports::{CredentialStore, StoreGuard};

/// File-backed credential store
pub struct JsonCredentialStore {
    path: PathBuf,
}

impl JsonCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "users.json".into());
        name.push(".lock");
        self.path.with_file_name(name)
    }
}

impl CredentialStore for JsonCredentialStore {
    fn load(&self) -> Result<HashMap<String, Credential>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::store(format!("failed to read {}: {}", self.path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::store(format!("corrupt user store {}: {}", self.path.display(), e)))
    }

    fn save(&self, users: &HashMap<String, Credential>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::store(format!("failed to create {}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(users)?;
        fs::write(&self.path, content)
            .map_err(|e| Error::store(format!("failed to write {}: {}", self.path.display(), e)))
    }

    fn acquire(&self) -> Result<StoreGuard> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| Error::store(format!("failed to open lock file: {}", e)))?;
        file.lock_exclusive()
            .map_err(|e| Error::store(format!("failed to lock user store: {}", e)))?;

        Ok(StoreGuard::new(LockedFile(file)))
    }
}

/// Holds the lock for the guard's lifetime; flock releases on close
struct LockedFile(File);

impl Drop for LockedFile {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}
