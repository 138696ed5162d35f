//! Moneta Core - Business logic for the terminal currency converter
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Credential, CurrencyTable)
//! - **ports**: Trait definitions for external dependencies (CredentialStore)
//! - **services**: Business logic orchestration (auth, conversion, logging)
//! - **adapters**: Concrete implementations (JSON file store, in-memory store)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::JsonCredentialStore;
use config::Config;
use services::{AuthService, ConversionService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Credential, CurrencyTable};
pub use services::{
    EntryPoint, LogEvent, LoggingService, LoginOutcome, SignupError, SignupOutcome,
};

/// Main context for Moneta operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration, the credential store, and the services built on them.
pub struct MonetaContext {
    pub config: Config,
    pub store: Arc<JsonCredentialStore>,
    pub table: Arc<CurrencyTable>,
    pub auth_service: AuthService,
    pub conversion_service: ConversionService,
}

impl MonetaContext {
    /// Create a new Moneta context rooted at the given data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let table = Arc::new(config.currency_table()?);

        let store = Arc::new(JsonCredentialStore::new(data_dir.join("users.json")));
        let auth_service = AuthService::new(Arc::clone(&store) as Arc<dyn ports::CredentialStore>);
        let conversion_service = ConversionService::new(Arc::clone(&table));

        Ok(Self {
            config,
            store,
            table,
            auth_service,
            conversion_service,
        })
    }
}
