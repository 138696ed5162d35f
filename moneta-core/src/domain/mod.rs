//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod credential;
mod currency;
pub mod result;

pub use credential::{username_is_alphanumeric, Credential, PASSWORD_MIN_LEN, USERNAME_MIN_LEN};
pub use currency::{normalize_code, CurrencyTable};
