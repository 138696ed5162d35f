//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
mod convert;
pub mod logging;

pub use auth::{
    hash_password, verify_password, AuthService, LoginOutcome, LoginSession, SignupError,
    SignupOutcome, LOGIN_ATTEMPTS,
};
pub use convert::{Conversion, ConversionError, ConversionService};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
