//! Integration tests for moneta-core services
//!
//! These tests verify the signup/login/store flow end to end against the
//! real JSON file adapter; only the filesystem location is temporary.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use moneta_core::adapters::JsonCredentialStore;
use moneta_core::ports::CredentialStore;
use moneta_core::services::{AuthService, LoginOutcome, SignupOutcome, LOGIN_ATTEMPTS};
use moneta_core::MonetaContext;

// ============================================================================
// Test Helpers
// ============================================================================

/// Build an auth service over a file store in the given directory
fn auth_in(dir: &TempDir) -> (AuthService, Arc<JsonCredentialStore>) {
    let store = Arc::new(JsonCredentialStore::new(dir.path().join("users.json")));
    let auth = AuthService::new(Arc::clone(&store) as Arc<dyn CredentialStore>);
    (auth, store)
}

// ============================================================================
// Persistence round-trip
// ============================================================================

#[test]
fn test_signup_persists_across_service_instances() {
    let dir = TempDir::new().unwrap();

    {
        let (auth, _) = auth_in(&dir);
        let outcome = auth.signup("alice", "secret99", "secret99").unwrap();
        assert!(matches!(outcome, SignupOutcome::Created));
    }

    // Fresh service over the same file, as after a process restart
    let (auth, store) = auth_in(&dir);
    let users = store.load().unwrap();
    assert_eq!(users.len(), 1);
    assert!(users.contains_key("alice"));

    let mut session = auth.start_login();
    assert_eq!(
        session.attempt("alice", "secret99"),
        LoginOutcome::Success("alice".to_string())
    );
}

#[test]
fn test_duplicate_rejected_across_instances() {
    let dir = TempDir::new().unwrap();

    let (auth, _) = auth_in(&dir);
    auth.signup("alice", "secret99", "secret99").unwrap();

    let (auth, _) = auth_in(&dir);
    let outcome = auth.signup("alice", "other-password", "other-password").unwrap();
    assert!(matches!(
        outcome,
        SignupOutcome::Rejected(moneta_core::SignupError::DuplicateUsername)
    ));
}

#[test]
fn test_multiple_users_round_trip() {
    let dir = TempDir::new().unwrap();
    let (auth, store) = auth_in(&dir);

    for name in ["alice", "bob99", "carol"] {
        let outcome = auth.signup(name, "secret99", "secret99").unwrap();
        assert!(matches!(outcome, SignupOutcome::Created), "signup {}", name);
    }

    let first = store.load().unwrap();
    let second = store.load().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

// ============================================================================
// Corrupt store recovery
// ============================================================================

#[test]
fn test_corrupt_store_never_blocks_login_flow() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("users.json"), "definitely not json").unwrap();

    let (auth, _) = auth_in(&dir);

    // Login proceeds against an effectively empty store
    let mut session = auth.start_login();
    assert!(matches!(
        session.attempt("alice", "secret99"),
        LoginOutcome::InvalidCredentials { .. }
    ));

    // Signup recovers too, and rewrites a clean store
    let outcome = auth.signup("alice", "secret99", "secret99").unwrap();
    assert!(matches!(outcome, SignupOutcome::Created));

    let (auth, store) = auth_in(&dir);
    assert_eq!(store.load().unwrap().len(), 1);
    let mut session = auth.start_login();
    assert_eq!(
        session.attempt("alice", "secret99"),
        LoginOutcome::Success("alice".to_string())
    );
}

// ============================================================================
// Login attempt budget over the file store
// ============================================================================

#[test]
fn test_attempt_budget_is_per_session_not_per_store() {
    let dir = TempDir::new().unwrap();
    let (auth, _) = auth_in(&dir);
    auth.signup("alice", "secret99", "secret99").unwrap();

    let mut session = auth.start_login();
    for _ in 0..LOGIN_ATTEMPTS {
        session.attempt("alice", "nope");
    }
    assert_eq!(session.attempt("alice", "secret99"), LoginOutcome::TooManyAttempts);

    // A new session (new process, or returning to the menu) starts fresh
    let mut session = auth.start_login();
    assert_eq!(
        session.attempt("alice", "secret99"),
        LoginOutcome::Success("alice".to_string())
    );
}

// ============================================================================
// Context wiring
// ============================================================================

#[test]
fn test_context_wires_store_and_conversion() {
    let dir = TempDir::new().unwrap();
    let ctx = MonetaContext::new(dir.path()).unwrap();

    let outcome = ctx.auth_service.signup("dave42", "secret99", "secret99").unwrap();
    assert!(matches!(outcome, SignupOutcome::Created));
    assert!(dir.path().join("users.json").exists());

    let result = ctx.conversion_service.convert(100.0, "USD", "EUR").unwrap();
    assert_eq!(format!("{:.2}", result), "91.00");
}

#[test]
fn test_context_applies_settings_rate_overrides() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.json"),
        r#"{"rates": {"EUR": 0.50}}"#,
    )
    .unwrap();

    let ctx = MonetaContext::new(dir.path()).unwrap();
    let result = ctx.conversion_service.convert(100.0, "USD", "EUR").unwrap();
    assert_eq!(format!("{:.2}", result), "50.00");
}
