//! Interactive shell - menu-driven login gate and converter
//!
//! The shell owns all prompting; business rules live in moneta-core. Every
//! text prompt accepts `q` as a quit sentinel that backs out of the
//! current flow, and Ctrl-C anywhere unwinds to a clean exit.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Input, Password, Select};
use moneta_core::ports::CredentialStore;
use moneta_core::services::{LoginOutcome, SignupError, SignupOutcome};
use moneta_core::{LogEvent, LoggingService, MonetaContext};

use super::{get_context, get_logger, log_event};
use crate::output;

/// Reserved token that cancels the current prompt flow
const QUIT_SENTINEL: &str = "q";

/// Popular conversion targets shown after every successful conversion
const POPULAR_TARGETS: [&str; 3] = ["USD", "EUR", "GBP"];

pub fn run() -> Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        anyhow::bail!("the interactive shell requires a terminal (try `moneta rates` or `moneta convert`)");
    }

    let logger = get_logger();
    let ctx = get_context()?;

    // Surface a corrupt user store once, up front; the session continues
    // against an empty mapping.
    if let (_, Some(store_err)) = ctx.store.load_or_empty() {
        output::warning(&format!("{} (continuing with no accounts)", store_err));
        log_event(
            &logger,
            LogEvent::new("store_load_failed")
                .with_command("shell")
                .with_error(store_err.to_string()),
        );
    }

    match main_menu(&ctx, &logger) {
        Ok(()) => Ok(()),
        Err(e) if is_interrupted(&e) => {
            println!();
            output::info("Program terminated by user.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn main_menu(ctx: &MonetaContext, logger: &Option<LoggingService>) -> Result<()> {
    println!("{}", "Welcome to Moneta".bold());

    loop {
        println!();
        let choice = Select::new()
            .with_prompt("Select an option")
            .items(&["Login", "Sign Up", "Exit"])
            .default(0)
            .interact()?;

        match choice {
            0 => {
                if let Some(username) = login_flow(ctx, logger)? {
                    authenticated_menu(ctx, logger, &username)?;
                }
            }
            1 => signup_flow(ctx, logger)?,
            _ => {
                output::info("Thank you for using Moneta!");
                return Ok(());
            }
        }
    }
}

/// Prompt for one line; `q` cancels
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    let value: String = Input::new().with_prompt(prompt).interact_text()?;
    let value = value.trim().to_string();
    if value.eq_ignore_ascii_case(QUIT_SENTINEL) {
        return Ok(None);
    }
    Ok(Some(value))
}

/// Login flow: one session, bounded attempts budget
///
/// Returns the authenticated username, or None when cancelled or the
/// budget is exhausted.
fn login_flow(ctx: &MonetaContext, logger: &Option<LoggingService>) -> Result<Option<String>> {
    println!("{}", "=== Login ===".bold());

    let mut session = ctx.auth_service.start_login();
    loop {
        let username = match prompt_line("Username (q to cancel)")? {
            Some(u) => u,
            None => return Ok(None),
        };
        let password = Password::new().with_prompt("Password").interact()?;

        match session.attempt(&username, &password) {
            LoginOutcome::Success(username) => {
                output::success("Login successful!");
                log_event(logger, LogEvent::new("login_succeeded").with_command("shell"));
                return Ok(Some(username));
            }
            LoginOutcome::InvalidCredentials { attempts_remaining } => {
                output::error(&format!(
                    "Invalid credentials! {} attempts remaining.",
                    attempts_remaining
                ));
            }
            LoginOutcome::TooManyAttempts => {
                output::error("Too many failed attempts. Please try again later.");
                log_event(logger, LogEvent::new("login_locked_out").with_command("shell"));
                return Ok(None);
            }
        }
    }
}

/// Signup flow: re-prompts only the field named by the rejection
fn signup_flow(ctx: &MonetaContext, logger: &Option<LoggingService>) -> Result<()> {
    println!("{}", "=== Sign Up ===".bold());

    'username: loop {
        let username = match prompt_line("Choose a username (q to cancel)")? {
            Some(u) => u,
            None => return Ok(()),
        };

        loop {
            let password = Password::new()
                .with_prompt("Choose a password (minimum 6 characters)")
                .interact()?;
            let confirm = Password::new().with_prompt("Confirm password").interact()?;

            match ctx.auth_service.signup(&username, &password, &confirm)? {
                SignupOutcome::Created => {
                    output::success("Account created successfully!");
                    log_event(logger, LogEvent::new("signup_succeeded").with_command("shell"));
                    return Ok(());
                }
                SignupOutcome::PersistFailure(reason) => {
                    output::error("Error creating account. Please try again later.");
                    log_event(
                        logger,
                        LogEvent::new("signup_persist_failed")
                            .with_command("shell")
                            .with_error(reason),
                    );
                    return Ok(());
                }
                SignupOutcome::Rejected(violation) => {
                    output::warning(&format!("{}", violation));
                    match violation {
                        SignupError::DuplicateUsername
                        | SignupError::UsernameTooShort
                        | SignupError::UsernameNotAlphanumeric => continue 'username,
                        SignupError::PasswordTooShort | SignupError::PasswordMismatch => continue,
                    }
                }
            }
        }
    }
}

fn authenticated_menu(
    ctx: &MonetaContext,
    logger: &Option<LoggingService>,
    username: &str,
) -> Result<()> {
    loop {
        println!();
        println!("{}", format!("Welcome, {}!", username).bold());
        let choice = Select::new()
            .with_prompt("Select an option")
            .items(&["Currency Converter", "Settings", "Help", "Logout"])
            .default(0)
            .interact()?;

        match choice {
            0 => converter_loop(ctx, logger)?,
            1 => output::info("Settings are managed in settings.json in your moneta directory."),
            2 => {
                output::info("Convert between currencies using the static rate table.");
                output::info("Enter q at any prompt to go back.");
            }
            _ => {
                output::info("Logging out...");
                return Ok(());
            }
        }
    }
}

fn converter_loop(ctx: &MonetaContext, logger: &Option<LoggingService>) -> Result<()> {
    loop {
        println!();
        println!("{}", "=== Currency Converter ===".bold());
        print_available_currencies(ctx);

        let from = match prompt_line("From currency (e.g. USD, q to cancel)")? {
            Some(code) => code,
            None => return Ok(()),
        };
        if !ctx.table.contains(&from) {
            output::warning("Invalid currency! Please try again.");
            continue;
        }

        let to = match prompt_line("To currency (e.g. EUR, q to cancel)")? {
            Some(code) => code,
            None => return Ok(()),
        };
        if !ctx.table.contains(&to) {
            output::warning("Invalid currency! Please try again.");
            continue;
        }

        let amount = match prompt_line("Amount (q to cancel)")? {
            Some(raw) => match raw.parse::<f64>() {
                Ok(a) if a >= 0.0 && a.is_finite() => a,
                Ok(_) => {
                    output::warning("Amount must be a non-negative number!");
                    continue;
                }
                Err(_) => {
                    output::warning("Invalid amount! Please try again.");
                    continue;
                }
            },
            None => return Ok(()),
        };

        match ctx.conversion_service.convert(amount, &from, &to) {
            Ok(result) => {
                println!();
                println!(
                    "{} {} = {} {}",
                    output::format_amount(amount),
                    from.to_uppercase(),
                    output::format_amount(result).green().bold(),
                    to.to_uppercase()
                );
                print_popular_conversions(ctx, amount, &from);
                log_event(logger, LogEvent::new("convert_succeeded").with_command("shell"));
            }
            Err(e) => {
                output::error(&format!("Conversion failed: {}", e));
                log_event(
                    logger,
                    LogEvent::new("convert_failed")
                        .with_command("shell")
                        .with_error(e.to_string()),
                );
                continue;
            }
        }

        println!();
        if !Confirm::new()
            .with_prompt("Convert again?")
            .default(true)
            .interact()?
        {
            return Ok(());
        }
    }
}

fn print_available_currencies(ctx: &MonetaContext) {
    let codes: Vec<&str> = ctx.table.codes().collect();
    println!("Available currencies:");
    for chunk in codes.chunks(5) {
        println!("  {}", chunk.join(" "));
    }
}

/// Fan-out to the popular targets, skipping the source currency
fn print_popular_conversions(ctx: &MonetaContext, amount: f64, from: &str) {
    let conversions = match ctx
        .conversion_service
        .fan_out(amount, from, &POPULAR_TARGETS)
    {
        Ok(c) if !c.is_empty() => c,
        _ => return,
    };

    println!();
    println!("Popular conversions:");
    for conv in conversions {
        println!(
            "  {} {} = {} {}",
            output::format_amount(amount),
            from.to_uppercase(),
            output::format_amount(conv.amount),
            conv.currency
        );
    }
}

/// True when the user interrupted a prompt (Ctrl-C / closed input)
fn is_interrupted(err: &anyhow::Error) -> bool {
    if let Some(dialoguer::Error::IO(io_err)) = err.downcast_ref::<dialoguer::Error>() {
        return matches!(
            io_err.kind(),
            std::io::ErrorKind::Interrupted | std::io::ErrorKind::UnexpectedEof
        );
    }
    false
}
