//! Convert command - one-shot conversion behind the account gate
//!
//! Credentials come from the --username flag plus the MONETA_PASSWORD
//! environment variable, or interactive prompts. The login attempts
//! budget applies exactly as in the shell.

use std::env;

use anyhow::Result;
use dialoguer::{Input, Password};

use super::{get_context, get_logger, log_event};
use crate::output;
use moneta_core::services::LoginOutcome;
use moneta_core::{LogEvent, MonetaContext};

pub fn run(from: &str, to: &str, amount: f64, username: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    if !amount.is_finite() || amount < 0.0 {
        anyhow::bail!("amount must be a non-negative number");
    }

    let user = authenticate(&ctx, username)?;
    log_event(&logger, LogEvent::new("login_succeeded").with_command("convert"));

    let result = match ctx.conversion_service.convert(amount, from, to) {
        Ok(r) => r,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("convert_failed")
                    .with_command("convert")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };
    log_event(&logger, LogEvent::new("convert_succeeded").with_command("convert"));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "user": user,
                "from": from.to_uppercase(),
                "to": to.to_uppercase(),
                "amount": amount,
                "result": result,
            }))?
        );
    } else {
        println!(
            "{} {} = {} {}",
            output::format_amount(amount),
            from.to_uppercase(),
            output::format_amount(result),
            to.to_uppercase()
        );
    }
    Ok(())
}

/// Run the login gate; non-interactive credential sources get one shot
fn authenticate(ctx: &MonetaContext, username_flag: Option<String>) -> Result<String> {
    let password_env = env::var("MONETA_PASSWORD").ok();
    let non_interactive = username_flag.is_some() && password_env.is_some();

    let mut session = ctx.auth_service.start_login();
    loop {
        let username = match &username_flag {
            Some(u) => u.clone(),
            None => Input::new().with_prompt("Username").interact_text()?,
        };
        let password = match &password_env {
            Some(p) => p.clone(),
            None => Password::new().with_prompt("Password").interact()?,
        };

        match session.attempt(&username, &password) {
            LoginOutcome::Success(user) => return Ok(user),
            LoginOutcome::InvalidCredentials { attempts_remaining } => {
                if non_interactive {
                    anyhow::bail!("invalid credentials");
                }
                output::error(&format!(
                    "Invalid credentials! {} attempts remaining.",
                    attempts_remaining
                ));
            }
            LoginOutcome::TooManyAttempts => {
                anyhow::bail!("too many failed login attempts")
            }
        }
    }
}
