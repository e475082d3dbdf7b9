//! Global preference commands: locale, currency, color, horizon.

use crate::cli::commands::parse_days;
use crate::cli::registry::CommandEntry;
use crate::cli::{output, CommandError, CommandResult, ShellContext};
use crate::core::utils;
use crate::currency::{CurrencyCode, LocaleConfig};

pub(crate) fn entries() -> Vec<CommandEntry> {
    vec![CommandEntry {
        name: "config",
        description: "View and set preferences",
        usage: "config [show|set <locale|currency|color|horizon> <value>]",
        handler: run_config,
    }]
}

fn run_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_ascii_lowercase().as_str() {
        "set" => {
            let [_, key, value] = args else {
                return Err(CommandError::InvalidArguments(
                    "usage: config set <locale|currency|color|horizon> <value>".into(),
                ));
            };
            apply_set(context, key, value)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`. Available: show, set"
        ))),
    }
}

fn show_config(context: &mut ShellContext) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!("  Locale   : {}", config.locale.language_tag));
    output::info(format!("  Currency : {}", config.currency.as_str()));
    output::info(format!(
        "  Color    : {}",
        if config.plain_output { "off" } else { "on" }
    ));
    output::info(format!("  Horizon  : {} day(s)", config.upcoming_days));
    output::info(format!(
        "  Last book: {}",
        config.last_opened_book.as_deref().unwrap_or("-")
    ));
    output::info(format!(
        "  Data dir : {}",
        utils::app_data_dir().display()
    ));
    Ok(())
}

fn apply_set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    match key.to_ascii_lowercase().as_str() {
        "locale" => {
            let Some(locale) = LocaleConfig::preset(value) else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown locale `{value}` (one of en-US, en-GB, fr-FR, de-DE)"
                )));
            };
            context.config.locale = locale;
            context.persist_config();
            output::success(format!("Locale set to {value}."));
        }
        "currency" => {
            if value.len() != 3 || !value.chars().all(|ch| ch.is_ascii_alphabetic()) {
                return Err(CommandError::InvalidArguments(format!(
                    "invalid currency code `{value}` (use an ISO 4217 code like USD)"
                )));
            }
            let code = CurrencyCode::new(value);
            context.config.currency = code.clone();
            context.persist_config();
            output::success(format!("Currency set to {}.", code.as_str()));
        }
        "color" => {
            let enabled = match value.to_ascii_lowercase().as_str() {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "invalid color switch `{other}` (use on or off)"
                    )))
                }
            };
            context.config.plain_output = !enabled;
            context.persist_config();
            context.apply_output_preferences();
            output::success(format!(
                "Color output {}.",
                if enabled { "enabled" } else { "disabled" }
            ));
        }
        "horizon" => {
            let days = parse_days(value)?;
            if days <= 0 {
                return Err(CommandError::InvalidArguments(format!(
                    "horizon must be at least one day, got {days}"
                )));
            }
            context.config.upcoming_days = days;
            context.persist_config();
            output::success(format!("Default horizon set to {days} day(s)."));
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{other}` (one of locale, currency, color, horizon)"
            )))
        }
    }
    Ok(())
}
