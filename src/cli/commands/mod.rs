//! Command definitions plus the argument parsing they share.

pub mod agenda;
pub mod book;
pub mod budget;
pub mod charge;
pub mod config;
pub mod event;
pub mod savings;
pub mod system;

use chrono::NaiveDate;

use crate::book::{ChargeKind, EventKind};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::{CommandError, ShellContext};
use crate::currency;

/// Registers every root command; registration order is the `help` listing
/// order.
pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups: &[fn() -> Vec<CommandEntry>] = &[
        book::entries,
        budget::entries,
        charge::entries,
        event::entries,
        savings::entries,
        agenda::entries,
        config::entries,
        system::entries,
    ];
    for group in groups {
        for entry in group() {
            registry.register(entry);
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{raw}` (use YYYY-MM-DD)"))
    })
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    match raw.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(CommandError::InvalidArguments(format!(
            "invalid amount `{raw}`"
        ))),
    }
}

pub(crate) fn parse_days(raw: &str) -> Result<i64, CommandError> {
    raw.parse::<i64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid day count `{raw}`")))
}

pub(crate) fn parse_charge_kind(raw: &str) -> Result<ChargeKind, CommandError> {
    ChargeKind::from_token(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown charge kind `{raw}` (one of {})",
            token_list(ChargeKind::ALL.iter().map(ChargeKind::token))
        ))
    })
}

pub(crate) fn parse_event_kind(raw: &str) -> Result<EventKind, CommandError> {
    EventKind::from_token(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown event kind `{raw}` (one of {})",
            token_list(EventKind::ALL.iter().map(EventKind::token))
        ))
    })
}

fn token_list<'a>(tokens: impl Iterator<Item = &'a str>) -> String {
    tokens.collect::<Vec<_>>().join(", ")
}

/// Formats an amount with the configured currency and locale.
pub(crate) fn format_money(context: &ShellContext, amount: f64) -> String {
    currency::format_amount(amount, &context.config.currency, &context.config.locale)
}

/// Formats a date with the configured locale style.
pub(crate) fn format_day(context: &ShellContext, date: NaiveDate) -> String {
    currency::format_date(&context.config.locale, date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_parse_iso_only() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("29/02/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn amounts_reject_junk_and_infinities() {
        assert_eq!(parse_amount("14.99").unwrap(), 14.99);
        assert_eq!(parse_amount("-25").unwrap(), -25.0);
        assert!(parse_amount("lots").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn kind_errors_list_the_accepted_tokens() {
        let err = parse_charge_kind("rent").unwrap_err();
        assert!(err.to_string().contains("subscription"));
        let err = parse_event_kind("party").unwrap_err();
        assert!(err.to_string().contains("anniversary"));
    }
}
