//! Finance Core keeps a household's recurring money life in one place: a
//! date-recurrence engine for charges and events, plus books that gather
//! budgets, expenses, and savings goals behind a scriptable CLI.

#![doc(test(attr(deny(warnings))))]

pub mod book;
pub mod build_info;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod schedule;
pub mod storage;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs the global tracing subscriber. Later calls are no-ops, so the
/// binary and tests can both call this freely.
pub fn init() {
    TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("finance_core=info"));
        fmt().with_env_filter(filter).init();
        tracing::debug!(version = build_info::VERSION, "tracing installed");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
