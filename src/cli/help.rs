use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};

/// `help` with no argument: every root command and its one-line summary,
/// padded to the longest registered name.
pub fn overview(registry: &CommandRegistry) {
    let width = registry
        .list()
        .iter()
        .map(|entry| entry.name.len())
        .max()
        .unwrap_or(0);

    output::section("Available commands");
    for entry in registry.list() {
        output::info(format!("  {:<width$} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details.");
}

/// `help <command>`: the registered description and usage line.
pub fn detail(entry: &CommandEntry) {
    output::section(format!("Help: {}", entry.name));
    output::info(format!("  Description: {}", entry.description));
    output::info(format!("  Usage: {}", entry.usage));
}
