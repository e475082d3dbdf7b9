//! Shell housekeeping: version, help, clear, exit.

use std::io::stdout;

use crossterm::{cursor, terminal, ExecutableCommand};

use crate::book::SCHEMA_VERSION;
use crate::build_info;
use crate::cli::registry::CommandEntry;
use crate::cli::{help, output, CommandError, CommandResult, ShellContext};

pub(crate) fn entries() -> Vec<CommandEntry> {
    vec![
        CommandEntry {
            name: "version",
            description: "Show build and schema info",
            usage: "version",
            handler: run_version,
        },
        CommandEntry {
            name: "help",
            description: "List commands and usage",
            usage: "help [command]",
            handler: run_help,
        },
        CommandEntry {
            name: "clear",
            description: "Clear the terminal",
            usage: "clear",
            handler: run_clear,
        },
        CommandEntry {
            name: "exit",
            description: "Leave the shell",
            usage: "exit",
            handler: run_exit,
        },
    ]
}

fn run_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("Finance Core {}", build_info::VERSION));
    output::info(format!("  Book schema: v{SCHEMA_VERSION}"));
    output::info(format!(
        "  Build hash : {} ({})",
        build_info::GIT_HASH,
        build_info::GIT_STATUS
    ));
    output::info(format!("  Built at   : {}", build_info::BUILT_AT));
    output::info(format!("  Target     : {}", build_info::TARGET));
    output::info(format!("  Profile    : {}", build_info::PROFILE));
    output::info(format!("  Rustc      : {}", build_info::RUSTC));
    Ok(())
}

fn run_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        let name = raw.to_lowercase();
        match context.registry.get(&name) {
            Some(entry) => help::detail(entry),
            None => context.report_unknown(&name),
        }
        return Ok(());
    }

    help::overview(&context.registry);
    Ok(())
}

fn run_clear(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.is_script() {
        return Ok(());
    }
    let mut stdout = stdout();
    stdout.execute(terminal::Clear(terminal::ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    Ok(())
}

fn run_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.confirm_exit() {
        Err(CommandError::ExitRequested)
    } else {
        Ok(())
    }
}
