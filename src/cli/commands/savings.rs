//! Savings goal commands: targets, balances, and the update ledger.

use crate::cli::commands::{format_day, format_money, parse_amount};
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::cli::{output, CommandError, CommandResult, ShellContext};
use crate::core::services::SavingsService;

pub(crate) fn entries() -> Vec<CommandEntry> {
    vec![CommandEntry {
        name: "savings",
        description: "Track savings goals",
        usage: "savings <add|remove|list|update|history> [args]",
        handler: run_savings,
    }]
}

fn run_savings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: savings <add|remove|list|update|history>".into(),
        ));
    };

    match subcommand.to_ascii_lowercase().as_str() {
        "add" => add_goal(context, rest),
        "remove" => remove_goal(context, rest),
        "list" => list_goals(context),
        "update" => update_goal(context, rest),
        "history" => show_history(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown savings subcommand `{other}`. Available: add, remove, list, update, history"
        ))),
    }
}

fn add_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, target] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: savings add <name> <target>".into(),
        ));
    };
    let target = parse_amount(target)?;
    let book = context.manager.require_current_mut()?;
    SavingsService::add(book, name, target)?;
    context.manager.save()?;
    output::success(format!("Added savings goal `{name}`."));
    Ok(())
}

fn remove_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: savings remove <name>".into(),
        ));
    };
    if !context.confirm_destructive(&format!("Remove savings goal `{name}` and its history?"))? {
        output::info("Removal cancelled.");
        return Ok(());
    }
    let book = context.manager.require_current_mut()?;
    let removed = SavingsService::remove(book, name)?;
    context.manager.save()?;
    output::success(format!("Removed savings goal `{}`.", removed.name));
    Ok(())
}

fn list_goals(context: &mut ShellContext) -> CommandResult {
    let book = context.manager.require_current()?;
    let goals = SavingsService::sorted(book);
    if goals.is_empty() {
        output::info("No savings goals yet. Add one with `savings add <name> <target>`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("Goal"),
        TableColumn::right("Target"),
        TableColumn::right("Balance"),
        TableColumn::right("Progress"),
    ]);
    for goal in goals {
        let progress = if goal.is_reached() {
            format!("{:.0}% (reached)", goal.progress_percent())
        } else {
            format!("{:.0}%", goal.progress_percent())
        };
        table.add_row(vec![
            goal.name.clone(),
            format_money(context, goal.target),
            format_money(context, goal.balance),
            progress,
        ]);
    }
    output::section("Savings goals");
    table.print();
    Ok(())
}

fn update_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(
            "usage: savings update <name> <amount> [note]".into(),
        ));
    }
    let name = args[0];
    let amount = parse_amount(args[1])?;
    let note = if args.len() > 2 {
        Some(args[2..].join(" "))
    } else {
        None
    };

    let book = context.manager.require_current_mut()?;
    let balance = SavingsService::record_update(book, name, amount, note)?;
    context.manager.save()?;
    output::success(format!(
        "Balance of `{name}` is now {}.",
        format_money(context, balance)
    ));
    Ok(())
}

fn show_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: savings history <name>".into(),
        ));
    };
    let book = context.manager.require_current()?;
    let entries = SavingsService::history(book, name)?;
    if entries.is_empty() {
        output::info(format!("No updates recorded for `{name}`."));
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("Date"),
        TableColumn::right("Amount"),
        TableColumn::new("Note").capped(32),
    ]);
    for entry in entries {
        table.add_row(vec![
            format_day(context, entry.recorded_at.date_naive()),
            format_money(context, entry.amount),
            entry.note.clone().unwrap_or_default(),
        ]);
    }
    output::section(format!("History: {name}"));
    table.print();
    Ok(())
}
