//! Book lifecycle: create, open, save, and safeguard the aggregate on disk.

use crate::cli::commands::{format_day, format_money};
use crate::cli::registry::CommandEntry;
use crate::cli::{output, CommandError, CommandResult, ShellContext};

pub(crate) fn entries() -> Vec<CommandEntry> {
    vec![CommandEntry {
        name: "book",
        description: "Create, open, and safeguard books",
        usage: "book <new|open|save|close|list|backups|backup|restore|show> [args]",
        handler: run_book,
    }]
}

fn run_book(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: book <new|open|save|close|list|backups|backup|restore|show>".into(),
        ));
    };

    match subcommand.to_ascii_lowercase().as_str() {
        "new" => create_book(context, rest),
        "open" | "load" => open_book(context, rest),
        "save" => save_book(context),
        "close" => close_book(context),
        "list" => list_books(context),
        "backups" => list_backups(context, rest),
        "backup" => take_backup(context, rest),
        "restore" => restore_book(context, rest),
        "show" => show_book(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown book subcommand `{other}`. Available: new, open, save, close, list, backups, backup, restore, show"
        ))),
    }
}

fn create_book(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_name(args, "usage: book new <name>")?;
    let path = context.manager.create(&name)?;
    context.remember_last_opened(&name);
    output::success(format!("Created book `{name}` at {}.", path.display()));
    Ok(())
}

fn open_book(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_name(args, "usage: book open <name>")?;
    let book = context.manager.open(&name)?;
    let summary = format!(
        "{} charge(s), {} event(s), {} budget(s), {} savings goal(s)",
        book.charges.len(),
        book.events.len(),
        book.budgets.len(),
        book.savings.len()
    );
    context.remember_last_opened(&name);
    output::success(format!("Opened book `{name}`: {summary}."));
    Ok(())
}

fn save_book(context: &mut ShellContext) -> CommandResult {
    let path = context.manager.save()?;
    output::success(format!("Saved to {}.", path.display()));
    Ok(())
}

fn close_book(context: &mut ShellContext) -> CommandResult {
    if !context.manager.is_loaded() {
        output::info("No book is open.");
        return Ok(());
    }
    context.manager.save()?;
    let name = context
        .manager
        .current_name()
        .unwrap_or("book")
        .to_string();
    context.manager.close();
    context.clear_last_opened();
    output::success(format!("Closed `{name}`."));
    Ok(())
}

fn list_books(context: &mut ShellContext) -> CommandResult {
    let names = context.manager.list_books()?;
    if names.is_empty() {
        output::info("No books found. Create one with `book new <name>`.");
        return Ok(());
    }
    output::section("Books");
    for name in names {
        if context.manager.current_name() == Some(name.as_str()) {
            output::info(format!("  {name} (open)"));
        } else {
            output::info(format!("  {name}"));
        }
    }
    Ok(())
}

fn list_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = named_or_current(context, args)?;
    let backups = context.manager.list_backups(&name)?;
    if backups.is_empty() {
        output::info(format!("No backups recorded for `{name}`."));
        return Ok(());
    }
    output::section(format!("Backups of {name}"));
    for backup in backups {
        output::info(format!("  {backup}"));
    }
    Ok(())
}

fn take_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    };
    let path = context.manager.backup(note.as_deref())?;
    output::success(format!("Backup written to {}.", path.display()));
    Ok(())
}

fn restore_book(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(backup_name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: book restore <backup> [book]".into(),
        ));
    };
    let name = match args.get(1) {
        Some(name) => (*name).to_string(),
        None => named_or_current(context, &[])?,
    };
    if !context.confirm_destructive(&format!(
        "Replace the current contents of `{name}` with backup `{backup_name}`?"
    ))? {
        output::info("Restore cancelled.");
        return Ok(());
    }
    context.manager.restore(&name, backup_name)?;
    output::success(format!("Restored `{name}` from `{backup_name}`."));
    Ok(())
}

fn show_book(context: &mut ShellContext) -> CommandResult {
    let book = context.manager.require_current()?;
    output::section(format!("Book: {}", book.name));
    output::info(format!("  Budgets      : {}", book.budgets.len()));
    output::info(format!(
        "  Charges      : {} ({} per month)",
        book.charges.len(),
        format_money(context, book.monthly_commitment())
    ));
    output::info(format!("  Events       : {}", book.events.len()));
    output::info(format!("  Savings goals: {}", book.savings.len()));
    output::info(format!(
        "  Created      : {}",
        format_day(context, book.created_at.date_naive())
    ));
    output::info(format!(
        "  Last change  : {}",
        format_day(context, book.updated_at.date_naive())
    ));
    Ok(())
}

fn require_name(args: &[&str], usage: &str) -> Result<String, CommandError> {
    match args.first() {
        Some(_) => Ok(args.join(" ").trim().to_string()),
        None => Err(CommandError::InvalidArguments(usage.into())),
    }
}

fn named_or_current(context: &ShellContext, args: &[&str]) -> Result<String, CommandError> {
    match args.first() {
        Some(name) => Ok((*name).to_string()),
        None => context
            .manager
            .current_name()
            .map(str::to_string)
            .ok_or(CommandError::BookNotLoaded),
    }
}
