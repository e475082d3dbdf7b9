//! Recurring charge commands: the fixed costs a book carries.

use crate::cli::commands::{
    format_day, format_money, parse_amount, parse_charge_kind, parse_date,
};
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::cli::{output, CommandError, CommandResult, ShellContext};
use crate::core::services::ChargeService;
use crate::schedule::Frequency;

pub(crate) fn entries() -> Vec<CommandEntry> {
    vec![CommandEntry {
        name: "charge",
        description: "Track recurring charges",
        usage: "charge <add|remove|list|next> [args]",
        handler: run_charge,
    }]
}

fn run_charge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: charge <add|remove|list|next>".into(),
        ));
    };

    match subcommand.to_ascii_lowercase().as_str() {
        "add" => add_charge(context, rest),
        "remove" => remove_charge(context, rest),
        "list" => list_charges(context),
        "next" => next_charge(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown charge subcommand `{other}`. Available: add, remove, list, next"
        ))),
    }
}

fn add_charge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, amount, kind, frequency, start) = match args {
        [name, amount, kind, frequency] => (
            name,
            parse_amount(amount)?,
            parse_charge_kind(kind)?,
            frequency.parse::<Frequency>()?,
            context.today(),
        ),
        [name, amount, kind, frequency, start] => (
            name,
            parse_amount(amount)?,
            parse_charge_kind(kind)?,
            frequency.parse::<Frequency>()?,
            parse_date(start)?,
        ),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: charge add <name> <amount> <kind> <frequency> [start]".into(),
            ))
        }
    };

    let name = name.trim();
    let book = context.manager.require_current_mut()?;
    ChargeService::add(book, name, amount, kind, frequency, start)?;
    let cadence = book.charge_named(name)?.rule.describe();
    context.manager.save()?;
    output::success(format!(
        "Added charge `{name}` ({}, {cadence}).",
        format_money(context, amount)
    ));
    Ok(())
}

fn remove_charge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: charge remove <name>".into(),
        ));
    };
    if !context.confirm_destructive(&format!("Remove charge `{name}`?"))? {
        output::info("Removal cancelled.");
        return Ok(());
    }
    let book = context.manager.require_current_mut()?;
    let removed = ChargeService::remove(book, name)?;
    context.manager.save()?;
    output::success(format!("Removed charge `{}`.", removed.name));
    Ok(())
}

fn list_charges(context: &mut ShellContext) -> CommandResult {
    let today = context.today();
    let book = context.manager.require_current()?;
    if book.charges.is_empty() {
        output::info("No charges yet. Add one with `charge add <name> <amount> <kind> <frequency>`.");
        return Ok(());
    }

    for (frequency, charges) in ChargeService::grouped(book) {
        let mut table = Table::new(vec![
            TableColumn::new("Charge"),
            TableColumn::right("Amount"),
            TableColumn::new("Kind"),
            TableColumn::new("Cadence"),
            TableColumn::new("Next"),
        ]);
        for charge in charges {
            let next = charge.next_occurrence(today)?;
            table.add_row(vec![
                charge.name.clone(),
                format_money(context, charge.amount),
                charge.kind.token().to_string(),
                charge.rule.describe(),
                format_day(context, next),
            ]);
        }
        output::section(frequency.label());
        table.print();
    }

    output::blank_line();
    output::info(format!(
        "Monthly commitment: {}",
        format_money(context, book.monthly_commitment())
    ));
    Ok(())
}

fn next_charge(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.today();
    let book = context.manager.require_current()?;

    if let Some(name) = args.first() {
        let next = ChargeService::next(book, name, today)?;
        output::info(format!("Next `{name}`: {}.", format_day(context, next)));
        return Ok(());
    }

    if book.charges.is_empty() {
        output::info("No charges yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::new("Charge"),
        TableColumn::new("Next"),
        TableColumn::right("Amount"),
    ]);
    for charge in ChargeService::sorted(book) {
        let next = charge.next_occurrence(today)?;
        table.add_row(vec![
            charge.name.clone(),
            format_day(context, next),
            format_money(context, charge.amount),
        ]);
    }
    output::section("Next occurrences");
    table.print();
    Ok(())
}
