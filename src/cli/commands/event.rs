//! Calendar event commands, one-time or recurring, single- or multi-day.

use chrono::NaiveDate;

use crate::book::Event;
use crate::cli::commands::{format_day, parse_date, parse_event_kind};
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::cli::{output, CommandError, CommandResult, ShellContext};
use crate::core::services::EventService;
use crate::schedule::Frequency;

pub(crate) fn entries() -> Vec<CommandEntry> {
    vec![CommandEntry {
        name: "event",
        description: "Track one-time and recurring events",
        usage: "event <add|remove|list|next> [args]",
        handler: run_event,
    }]
}

fn run_event(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: event <add|remove|list|next>".into(),
        ));
    };

    match subcommand.to_ascii_lowercase().as_str() {
        "add" => add_event(context, rest),
        "remove" => remove_event(context, rest),
        "list" => list_events(context),
        "next" => next_event(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown event subcommand `{other}`. Available: add, remove, list, next"
        ))),
    }
}

fn add_event(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 4 {
        return Err(CommandError::InvalidArguments(
            "usage: event add <name> <kind> <frequency> <start> [end] [notes]".into(),
        ));
    }
    let name = args[0].trim();
    let kind = parse_event_kind(args[1])?;
    let frequency = args[2].parse::<Frequency>()?;
    let start = parse_date(args[3])?;

    // An end date may directly follow the start; everything after is notes.
    let (end, notes_args) = match args.get(4) {
        Some(raw) => match parse_date(raw) {
            Ok(date) => (Some(date), &args[5..]),
            Err(_) => (None, &args[4..]),
        },
        None => (None, &args[4..]),
    };
    let notes = if notes_args.is_empty() {
        None
    } else {
        Some(notes_args.join(" "))
    };

    let book = context.manager.require_current_mut()?;
    EventService::add(book, name, kind, frequency, start, end, notes)?;
    context.manager.save()?;
    output::success(format!("Added event `{name}`."));
    Ok(())
}

fn remove_event(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: event remove <name>".into(),
        ));
    };
    if !context.confirm_destructive(&format!("Remove event `{name}`?"))? {
        output::info("Removal cancelled.");
        return Ok(());
    }
    let book = context.manager.require_current_mut()?;
    let removed = EventService::remove(book, name)?;
    context.manager.save()?;
    output::success(format!("Removed event `{}`.", removed.name));
    Ok(())
}

fn list_events(context: &mut ShellContext) -> CommandResult {
    let today = context.today();
    let book = context.manager.require_current()?;
    if book.events.is_empty() {
        output::info("No events yet. Add one with `event add <name> <kind> <frequency> <start>`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("Event"),
        TableColumn::new("Kind"),
        TableColumn::new("When"),
        TableColumn::new("Notes").capped(28),
    ]);
    for (event, _next) in EventService::sorted(book, today)? {
        table.add_row(vec![
            event.name.clone(),
            event.kind.token().to_string(),
            when_cell(context, event, today)?,
            event.notes.clone().unwrap_or_default(),
        ]);
    }
    output::section("Events");
    table.print();
    Ok(())
}

fn next_event(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: event next <name>".into(),
        ));
    };
    let today = context.today();
    let book = context.manager.require_current()?;
    let span = EventService::next(book, name, today)?;
    if span.covered_days() > 1 {
        output::info(format!(
            "Next `{name}`: {} → {} ({} days).",
            format_day(context, span.start),
            format_day(context, span.last_day()),
            span.covered_days()
        ));
    } else {
        output::info(format!(
            "Next `{name}`: {}.",
            format_day(context, span.start)
        ));
    }
    Ok(())
}

/// The projected dates an event occupies next: a single day, or the
/// inclusive range of a multi-day window.
fn when_cell(
    context: &ShellContext,
    event: &Event,
    today: NaiveDate,
) -> Result<String, CommandError> {
    let span = event.next_span(today)?;
    if event.is_multi_day() {
        Ok(format!(
            "{} → {}",
            format_day(context, span.start),
            format_day(context, span.last_day())
        ))
    } else {
        Ok(format_day(context, span.start))
    }
}
