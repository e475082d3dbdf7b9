//! Combined charge + event views: the upcoming listing and the month
//! calendar grid.

use chrono::{Datelike, Months, NaiveDate};
use colored::Colorize;

use crate::cli::commands::{format_day, format_money, parse_days};
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::cli::{output, CommandError, CommandResult, ShellContext};
use crate::core::services::{AgendaItem, AgendaService, MonthMarks};

pub(crate) fn entries() -> Vec<CommandEntry> {
    vec![
        CommandEntry {
            name: "upcoming",
            description: "List what is due soon",
            usage: "upcoming [days]",
            handler: run_upcoming,
        },
        CommandEntry {
            name: "calendar",
            description: "Month grid with occurrence marks",
            usage: "calendar <year> <month>",
            handler: run_calendar,
        },
    ]
}

fn run_upcoming(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let days = match args.first() {
        Some(raw) => parse_days(raw)?,
        None => context.config.upcoming_days,
    };
    let today = context.today();
    let book = context.manager.require_current()?;
    let items = AgendaService::upcoming(book, today, days)?;
    if items.is_empty() {
        output::info(format!("Nothing due in the next {days} day(s)."));
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("When"),
        TableColumn::new("Item"),
        TableColumn::new("Kind"),
        TableColumn::right("Amount"),
    ]);
    for item in &items {
        table.add_row(vec![
            when_cell(context, item),
            item.name.clone(),
            item.label.to_string(),
            item.amount
                .map(|amount| format_money(context, amount))
                .unwrap_or_default(),
        ]);
    }
    output::section(format!("Next {days} day(s)"));
    table.print();
    Ok(())
}

fn run_calendar(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [year, month] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: calendar <year> <month>".into(),
        ));
    };
    let year: i32 = year
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid year `{year}`")))?;
    let month: u32 = month
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid month `{month}`")))?;
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        CommandError::InvalidArguments(format!("invalid month `{year}-{month}`"))
    })?;

    let book = context.manager.require_current()?;
    let marks = AgendaService::month_marks(book, year, month)?;
    print_month(first, &marks);
    Ok(())
}

/// Projected start, or the inclusive covered range for multi-day windows.
fn when_cell(context: &ShellContext, item: &AgendaItem) -> String {
    match item.last_day {
        Some(last) => format!(
            "{} → {}",
            format_day(context, item.date),
            format_day(context, last)
        ),
        None => format_day(context, item.date),
    }
}

fn print_month(first: NaiveDate, marks: &MonthMarks) {
    output::section(first.format("%B %Y").to_string());
    output::line(" Su  Mo  Tu  We  Th  Fr  Sa");

    let offset = first.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<String> = vec!["   ".to_string(); offset];
    for day in 1..=days_in_month(first) {
        cells.push(day_cell(day, marks));
        if cells.len() == 7 {
            output::line(cells.join(" "));
            cells.clear();
        }
    }
    if !cells.is_empty() {
        output::line(cells.join(" ").trim_end().to_string());
    }

    if marks.days.is_empty() {
        output::info("No occurrences this month.");
        return;
    }
    output::blank_line();
    for (day, items) in &marks.days {
        let names = items
            .iter()
            .map(legend_name)
            .collect::<Vec<_>>()
            .join(", ");
        output::line(format!("{day:>3}: {names}"));
    }
}

/// A three-character day cell; marked days carry a `*` and, in color mode,
/// a highlight.
fn day_cell(day: u32, marks: &MonthMarks) -> String {
    if marks.is_marked(day) {
        let cell = format!("{day:>2}*");
        if output::current_preferences().plain {
            cell
        } else {
            cell.bright_cyan().bold().to_string()
        }
    } else {
        format!("{day:>3}")
    }
}

fn legend_name(item: &AgendaItem) -> String {
    if output::current_preferences().plain {
        return item.name.clone();
    }
    match hex_rgb(&item.color) {
        Some((r, g, b)) => format!("{} {}", "■".truecolor(r, g, b), item.name),
        None => item.name.clone(),
    }
}

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn days_in_month(first: NaiveDate) -> u32 {
    let next = first + Months::new(1);
    next.signed_duration_since(first).num_days() as u32
}
