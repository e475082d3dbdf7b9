//! Budget envelopes and the one-off expenses recorded against them.

use colored::Colorize;

use crate::book::Budget;
use crate::cli::commands::{format_day, format_money, parse_amount, parse_date};
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::cli::{output, CommandError, CommandResult, ShellContext};
use crate::core::services::BudgetService;

pub(crate) fn entries() -> Vec<CommandEntry> {
    vec![
        CommandEntry {
            name: "budget",
            description: "Plan spending envelopes",
            usage: "budget <add|rename|remove|list|show> [args]",
            handler: run_budget,
        },
        CommandEntry {
            name: "expense",
            description: "Record spending against a budget",
            usage: "expense <add|remove|list> [args]",
            handler: run_expense,
        },
    ]
}

fn run_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: budget <add|rename|remove|list|show>".into(),
        ));
    };

    match subcommand.to_ascii_lowercase().as_str() {
        "add" => add_budget(context, rest),
        "rename" => rename_budget(context, rest),
        "remove" => remove_budget(context, rest),
        "list" => list_budgets(context),
        "show" => show_budget(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown budget subcommand `{other}`. Available: add, rename, remove, list, show"
        ))),
    }
}

fn run_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: expense <add|remove|list>".into(),
        ));
    };

    match subcommand.to_ascii_lowercase().as_str() {
        "add" => add_expense(context, rest),
        "remove" => remove_expense(context, rest),
        "list" => list_expenses(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown expense subcommand `{other}`. Available: add, remove, list"
        ))),
    }
}

fn add_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, limit] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: budget add <name> <limit>".into(),
        ));
    };
    let limit = parse_amount(limit)?;
    let book = context.manager.require_current_mut()?;
    BudgetService::add(book, name, limit)?;
    context.manager.save()?;
    output::success(format!("Added budget `{name}`."));
    Ok(())
}

fn rename_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, new_name] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: budget rename <name> <new name>".into(),
        ));
    };
    let book = context.manager.require_current_mut()?;
    BudgetService::rename(book, name, new_name)?;
    context.manager.save()?;
    output::success(format!("Renamed budget `{name}` to `{new_name}`."));
    Ok(())
}

fn remove_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: budget remove <name>".into(),
        ));
    };
    if !context.confirm_destructive(&format!("Remove budget `{name}` and its expenses?"))? {
        output::info("Removal cancelled.");
        return Ok(());
    }
    let book = context.manager.require_current_mut()?;
    let removed = BudgetService::remove(book, name)?;
    context.manager.save()?;
    output::success(format!(
        "Removed budget `{}` ({} expense(s) with it).",
        removed.name,
        removed.expenses.len()
    ));
    Ok(())
}

fn list_budgets(context: &mut ShellContext) -> CommandResult {
    let book = context.manager.require_current()?;
    let budgets = BudgetService::sorted(book);
    if budgets.is_empty() {
        output::info("No budgets yet. Add one with `budget add <name> <limit>`.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("Budget"),
        TableColumn::right("Limit"),
        TableColumn::right("Spent"),
        TableColumn::right("Remaining"),
    ]);
    for budget in budgets {
        table.add_row(vec![
            budget.name.clone(),
            format_money(context, budget.limit),
            format_money(context, budget.spent()),
            remaining_cell(context, budget),
        ]);
    }
    output::section("Budgets");
    table.print();
    Ok(())
}

fn show_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: budget show <name>".into(),
        ));
    };
    let book = context.manager.require_current()?;
    let budget = book.budget_named(name)?;

    output::section(format!("Budget: {}", budget.name));
    output::info(format!(
        "  Limit    : {}",
        format_money(context, budget.limit)
    ));
    output::info(format!(
        "  Spent    : {}",
        format_money(context, budget.spent())
    ));
    output::info(format!("  Remaining: {}", remaining_cell(context, budget)));
    print_expenses(context, budget);
    Ok(())
}

fn add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (budget_name, name, cost, spent_on) = match args {
        [budget_name, name, cost] => (budget_name, name, parse_amount(cost)?, context.today()),
        [budget_name, name, cost, date] => {
            (budget_name, name, parse_amount(cost)?, parse_date(date)?)
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: expense add <budget> <name> <cost> [date]".into(),
            ))
        }
    };
    let book = context.manager.require_current_mut()?;
    BudgetService::add_expense(book, budget_name, name, cost, spent_on)?;
    context.manager.save()?;
    output::success(format!("Recorded `{name}` under `{budget_name}`."));
    Ok(())
}

fn remove_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [budget_name, name] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: expense remove <budget> <name>".into(),
        ));
    };
    if !context.confirm_destructive(&format!("Remove expense `{name}` from `{budget_name}`?"))? {
        output::info("Removal cancelled.");
        return Ok(());
    }
    let book = context.manager.require_current_mut()?;
    BudgetService::remove_expense(book, budget_name, name)?;
    context.manager.save()?;
    output::success(format!("Removed `{name}` from `{budget_name}`."));
    Ok(())
}

fn list_expenses(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: expense list <budget>".into(),
        ));
    };
    let book = context.manager.require_current()?;
    let budget = book.budget_named(name)?;
    output::section(format!("Expenses: {}", budget.name));
    print_expenses(context, budget);
    Ok(())
}

fn print_expenses(context: &ShellContext, budget: &Budget) {
    if budget.expenses.is_empty() {
        output::info("  No expenses recorded.");
        return;
    }
    let mut expenses: Vec<_> = budget.expenses.iter().collect();
    expenses.sort_by(|a, b| {
        a.spent_on
            .cmp(&b.spent_on)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    let mut table = Table::new(vec![
        TableColumn::new("Expense"),
        TableColumn::right("Cost"),
        TableColumn::new("Date"),
    ]);
    for expense in expenses {
        table.add_row(vec![
            expense.name.clone(),
            format_money(context, expense.cost),
            format_day(context, expense.spent_on),
        ]);
    }
    table.print();
}

/// Remaining amount, flagged when the budget has overrun its limit.
fn remaining_cell(context: &ShellContext, budget: &Budget) -> String {
    let amount = format_money(context, budget.remaining());
    if !budget.is_overrun() {
        return amount;
    }
    if output::current_preferences().plain {
        format!("{amount} (over)")
    } else {
        format!("{} (over)", amount.bright_red())
    }
}
