//! Business logic helpers for budgets and their expenses.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::book::{Book, Budget, Expense};
use crate::core::services::{ServiceError, ServiceResult};
use crate::errors::BookError;

use super::charge_service::{normalized_name, reject_duplicate};

/// Validated CRUD helpers for a book's budgets.
pub struct BudgetService;

impl BudgetService {
    /// Creates a budget with a positive spending limit.
    pub fn add(book: &mut Book, name: &str, limit: f64) -> ServiceResult<Uuid> {
        let name = normalized_name(name)?;
        reject_duplicate(book.budget_named(&name), "budget", &name)?;
        if limit <= 0.0 {
            return Err(ServiceError::Invalid(format!(
                "limit must be positive, got {limit}"
            )));
        }
        let id = book.add_budget(Budget::new(name.clone(), limit));
        tracing::info!(budget = %name, limit, "budget added");
        Ok(id)
    }

    pub fn rename(book: &mut Book, name: &str, new_name: &str) -> ServiceResult<()> {
        let new_name = normalized_name(new_name)?;
        if !name.eq_ignore_ascii_case(&new_name) {
            reject_duplicate(book.budget_named(&new_name), "budget", &new_name)?;
        }
        let budget = book.budget_named_mut(name)?;
        budget.name = new_name;
        book.mark_updated();
        Ok(())
    }

    /// Removes the budget matched by `name`, expenses and all.
    pub fn remove(book: &mut Book, name: &str) -> ServiceResult<Budget> {
        let id = book.budget_named(name)?.id;
        book.remove_budget(id)
            .ok_or_else(|| ServiceError::Invalid(format!("budget `{name}` vanished mid-removal")))
    }

    /// Records an expense against the named budget.
    pub fn add_expense(
        book: &mut Book,
        budget_name: &str,
        expense_name: &str,
        cost: f64,
        spent_on: NaiveDate,
    ) -> ServiceResult<Uuid> {
        let expense_name = normalized_name(expense_name)?;
        if cost <= 0.0 {
            return Err(ServiceError::Invalid(format!(
                "cost must be positive, got {cost}"
            )));
        }
        let budget = book.budget_named_mut(budget_name)?;
        let id = budget.add_expense(Expense::new(expense_name, cost, spent_on));
        book.mark_updated();
        Ok(id)
    }

    /// Removes an expense by name from the named budget.
    pub fn remove_expense(
        book: &mut Book,
        budget_name: &str,
        expense_name: &str,
    ) -> ServiceResult<Expense> {
        let budget = book.budget_named_mut(budget_name)?;
        let id = expense_named(budget, expense_name)?.id;
        let removed = budget.remove_expense(id).ok_or_else(|| {
            ServiceError::Invalid(format!("expense `{expense_name}` vanished mid-removal"))
        })?;
        book.mark_updated();
        Ok(removed)
    }

    /// Budgets ordered by name for stable listings.
    pub fn sorted(book: &Book) -> Vec<&Budget> {
        let mut budgets: Vec<&Budget> = book.budgets.iter().collect();
        budgets.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        budgets
    }
}

fn expense_named<'a>(budget: &'a Budget, name: &str) -> Result<&'a Expense, BookError> {
    let mut matches = budget
        .expenses
        .iter()
        .filter(|expense| expense.name.eq_ignore_ascii_case(name));
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (Some(_), Some(_)) => Err(BookError::AmbiguousReference(name.to_string())),
        (None, _) => Err(BookError::UnknownReference(name.to_string())),
    }
}
