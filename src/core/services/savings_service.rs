//! Business logic helpers for savings goals.

use uuid::Uuid;

use crate::book::{Book, SavingsEntry, SavingsGoal};
use crate::core::services::{ServiceError, ServiceResult};

use super::charge_service::{normalized_name, reject_duplicate};

/// Validated CRUD and update helpers for a book's savings goals.
pub struct SavingsService;

impl SavingsService {
    /// Creates a savings goal with a positive target.
    pub fn add(book: &mut Book, name: &str, target: f64) -> ServiceResult<Uuid> {
        let name = normalized_name(name)?;
        reject_duplicate(book.savings_named(&name), "savings goal", &name)?;
        if target <= 0.0 {
            return Err(ServiceError::Invalid(format!(
                "target must be positive, got {target}"
            )));
        }
        let id = book.add_savings(SavingsGoal::new(name.clone(), target));
        tracing::info!(goal = %name, target, "savings goal added");
        Ok(id)
    }

    /// Removes the goal matched by `name`, history and all.
    pub fn remove(book: &mut Book, name: &str) -> ServiceResult<SavingsGoal> {
        let id = book.savings_named(name)?.id;
        book.remove_savings(id).ok_or_else(|| {
            ServiceError::Invalid(format!("savings goal `{name}` vanished mid-removal"))
        })
    }

    /// Moves money in or out of a goal. The balance change and the history
    /// entry land together or not at all; a withdrawal below zero is
    /// rejected before anything is written. Returns the new balance.
    pub fn record_update(
        book: &mut Book,
        name: &str,
        amount: f64,
        note: Option<String>,
    ) -> ServiceResult<f64> {
        if amount == 0.0 {
            return Err(ServiceError::Invalid(
                "update amount cannot be zero".into(),
            ));
        }
        let note = note.filter(|value| !value.trim().is_empty());
        let goal = book.savings_named_mut(name)?;
        let balance = goal.apply_update(amount, note)?;
        book.mark_updated();
        tracing::info!(goal = %name, amount, balance, "savings updated");
        Ok(balance)
    }

    /// The recorded update history for the named goal, newest last.
    pub fn history<'a>(book: &'a Book, name: &str) -> ServiceResult<&'a [SavingsEntry]> {
        let goal = book.savings_named(name)?;
        Ok(&goal.entries)
    }

    /// Goals ordered by name for stable listings.
    pub fn sorted(book: &Book) -> Vec<&SavingsGoal> {
        let mut goals: Vec<&SavingsGoal> = book.savings.iter().collect();
        goals.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        goals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BookError;

    #[test]
    fn deposits_and_withdrawals_move_the_balance() {
        let mut book = Book::new("Savings");
        SavingsService::add(&mut book, "Emergency", 1000.0).unwrap();

        let balance =
            SavingsService::record_update(&mut book, "Emergency", 250.0, Some("Payday".into()))
                .unwrap();
        assert!((balance - 250.0).abs() < f64::EPSILON);

        let balance = SavingsService::record_update(&mut book, "Emergency", -100.0, None).unwrap();
        assert!((balance - 150.0).abs() < f64::EPSILON);

        let history = SavingsService::history(&book, "Emergency").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].note.as_deref(), Some("Payday"));
    }

    #[test]
    fn overdraw_is_rejected_and_leaves_no_entry() {
        let mut book = Book::new("Savings");
        SavingsService::add(&mut book, "Holiday", 500.0).unwrap();
        SavingsService::record_update(&mut book, "Holiday", 50.0, None).unwrap();

        let err = SavingsService::record_update(&mut book, "Holiday", -80.0, None)
            .expect_err("overdraw must fail");
        assert!(matches!(
            err,
            ServiceError::Book(BookError::BalanceFloor { .. })
        ));

        let goal = book.savings_named("Holiday").unwrap();
        assert!((goal.balance - 50.0).abs() < f64::EPSILON);
        assert_eq!(goal.entries.len(), 1);
    }

    #[test]
    fn zero_amount_updates_are_rejected() {
        let mut book = Book::new("Savings");
        SavingsService::add(&mut book, "Car", 8000.0).unwrap();
        let err = SavingsService::record_update(&mut book, "Car", 0.0, None)
            .expect_err("zero update must fail");
        assert!(matches!(err, ServiceError::Invalid(_)));
    }
}
