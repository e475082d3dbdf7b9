use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spending envelope with a planned limit and the expenses charged
/// against it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub limit: f64,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    pub cost: f64,
    pub spent_on: NaiveDate,
}

impl Budget {
    pub fn new(name: impl Into<String>, limit: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            limit,
            expenses: Vec::new(),
        }
    }

    pub fn add_expense(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        id
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Option<Expense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn spent(&self) -> f64 {
        self.expenses.iter().map(|expense| expense.cost).sum()
    }

    pub fn remaining(&self) -> f64 {
        self.limit - self.spent()
    }

    pub fn is_overrun(&self) -> bool {
        self.spent() > self.limit
    }
}

impl Expense {
    pub fn new(name: impl Into<String>, cost: f64, spent_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cost,
            spent_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn remaining_tracks_expenses() {
        let mut budget = Budget::new("Groceries", 400.0);
        budget.add_expense(Expense::new("Market run", 62.35, date(2024, 1, 6)));
        budget.add_expense(Expense::new("Bakery", 12.4, date(2024, 1, 8)));
        assert!((budget.spent() - 74.75).abs() < 1e-9);
        assert!((budget.remaining() - 325.25).abs() < 1e-9);
        assert!(!budget.is_overrun());
    }

    #[test]
    fn overrun_flags_once_limit_is_crossed() {
        let mut budget = Budget::new("Dining out", 50.0);
        budget.add_expense(Expense::new("Dinner", 63.0, date(2024, 1, 12)));
        assert!(budget.is_overrun());
        assert!(budget.remaining() < 0.0);
    }

    #[test]
    fn remove_expense_returns_the_removed_row() {
        let mut budget = Budget::new("Hobby", 100.0);
        let id = budget.add_expense(Expense::new("Paint", 18.0, date(2024, 2, 1)));
        let removed = budget.remove_expense(id).expect("known expense");
        assert_eq!(removed.name, "Paint");
        assert!(budget.remove_expense(id).is_none());
    }
}
