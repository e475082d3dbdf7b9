use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BookError;

/// A savings goal with a running balance and the history of updates that
/// produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub target: f64,
    pub balance: f64,
    #[serde(default)]
    pub entries: Vec<SavingsEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsEntry {
    pub id: Uuid,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target,
            balance: 0.0,
            entries: Vec::new(),
        }
    }

    /// Applies a signed update to the balance and appends the matching
    /// history entry — both or neither. A decrease that would push the
    /// balance below zero is rejected before anything changes.
    pub fn apply_update(&mut self, amount: f64, note: Option<String>) -> Result<f64, BookError> {
        let new_balance = self.balance + amount;
        if new_balance < 0.0 {
            return Err(BookError::BalanceFloor {
                balance: self.balance,
                amount,
            });
        }
        self.balance = new_balance;
        self.entries.push(SavingsEntry {
            id: Uuid::new_v4(),
            amount,
            note,
            recorded_at: Utc::now(),
        });
        Ok(self.balance)
    }

    /// Progress toward the target, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 100.0;
        }
        (self.balance / self.target * 100.0).min(100.0)
    }

    pub fn is_reached(&self) -> bool {
        self.balance >= self.target
    }
}
