use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::BookError;

use super::{budget::Budget, charge::Charge, event::Event, savings::SavingsGoal};

pub const SCHEMA_VERSION: u8 = 1;

/// The aggregate a user works in: one named book owning budgets, recurring
/// charges, calendar events, and savings goals. One book maps to one JSON
/// document on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub charges: Vec<Charge>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub savings: Vec<SavingsGoal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
}

impl Book {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            budgets: Vec::new(),
            charges: Vec::new(),
            events: Vec::new(),
            savings: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: SCHEMA_VERSION,
        }
    }

    /// Stamps the book as modified. Every mutating helper below calls this
    /// so `updated_at` tracks the last real change.
    pub fn mark_updated(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn add_budget(&mut self, budget: Budget) -> Uuid {
        let id = budget.id;
        self.budgets.push(budget);
        self.mark_updated();
        id
    }

    pub fn add_charge(&mut self, charge: Charge) -> Uuid {
        let id = charge.id;
        self.charges.push(charge);
        self.mark_updated();
        id
    }

    pub fn add_event(&mut self, event: Event) -> Uuid {
        let id = event.id;
        self.events.push(event);
        self.mark_updated();
        id
    }

    pub fn add_savings(&mut self, goal: SavingsGoal) -> Uuid {
        let id = goal.id;
        self.savings.push(goal);
        self.mark_updated();
        id
    }

    pub fn budget_named(&self, name: &str) -> Result<&Budget, BookError> {
        find_named(&self.budgets, name, |budget| &budget.name)
    }

    pub fn budget_named_mut(&mut self, name: &str) -> Result<&mut Budget, BookError> {
        find_named_mut(&mut self.budgets, name, |budget| &budget.name)
    }

    pub fn charge_named(&self, name: &str) -> Result<&Charge, BookError> {
        find_named(&self.charges, name, |charge| &charge.name)
    }

    pub fn event_named(&self, name: &str) -> Result<&Event, BookError> {
        find_named(&self.events, name, |event| &event.name)
    }

    pub fn savings_named(&self, name: &str) -> Result<&SavingsGoal, BookError> {
        find_named(&self.savings, name, |goal| &goal.name)
    }

    pub fn savings_named_mut(&mut self, name: &str) -> Result<&mut SavingsGoal, BookError> {
        find_named_mut(&mut self.savings, name, |goal| &goal.name)
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Option<Budget> {
        let index = self.budgets.iter().position(|budget| budget.id == id)?;
        let removed = self.budgets.remove(index);
        self.mark_updated();
        Some(removed)
    }

    pub fn remove_charge(&mut self, id: Uuid) -> Option<Charge> {
        let index = self.charges.iter().position(|charge| charge.id == id)?;
        let removed = self.charges.remove(index);
        self.mark_updated();
        Some(removed)
    }

    pub fn remove_event(&mut self, id: Uuid) -> Option<Event> {
        let index = self.events.iter().position(|event| event.id == id)?;
        let removed = self.events.remove(index);
        self.mark_updated();
        Some(removed)
    }

    pub fn remove_savings(&mut self, id: Uuid) -> Option<SavingsGoal> {
        let index = self.savings.iter().position(|goal| goal.id == id)?;
        let removed = self.savings.remove(index);
        self.mark_updated();
        Some(removed)
    }

    /// Monthly outgo committed to recurring charges, normalizing every
    /// cadence to a per-month figure for the `book show` summary.
    pub fn monthly_commitment(&self) -> f64 {
        use crate::schedule::Frequency;
        self.charges
            .iter()
            .map(|charge| match charge.rule.frequency {
                Frequency::Daily => charge.amount * 30.0,
                Frequency::Weekly => charge.amount * 52.0 / 12.0,
                Frequency::Monthly => charge.amount,
                Frequency::Annually => charge.amount / 12.0,
                Frequency::Once => 0.0,
            })
            .sum()
    }
}

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

fn find_named<'a, T>(
    items: &'a [T],
    name: &str,
    field: impl Fn(&T) -> &str,
) -> Result<&'a T, BookError> {
    let mut matches = items
        .iter()
        .filter(|item| field(item).eq_ignore_ascii_case(name));
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (Some(_), Some(_)) => Err(BookError::AmbiguousReference(name.to_string())),
        (None, _) => Err(BookError::UnknownReference(name.to_string())),
    }
}

fn find_named_mut<'a, T>(
    items: &'a mut [T],
    name: &str,
    field: impl Fn(&T) -> &str,
) -> Result<&'a mut T, BookError> {
    let mut indices = items
        .iter()
        .enumerate()
        .filter(|(_, item)| field(item).eq_ignore_ascii_case(name))
        .map(|(index, _)| index);
    match (indices.next(), indices.next()) {
        (Some(index), None) => Ok(&mut items[index]),
        (Some(_), Some(_)) => Err(BookError::AmbiguousReference(name.to_string())),
        (None, _) => Err(BookError::UnknownReference(name.to_string())),
    }
}
