//! Business logic helpers for recurring charges.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::book::{Book, Charge, ChargeKind};
use crate::core::services::{ServiceError, ServiceResult};
use crate::errors::BookError;
use crate::schedule::{Frequency, RecurrenceRule};

/// Validated CRUD and projection helpers for a book's charges.
pub struct ChargeService;

impl ChargeService {
    /// Adds a new charge and returns its identifier. The recurrence rule is
    /// derived from `start`: weekly charges anchor to its weekday, monthly
    /// ones to its day-of-month, annual ones to its month and day.
    pub fn add(
        book: &mut Book,
        name: &str,
        amount: f64,
        kind: ChargeKind,
        frequency: Frequency,
        start: NaiveDate,
    ) -> ServiceResult<Uuid> {
        let name = normalized_name(name)?;
        reject_duplicate(book.charge_named(&name), "charge", &name)?;
        if amount <= 0.0 {
            return Err(ServiceError::Invalid(format!(
                "amount must be positive, got {amount}"
            )));
        }
        let rule = RecurrenceRule::from_start(frequency, start);
        let charge = Charge::new(name.clone(), amount, kind, rule)?;
        let id = book.add_charge(charge);
        tracing::info!(charge = %name, %frequency, "charge added");
        Ok(id)
    }

    /// Removes the charge matched by `name`, returning the removed record.
    pub fn remove(book: &mut Book, name: &str) -> ServiceResult<Charge> {
        let id = book.charge_named(name)?.id;
        book.remove_charge(id)
            .ok_or_else(|| ServiceError::Invalid(format!("charge `{name}` vanished mid-removal")))
    }

    /// Charges ordered for listing: frequency groups first, anchor alignment
    /// and name within each group.
    pub fn sorted(book: &Book) -> Vec<&Charge> {
        let mut charges: Vec<&Charge> = book.charges.iter().collect();
        charges.sort_by(|a, b| {
            a.rule
                .frequency
                .cmp(&b.rule.frequency)
                .then(a.group_rank().cmp(&b.group_rank()))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        charges
    }

    /// Groups charges by frequency in listing order, skipping empty groups.
    pub fn grouped(book: &Book) -> Vec<(Frequency, Vec<&Charge>)> {
        let sorted = Self::sorted(book);
        let mut groups: Vec<(Frequency, Vec<&Charge>)> = Vec::new();
        for charge in sorted {
            match groups.last_mut() {
                Some((frequency, members)) if *frequency == charge.rule.frequency => {
                    members.push(charge)
                }
                _ => groups.push((charge.rule.frequency, vec![charge])),
            }
        }
        groups
    }

    /// Projects the next occurrence for the charge matched by `name`.
    pub fn next(book: &Book, name: &str, today: NaiveDate) -> ServiceResult<NaiveDate> {
        let charge = book.charge_named(name)?;
        Ok(charge.next_occurrence(today)?)
    }
}

pub(super) fn normalized_name(name: &str) -> ServiceResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Invalid("name cannot be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Add-time guard: a second record under the same name would make later
/// name lookups ambiguous.
pub(super) fn reject_duplicate<T>(
    lookup: Result<T, BookError>,
    noun: &str,
    name: &str,
) -> ServiceResult<()> {
    match lookup {
        Err(BookError::UnknownReference(_)) => Ok(()),
        Ok(_) | Err(BookError::AmbiguousReference(_)) => Err(ServiceError::Invalid(format!(
            "{noun} `{name}` already exists"
        ))),
        Err(other) => Err(other.into()),
    }
}
