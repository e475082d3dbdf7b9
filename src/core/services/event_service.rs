//! Business logic helpers for calendar events.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::book::{Book, Event, EventKind};
use crate::core::services::{ServiceError, ServiceResult};
use crate::schedule::{DateSpan, Frequency};

use super::charge_service::{normalized_name, reject_duplicate};

/// Validated CRUD and projection helpers for a book's events.
pub struct EventService;

impl EventService {
    /// Adds a new event and returns its identifier. `end` marks the last
    /// covered day of a multi-day event (inclusive, as entered by the user).
    pub fn add(
        book: &mut Book,
        name: &str,
        kind: EventKind,
        frequency: Frequency,
        start: NaiveDate,
        end: Option<NaiveDate>,
        notes: Option<String>,
    ) -> ServiceResult<Uuid> {
        let name = normalized_name(name)?;
        reject_duplicate(book.event_named(&name), "event", &name)?;
        let notes = notes.filter(|value| !value.trim().is_empty());
        let event = Event::new(name.clone(), kind, frequency, start, end, notes)?;
        let id = book.add_event(event);
        tracing::info!(event = %name, %frequency, "event added");
        Ok(id)
    }

    /// Removes the event matched by `name`, returning the removed record.
    pub fn remove(book: &mut Book, name: &str) -> ServiceResult<Event> {
        let id = book.event_named(name)?.id;
        book.remove_event(id)
            .ok_or_else(|| ServiceError::Invalid(format!("event `{name}` vanished mid-removal")))
    }

    /// Events ordered by their next occurrence from `today`, ties by name.
    pub fn sorted(book: &Book, today: NaiveDate) -> ServiceResult<Vec<(&Event, NaiveDate)>> {
        let mut entries = Vec::with_capacity(book.events.len());
        for event in &book.events {
            let next = event.next_occurrence(today)?;
            entries.push((event, next));
        }
        entries.sort_by(|(a, a_next), (b, b_next)| {
            a_next
                .cmp(b_next)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(entries)
    }

    /// The span the named event occupies next; one day long unless the
    /// event is multi-day.
    pub fn next(book: &Book, name: &str, today: NaiveDate) -> ServiceResult<DateSpan> {
        let event = book.event_named(name)?;
        Ok(event.next_span(today)?)
    }
}
