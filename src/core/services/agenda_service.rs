//! Cross-record projections: the upcoming listing and the calendar view.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Months, NaiveDate};
use uuid::Uuid;

use crate::book::{Book, Charge, Event};
use crate::core::services::{ServiceError, ServiceResult};
use crate::schedule::{self, DateSpan, Frequency};

/// Which record family an agenda entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgendaSource {
    Charge,
    Event,
}

/// One row of the upcoming listing or one mark on a calendar day.
#[derive(Debug, Clone)]
pub struct AgendaItem {
    pub source: AgendaSource,
    pub id: Uuid,
    pub name: String,
    /// Projected start for listings; the covered day for calendar marks.
    pub date: NaiveDate,
    /// Final covered day (inclusive) for multi-day events.
    pub last_day: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub label: &'static str,
    pub color: String,
}

/// Occurrence marks for one calendar month, keyed by day-of-month.
#[derive(Debug, Clone)]
pub struct MonthMarks {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<u32, Vec<AgendaItem>>,
}

impl MonthMarks {
    pub fn is_marked(&self, day: u32) -> bool {
        self.days.contains_key(&day)
    }

    pub fn entries(&self, day: u32) -> &[AgendaItem] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Projections that combine charges and events into user-facing views.
pub struct AgendaService;

impl AgendaService {
    /// Everything due within `[today, today + days)`: charges by their next
    /// occurrence, events by window overlap. Sorted by date, then name.
    pub fn upcoming(book: &Book, today: NaiveDate, days: i64) -> ServiceResult<Vec<AgendaItem>> {
        if days <= 0 {
            return Err(ServiceError::Invalid(format!(
                "horizon must be at least one day, got {days}"
            )));
        }
        let horizon = DateSpan::horizon(today, days);
        let mut items = Vec::new();
        for charge in &book.charges {
            let next = charge.next_occurrence(today)?;
            if horizon.contains(next) {
                items.push(charge_item(charge, next));
            }
        }
        for event in &book.events {
            let span = event.next_span(today)?;
            if span.overlaps(&horizon) {
                items.push(event_item(event, span));
            }
        }
        items.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(items)
    }

    /// Marks every charge and event occurrence inside the given month.
    /// Multi-day windows mark each covered day. Charges mark their alignment
    /// days in any month viewed; events only from their start date onward.
    pub fn month_marks(book: &Book, year: i32, month: u32) -> ServiceResult<MonthMarks> {
        let span = month_span(year, month)?;
        let mut days: BTreeMap<u32, Vec<AgendaItem>> = BTreeMap::new();

        for charge in &book.charges {
            for date in single_day_hits(&charge.rule, span, span.start)? {
                days.entry(date.day()).or_default().push(charge_item(charge, date));
            }
        }

        for event in &book.events {
            if event.is_multi_day() {
                for date in window_hits(&event.rule, span)? {
                    days.entry(date.day())
                        .or_default()
                        .push(event_item_on(event, date));
                }
            } else {
                let from = span.start.max(event.rule.anchor_start);
                for date in single_day_hits(&event.rule, span, from)? {
                    days.entry(date.day())
                        .or_default()
                        .push(event_item_on(event, date));
                }
            }
        }

        Ok(MonthMarks { year, month, days })
    }
}

fn charge_item(charge: &Charge, date: NaiveDate) -> AgendaItem {
    AgendaItem {
        source: AgendaSource::Charge,
        id: charge.id,
        name: charge.name.clone(),
        date,
        last_day: None,
        amount: Some(charge.amount),
        label: charge.kind.token(),
        color: charge.color.clone(),
    }
}

fn event_item(event: &Event, span: DateSpan) -> AgendaItem {
    AgendaItem {
        source: AgendaSource::Event,
        id: event.id,
        name: event.name.clone(),
        date: span.start,
        last_day: event.is_multi_day().then(|| span.last_day()),
        amount: None,
        label: event.kind.token(),
        color: event.color.clone(),
    }
}

fn event_item_on(event: &Event, date: NaiveDate) -> AgendaItem {
    AgendaItem {
        source: AgendaSource::Event,
        id: event.id,
        name: event.name.clone(),
        date,
        last_day: None,
        amount: None,
        label: event.kind.token(),
        color: event.color.clone(),
    }
}

fn month_span(year: i32, month: u32) -> ServiceResult<DateSpan> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ServiceError::Invalid(format!("invalid month {year}-{month:02}")))?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| ServiceError::Invalid(format!("month {year}-{month:02} out of range")))?;
    Ok(DateSpan::new(first, next))
}

/// Dates a single-day rule hits within `span`, walking from `from`.
fn single_day_hits(
    rule: &crate::schedule::RecurrenceRule,
    span: DateSpan,
    from: NaiveDate,
) -> ServiceResult<Vec<NaiveDate>> {
    let mut hits = Vec::new();
    let mut cursor = from;
    while cursor < span.end {
        let next = schedule::next_occurrence(rule, cursor)?;
        if next >= span.end {
            break;
        }
        if span.contains(next) && next >= cursor {
            hits.push(next);
        }
        if rule.frequency == Frequency::Once {
            break;
        }
        cursor = next.max(cursor) + Duration::days(1);
    }
    Ok(hits)
}

/// Days inside `span` covered by any window of a ranged rule.
fn window_hits(
    rule: &crate::schedule::RecurrenceRule,
    span: DateSpan,
) -> ServiceResult<Vec<NaiveDate>> {
    let mut hits = Vec::new();
    let mut window = schedule::next_occurrence_window(rule, span.start)?;
    while window.start < span.end {
        let mut day = window.start.max(span.start);
        let stop = window.end.min(span.end);
        while day < stop {
            hits.push(day);
            day += Duration::days(1);
        }
        if rule.frequency == Frequency::Once {
            break;
        }
        window = schedule::next_occurrence_window(rule, window.end)?;
    }
    Ok(hits)
}
