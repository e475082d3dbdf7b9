use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::{self, DateSpan, Frequency, RecurrenceRule, ScheduleError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Anniversary,
    Appointment,
    Class,
    Concert,
    Conference,
    Festival,
    Holiday,
    Meeting,
    Practice,
    Reunion,
    Sport,
    Vacation,
    Wedding,
    Other,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        EventKind::Anniversary,
        EventKind::Appointment,
        EventKind::Class,
        EventKind::Concert,
        EventKind::Conference,
        EventKind::Festival,
        EventKind::Holiday,
        EventKind::Meeting,
        EventKind::Practice,
        EventKind::Reunion,
        EventKind::Sport,
        EventKind::Vacation,
        EventKind::Wedding,
        EventKind::Other,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            EventKind::Anniversary => "anniversary",
            EventKind::Appointment => "appointment",
            EventKind::Class => "class",
            EventKind::Concert => "concert",
            EventKind::Conference => "conference",
            EventKind::Festival => "festival",
            EventKind::Holiday => "holiday",
            EventKind::Meeting => "meeting",
            EventKind::Practice => "practice",
            EventKind::Reunion => "reunion",
            EventKind::Sport => "sport",
            EventKind::Vacation => "vacation",
            EventKind::Wedding => "wedding",
            EventKind::Other => "other",
        }
    }

    pub fn from_token(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.token().eq_ignore_ascii_case(value))
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            EventKind::Anniversary => "#ffa07a",
            EventKind::Appointment => "#c8ea8b",
            EventKind::Class => "#850a60",
            EventKind::Concert => "#005001",
            EventKind::Conference => "#465795",
            EventKind::Festival => "#88ffc0",
            EventKind::Holiday => "#00ced1",
            EventKind::Meeting => "#55ff00",
            EventKind::Practice => "#ff376d",
            EventKind::Reunion => "#fb0000",
            EventKind::Sport => "#9cd6ff",
            EventKind::Vacation => "#ff5733",
            EventKind::Wedding => "#33ff57",
            EventKind::Other => "#c533ff",
        }
    }
}

/// A calendar entry, one-time or recurring, single-day or spanning several
/// days. The stored start date doubles as the rule's anchor; recurring
/// anchors (weekday, day-of-month, month) are derived from it at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub kind: EventKind,
    pub color: String,
    pub rule: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Builds an event whose rule anchors derive from `start`; pass `end`
    /// for multi-day events. Validation enforces the window and
    /// duration-vs-frequency invariants.
    pub fn new(
        name: impl Into<String>,
        kind: EventKind,
        frequency: Frequency,
        start: NaiveDate,
        end: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<Self, ScheduleError> {
        let mut rule = RecurrenceRule::from_start(frequency, start);
        if let Some(end) = end {
            rule = rule.with_end(end);
        }
        rule.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            color: kind.default_color().to_string(),
            rule,
            notes,
            created_at: Utc::now(),
        })
    }

    pub fn is_multi_day(&self) -> bool {
        self.rule.is_ranged()
    }

    /// Next occurrence date. Unlike charges, an event carries a concrete
    /// start date, and that date wins while it still lies in the future;
    /// projection from `today` only starts once the stored date has passed.
    pub fn next_occurrence(&self, today: NaiveDate) -> Result<NaiveDate, ScheduleError> {
        if self.rule.frequency == Frequency::Once || self.rule.anchor_start >= today {
            return Ok(self.rule.anchor_start);
        }
        if let Some(span) = self.next_window(today)? {
            return Ok(span.start);
        }
        schedule::next_occurrence(&self.rule, today)
    }

    /// Next occurrence window for multi-day events, `None` for single-day
    /// ones. The span's end is exclusive.
    pub fn next_window(&self, today: NaiveDate) -> Result<Option<DateSpan>, ScheduleError> {
        if !self.rule.is_ranged() {
            return Ok(None);
        }
        schedule::next_occurrence_window(&self.rule, today).map(Some)
    }

    /// The span the event occupies next: the projected window for
    /// multi-day events, a one-day span otherwise.
    pub fn next_span(&self, today: NaiveDate) -> Result<DateSpan, ScheduleError> {
        match self.next_window(today)? {
            Some(span) => Ok(span),
            None => {
                let start = self.next_occurrence(today)?;
                Ok(DateSpan::new(start, start + chrono::Duration::days(1)))
            }
        }
    }
}
