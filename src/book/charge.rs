use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::{self, Frequency, RecurrenceRule, ScheduleError};

/// What a recurring charge pays for. Drives the default swatch color in
/// listings and calendars.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChargeKind {
    Bill,
    Insurance,
    Loan,
    Membership,
    Service,
    Subscription,
    Other,
}

impl ChargeKind {
    pub const ALL: [ChargeKind; 7] = [
        ChargeKind::Bill,
        ChargeKind::Insurance,
        ChargeKind::Loan,
        ChargeKind::Membership,
        ChargeKind::Service,
        ChargeKind::Subscription,
        ChargeKind::Other,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            ChargeKind::Bill => "bill",
            ChargeKind::Insurance => "insurance",
            ChargeKind::Loan => "loan",
            ChargeKind::Membership => "membership",
            ChargeKind::Service => "service",
            ChargeKind::Subscription => "subscription",
            ChargeKind::Other => "other",
        }
    }

    pub fn from_token(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.token().eq_ignore_ascii_case(value))
    }

    /// Fixed palette swatch for the kind.
    pub fn default_color(&self) -> &'static str {
        match self {
            ChargeKind::Bill => "#0c3fca",
            ChargeKind::Insurance => "#d87708",
            ChargeKind::Loan => "#00d3b3",
            ChargeKind::Membership => "#ff04de",
            ChargeKind::Service => "#2e1965",
            ChargeKind::Subscription => "#7712a6",
            ChargeKind::Other => "#eaff00",
        }
    }
}

/// A repeating outgoing payment: rent, a subscription, an insurance
/// premium. Charges always recur; one-time spending belongs to a budget's
/// expenses instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Charge {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub kind: ChargeKind,
    pub color: String,
    pub rule: RecurrenceRule,
    pub created_at: DateTime<Utc>,
}

impl Charge {
    /// Builds a charge after validating the rule, including the
    /// charges-must-recur restriction.
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        kind: ChargeKind,
        rule: RecurrenceRule,
    ) -> Result<Self, ScheduleError> {
        rule.validate_recurring()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            kind,
            color: kind.default_color().to_string(),
            rule,
            created_at: Utc::now(),
        })
    }

    pub fn next_occurrence(&self, today: NaiveDate) -> Result<NaiveDate, ScheduleError> {
        schedule::next_occurrence(&self.rule, today)
    }

    /// Position within a frequency group: weekly charges line up by
    /// weekday, monthly and annual ones by month and day-of-month.
    pub fn group_rank(&self) -> u32 {
        match self.rule.frequency {
            Frequency::Weekly => self.rule.day_of_week.unwrap_or(0),
            Frequency::Monthly => self.rule.day_of_month.unwrap_or(0),
            Frequency::Annually => {
                self.rule.month.unwrap_or(0) * 100 + self.rule.day_of_month.unwrap_or(0)
            }
            Frequency::Once | Frequency::Daily => 0,
        }
    }
}
