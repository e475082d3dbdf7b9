use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ScheduleError;

/// How often a charge or event repeats. `Once` is only meaningful for
/// events; charges must recur.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Once,
    Daily,
    Weekly,
    Monthly,
    Annually,
}

impl Frequency {
    /// Listing order: one-time items first, then by recurrence length.
    pub const ALL: [Frequency; 5] = [
        Frequency::Once,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Annually,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Frequency::Once => "once",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Annually => "annually",
        }
    }

    /// Human heading used by grouped listings.
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Once => "One-time",
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Annually => "Annual",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Frequency::Once)
    }

    /// Longest span (whole days) a multi-day window may cover under this
    /// frequency before consecutive occurrences would overlap.
    pub fn max_span_days(&self) -> i64 {
        match self {
            Frequency::Once => i64::MAX,
            Frequency::Daily => 1,
            Frequency::Weekly => 7,
            Frequency::Monthly => 31,
            Frequency::Annually => 365,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "once" => Ok(Frequency::Once),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "annually" => Ok(Frequency::Annually),
            _ => Err(ScheduleError::InvalidFrequency(value.to_string())),
        }
    }
}
