use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::{Frequency, ScheduleError};

/// Weekday labels indexed by the external 0-6 encoding (0 = Sunday).
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Stored recurrence description for a charge or event: a frequency plus the
/// anchor fields that frequency requires. Rules are created once, validated
/// at creation time, and never mutated afterwards; projection only reads
/// them.
///
/// `day_of_week` uses the external 0-6 encoding with 0 = Sunday.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub anchor_start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_end: Option<NaiveDate>,
}

/// Structural problem that makes a rule unusable. Carried inside
/// [`ScheduleError::InvalidRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    WeekdayMissing,
    WeekdayForbidden,
    WeekdayOutOfRange(u32),
    MonthdayMissing,
    MonthdayForbidden,
    MonthdayOutOfRange(u32),
    MonthMissing,
    MonthForbidden,
    MonthOutOfRange(u32),
    EndMissing,
    EndBeforeStart,
    SpanExceedsFrequency { days: i64, limit: i64 },
    RangedDaily,
    OnceForbidden,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleViolation::WeekdayMissing => write!(f, "weekly rule has no day-of-week anchor"),
            RuleViolation::WeekdayForbidden => {
                write!(f, "day-of-week anchor is only valid for weekly rules")
            }
            RuleViolation::WeekdayOutOfRange(value) => {
                write!(f, "day-of-week {value} is outside 0-6")
            }
            RuleViolation::MonthdayMissing => write!(f, "rule has no day-of-month anchor"),
            RuleViolation::MonthdayForbidden => {
                write!(f, "day-of-month anchor is only valid for monthly or annual rules")
            }
            RuleViolation::MonthdayOutOfRange(value) => {
                write!(f, "day-of-month {value} is outside 1-31")
            }
            RuleViolation::MonthMissing => write!(f, "annual rule has no month anchor"),
            RuleViolation::MonthForbidden => {
                write!(f, "month anchor is only valid for annual rules")
            }
            RuleViolation::MonthOutOfRange(value) => write!(f, "month {value} is outside 1-12"),
            RuleViolation::EndMissing => write!(f, "rule has no end date to project a window from"),
            RuleViolation::EndBeforeStart => write!(f, "end date must fall after the start date"),
            RuleViolation::SpanExceedsFrequency { days, limit } => {
                write!(f, "a {days}-day window exceeds the {limit}-day limit for this frequency")
            }
            RuleViolation::RangedDaily => write!(f, "daily rules cannot span multiple days"),
            RuleViolation::OnceForbidden => {
                write!(f, "one-time rules are only valid for events")
            }
        }
    }
}

impl RecurrenceRule {
    pub fn once(start: NaiveDate) -> Self {
        Self::bare(Frequency::Once, start)
    }

    pub fn daily(start: NaiveDate) -> Self {
        Self::bare(Frequency::Daily, start)
    }

    /// Weekly rule with an explicit 0-6 weekday anchor (0 = Sunday).
    pub fn weekly_on(start: NaiveDate, day_of_week: u32) -> Self {
        Self {
            day_of_week: Some(day_of_week),
            ..Self::bare(Frequency::Weekly, start)
        }
    }

    pub fn monthly_on(start: NaiveDate, day_of_month: u32) -> Self {
        Self {
            day_of_month: Some(day_of_month),
            ..Self::bare(Frequency::Monthly, start)
        }
    }

    pub fn annually_on(start: NaiveDate, month: u32, day_of_month: u32) -> Self {
        Self {
            day_of_month: Some(day_of_month),
            month: Some(month),
            ..Self::bare(Frequency::Annually, start)
        }
    }

    /// Derives the anchors a frequency needs from a concrete start date:
    /// weekly rules take the date's weekday, monthly rules its day, annual
    /// rules its day and month. This is how event rules come into being.
    pub fn from_start(frequency: Frequency, start: NaiveDate) -> Self {
        match frequency {
            Frequency::Once => Self::once(start),
            Frequency::Daily => Self::daily(start),
            Frequency::Weekly => Self::weekly_on(start, start.weekday().num_days_from_sunday()),
            Frequency::Monthly => Self::monthly_on(start, start.day()),
            Frequency::Annually => Self::annually_on(start, start.month(), start.day()),
        }
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.anchor_end = Some(end);
        self
    }

    fn bare(frequency: Frequency, start: NaiveDate) -> Self {
        Self {
            frequency,
            day_of_week: None,
            day_of_month: None,
            month: None,
            anchor_start: start,
            anchor_end: None,
        }
    }

    pub fn is_ranged(&self) -> bool {
        self.anchor_end.is_some()
    }

    /// Whole-day length of the anchor window, when one exists.
    pub fn duration_days(&self) -> Option<i64> {
        self.anchor_end
            .map(|end| (end - self.anchor_start).num_days())
    }

    /// The weekday anchor as a `chrono::Weekday`, when present and in range.
    pub fn weekday(&self) -> Option<Weekday> {
        const TABLE: [Weekday; 7] = [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ];
        self.day_of_week
            .and_then(|dow| TABLE.get(dow as usize).copied())
    }

    /// Rejects structurally inconsistent rules: anchors that do not match
    /// the frequency, out-of-range anchors, inverted windows, and windows
    /// longer than the recurrence unit.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        self.check_anchor_shape()?;
        self.check_anchor_ranges()?;
        self.check_window()?;
        Ok(())
    }

    /// [`validate`](Self::validate) plus the charge-side restriction that a
    /// rule must actually recur.
    pub fn validate_recurring(&self) -> Result<(), ScheduleError> {
        if self.frequency == Frequency::Once {
            return Err(RuleViolation::OnceForbidden.into());
        }
        self.validate()
    }

    fn check_anchor_shape(&self) -> Result<(), ScheduleError> {
        let wants_weekday = self.frequency == Frequency::Weekly;
        let wants_monthday =
            matches!(self.frequency, Frequency::Monthly | Frequency::Annually);
        let wants_month = self.frequency == Frequency::Annually;

        match (wants_weekday, self.day_of_week.is_some()) {
            (true, false) => return Err(RuleViolation::WeekdayMissing.into()),
            (false, true) => return Err(RuleViolation::WeekdayForbidden.into()),
            _ => {}
        }
        match (wants_monthday, self.day_of_month.is_some()) {
            (true, false) => return Err(RuleViolation::MonthdayMissing.into()),
            (false, true) => return Err(RuleViolation::MonthdayForbidden.into()),
            _ => {}
        }
        match (wants_month, self.month.is_some()) {
            (true, false) => return Err(RuleViolation::MonthMissing.into()),
            (false, true) => return Err(RuleViolation::MonthForbidden.into()),
            _ => {}
        }
        Ok(())
    }

    fn check_anchor_ranges(&self) -> Result<(), ScheduleError> {
        if let Some(dow) = self.day_of_week {
            if dow > 6 {
                return Err(RuleViolation::WeekdayOutOfRange(dow).into());
            }
        }
        if let Some(day) = self.day_of_month {
            if !(1..=31).contains(&day) {
                return Err(RuleViolation::MonthdayOutOfRange(day).into());
            }
        }
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(RuleViolation::MonthOutOfRange(month).into());
            }
        }
        Ok(())
    }

    fn check_window(&self) -> Result<(), ScheduleError> {
        let Some(end) = self.anchor_end else {
            return Ok(());
        };
        if end <= self.anchor_start {
            return Err(RuleViolation::EndBeforeStart.into());
        }
        let days = (end - self.anchor_start).num_days();
        let limit = self.frequency.max_span_days();
        if days > limit {
            return Err(RuleViolation::SpanExceedsFrequency { days, limit }.into());
        }
        Ok(())
    }

    /// One-line cadence description for listings, e.g. `Every Wed`,
    /// `Every 15th`, `Every Mar 1`.
    pub fn describe(&self) -> String {
        match self.frequency {
            Frequency::Once => format!("On {}", self.anchor_start.format("%Y-%m-%d")),
            Frequency::Daily => "Every day".to_string(),
            Frequency::Weekly => {
                let label = self
                    .day_of_week
                    .and_then(|dow| WEEKDAY_LABELS.get(dow as usize).copied())
                    .unwrap_or("?");
                format!("Every {label}")
            }
            Frequency::Monthly => match self.day_of_month {
                Some(day) => format!("Every {}", ordinal(day)),
                None => "Every month".to_string(),
            },
            Frequency::Annually => match (self.month, self.day_of_month) {
                (Some(month), Some(day)) => {
                    format!("Every {} {}", month_abbrev(month), day)
                }
                _ => "Every year".to_string(),
            },
        }
    }
}

/// `1` → `1st`, `2` → `2nd`, `11` → `11th`, `23` → `23rd`.
pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

fn month_abbrev(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn from_start_derives_the_anchors_the_frequency_needs() {
        // 2024-01-03 is a Wednesday.
        let weekly = RecurrenceRule::from_start(Frequency::Weekly, date(2024, 1, 3));
        assert_eq!(weekly.day_of_week, Some(3));
        assert_eq!(weekly.day_of_month, None);

        let monthly = RecurrenceRule::from_start(Frequency::Monthly, date(2024, 1, 15));
        assert_eq!(monthly.day_of_month, Some(15));
        assert_eq!(monthly.month, None);

        let annual = RecurrenceRule::from_start(Frequency::Annually, date(2024, 3, 1));
        assert_eq!(annual.month, Some(3));
        assert_eq!(annual.day_of_month, Some(1));
    }

    #[test]
    fn validate_accepts_well_formed_rules() {
        RecurrenceRule::weekly_on(date(2024, 1, 1), 3)
            .validate()
            .expect("weekly with weekday anchor");
        RecurrenceRule::annually_on(date(2024, 1, 1), 12, 31)
            .validate()
            .expect("annual with month and day anchors");
        RecurrenceRule::once(date(2024, 5, 1))
            .with_end(date(2024, 5, 20))
            .validate()
            .expect("one-time windows have no span limit");
    }

    #[test]
    fn validate_flags_anchor_shape_mismatches() {
        let mut rule = RecurrenceRule::daily(date(2024, 1, 1));
        rule.day_of_week = Some(2);
        assert_violation(rule.validate(), RuleViolation::WeekdayForbidden);

        let rule = RecurrenceRule::bare(Frequency::Weekly, date(2024, 1, 1));
        assert_violation(rule.validate(), RuleViolation::WeekdayMissing);

        let mut rule = RecurrenceRule::monthly_on(date(2024, 1, 1), 10);
        rule.month = Some(4);
        assert_violation(rule.validate(), RuleViolation::MonthForbidden);

        let mut rule = RecurrenceRule::annually_on(date(2024, 1, 1), 4, 10);
        rule.day_of_month = None;
        assert_violation(rule.validate(), RuleViolation::MonthdayMissing);
    }

    #[test]
    fn validate_flags_out_of_range_anchors() {
        let rule = RecurrenceRule::weekly_on(date(2024, 1, 1), 7);
        assert_violation(rule.validate(), RuleViolation::WeekdayOutOfRange(7));

        let rule = RecurrenceRule::monthly_on(date(2024, 1, 1), 32);
        assert_violation(rule.validate(), RuleViolation::MonthdayOutOfRange(32));

        let rule = RecurrenceRule::annually_on(date(2024, 1, 1), 13, 5);
        assert_violation(rule.validate(), RuleViolation::MonthOutOfRange(13));
    }

    #[test]
    fn validate_flags_window_problems() {
        let rule = RecurrenceRule::weekly_on(date(2024, 1, 10), 3).with_end(date(2024, 1, 10));
        assert_violation(rule.validate(), RuleViolation::EndBeforeStart);

        let rule = RecurrenceRule::weekly_on(date(2024, 1, 1), 1).with_end(date(2024, 1, 9));
        assert_violation(
            rule.validate(),
            RuleViolation::SpanExceedsFrequency { days: 8, limit: 7 },
        );

        let rule = RecurrenceRule::daily(date(2024, 1, 1)).with_end(date(2024, 1, 3));
        assert_violation(
            rule.validate(),
            RuleViolation::SpanExceedsFrequency { days: 2, limit: 1 },
        );
    }

    #[test]
    fn validate_recurring_rejects_once() {
        let rule = RecurrenceRule::once(date(2024, 1, 1));
        assert_violation(rule.validate_recurring(), RuleViolation::OnceForbidden);
    }

    #[test]
    fn describe_matches_listing_format() {
        assert_eq!(
            RecurrenceRule::weekly_on(date(2024, 1, 1), 0).describe(),
            "Every Sun"
        );
        assert_eq!(
            RecurrenceRule::monthly_on(date(2024, 1, 1), 23).describe(),
            "Every 23rd"
        );
        assert_eq!(
            RecurrenceRule::annually_on(date(2024, 1, 1), 3, 1).describe(),
            "Every Mar 1"
        );
        assert_eq!(RecurrenceRule::daily(date(2024, 1, 1)).describe(), "Every day");
        assert_eq!(
            RecurrenceRule::once(date(2024, 5, 4)).describe(),
            "On 2024-05-04"
        );
    }

    #[test]
    fn ordinal_covers_the_teen_exceptions() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(31), "31st");
    }

    fn assert_violation(result: Result<(), ScheduleError>, expected: RuleViolation) {
        match result {
            Err(ScheduleError::InvalidRule(violation)) => assert_eq!(violation, expected),
            other => panic!("expected InvalidRule({expected:?}), got {other:?}"),
        }
    }
}
