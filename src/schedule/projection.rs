//! Pure projection of recurrence rules onto the calendar.
//!
//! Given a rule and an explicit `today`, the functions here compute the next
//! occurrence date, or the next occurrence window for multi-day events. They
//! never read the clock, never mutate the rule, and are deterministic per
//! `(rule, today)` pair. Everything operates on `NaiveDate` values, so
//! time-of-day cannot introduce off-by-one drift.

use chrono::{Datelike, Duration, NaiveDate};

use super::rule::RuleViolation;
use super::span::DateSpan;
use super::{Frequency, RecurrenceRule, ScheduleError};

/// Resolution for day-of-month anchors that exceed the target month's
/// length, e.g. the 31st in February.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayOfMonthPolicy {
    /// Land on the last day the month actually has.
    #[default]
    Clamp,
    /// Native date-construction overflow: excess days spill into the
    /// following month, so Feb 31 resolves to Mar 2 (leap) or Mar 3.
    Rollover,
}

/// Next occurrence of a single-day rule, under the default
/// [`DayOfMonthPolicy::Clamp`].
///
/// The result is `>= today` for every recurring frequency; `once` rules
/// return their stored start verbatim even when it lies in the past, and
/// callers filtering for "upcoming" must exclude those themselves.
pub fn next_occurrence(
    rule: &RecurrenceRule,
    today: NaiveDate,
) -> Result<NaiveDate, ScheduleError> {
    next_occurrence_with(rule, today, DayOfMonthPolicy::default())
}

/// [`next_occurrence`] with an explicit day-of-month resolution policy.
pub fn next_occurrence_with(
    rule: &RecurrenceRule,
    today: NaiveDate,
    policy: DayOfMonthPolicy,
) -> Result<NaiveDate, ScheduleError> {
    match rule.frequency {
        Frequency::Once => Ok(rule.anchor_start),
        Frequency::Daily => Ok(today),
        Frequency::Weekly => {
            let anchor = weekday_anchor(rule)?;
            let delta =
                (7 + anchor as i64 - today.weekday().num_days_from_sunday() as i64) % 7;
            Ok(today + Duration::days(delta))
        }
        Frequency::Monthly => {
            let day = monthday_anchor(rule)?;
            let candidate = resolve_monthday(today.year(), today.month(), day, policy);
            if candidate < today {
                let (year, month) = if today.month() == 12 {
                    (today.year() + 1, 1)
                } else {
                    (today.year(), today.month() + 1)
                };
                Ok(resolve_monthday(year, month, day, policy))
            } else {
                Ok(candidate)
            }
        }
        Frequency::Annually => {
            let day = monthday_anchor(rule)?;
            let month = month_anchor(rule)?;
            let candidate = resolve_monthday(today.year(), month, day, policy);
            if candidate < today {
                Ok(resolve_monthday(today.year() + 1, month, day, policy))
            } else {
                Ok(candidate)
            }
        }
    }
}

/// Next occurrence window of a multi-day rule, under the default policy.
/// The returned span's `end` is exclusive (see [`DateSpan`]).
pub fn next_occurrence_window(
    rule: &RecurrenceRule,
    today: NaiveDate,
) -> Result<DateSpan, ScheduleError> {
    next_occurrence_window_with(rule, today, DayOfMonthPolicy::default())
}

/// [`next_occurrence_window`] with an explicit day-of-month policy.
///
/// The anchor window is returned as-is while it has not fully elapsed
/// (its final day is `>= today`) and always for `once` rules; otherwise the
/// window shifts forward one recurrence unit at a time until its final day
/// reaches `today`. The end is re-derived from the shifted start on every
/// step, so the span's length never drifts even when a calendar-month shift
/// lands on a clamped day.
pub fn next_occurrence_window_with(
    rule: &RecurrenceRule,
    today: NaiveDate,
    policy: DayOfMonthPolicy,
) -> Result<DateSpan, ScheduleError> {
    let anchor_end = rule
        .anchor_end
        .ok_or(ScheduleError::InvalidRule(RuleViolation::EndMissing))?;
    if anchor_end <= rule.anchor_start {
        return Err(RuleViolation::EndBeforeStart.into());
    }
    if rule.frequency == Frequency::Daily {
        return Err(RuleViolation::RangedDaily.into());
    }

    if anchor_end >= today || rule.frequency == Frequency::Once {
        return Ok(DateSpan::new(
            rule.anchor_start,
            anchor_end + Duration::days(1),
        ));
    }

    let duration = (anchor_end - rule.anchor_start).num_days();
    let mut start = rule.anchor_start;
    let mut end = anchor_end;
    while end < today {
        start = match rule.frequency {
            Frequency::Weekly => start + Duration::days(7),
            Frequency::Monthly => step_month(start, policy),
            Frequency::Annually => step_year(start, policy),
            // Once returns above, Daily is rejected above.
            Frequency::Once | Frequency::Daily => unreachable!(),
        };
        end = start + Duration::days(duration);
    }
    Ok(DateSpan::new(start, end + Duration::days(1)))
}

fn weekday_anchor(rule: &RecurrenceRule) -> Result<u32, ScheduleError> {
    let dow = rule
        .day_of_week
        .ok_or(ScheduleError::InvalidRule(RuleViolation::WeekdayMissing))?;
    if dow > 6 {
        return Err(RuleViolation::WeekdayOutOfRange(dow).into());
    }
    Ok(dow)
}

fn monthday_anchor(rule: &RecurrenceRule) -> Result<u32, ScheduleError> {
    let day = rule
        .day_of_month
        .ok_or(ScheduleError::InvalidRule(RuleViolation::MonthdayMissing))?;
    if !(1..=31).contains(&day) {
        return Err(RuleViolation::MonthdayOutOfRange(day).into());
    }
    Ok(day)
}

fn month_anchor(rule: &RecurrenceRule) -> Result<u32, ScheduleError> {
    let month = rule
        .month
        .ok_or(ScheduleError::InvalidRule(RuleViolation::MonthMissing))?;
    if !(1..=12).contains(&month) {
        return Err(RuleViolation::MonthOutOfRange(month).into());
    }
    Ok(month)
}

/// Places `day` inside `(year, month)` according to `policy`. `day` has
/// already been range-checked to 1-31.
fn resolve_monthday(year: i32, month: u32, day: u32, policy: DayOfMonthPolicy) -> NaiveDate {
    match policy {
        DayOfMonthPolicy::Clamp => {
            let day = day.min(days_in_month(year, month));
            NaiveDate::from_ymd_opt(year, month, day).unwrap()
        }
        DayOfMonthPolicy::Rollover => {
            let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            first + Duration::days(day as i64 - 1)
        }
    }
}

fn step_month(date: NaiveDate, policy: DayOfMonthPolicy) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    resolve_monthday(year, month, date.day(), policy)
}

fn step_year(date: NaiveDate, policy: DayOfMonthPolicy) -> NaiveDate {
    resolve_monthday(date.year() + 1, date.month(), date.day(), policy)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap();
    (first_of_next - Duration::days(1)).day()
}
