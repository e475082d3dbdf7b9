use chrono::{Duration, NaiveDate};

/// A projected occurrence window. `end` is **exclusive**: it has already
/// been advanced one day past the last covered day, so range checks of the
/// form `start <= x < end` include the final calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Span covering `[today, today + days)`; the shape used for
    /// "upcoming within N days" filtering.
    pub fn horizon(today: NaiveDate, days: i64) -> Self {
        Self {
            start: today,
            end: today + Duration::days(days),
        }
    }

    /// The last calendar day the span covers.
    pub fn last_day(&self) -> NaiveDate {
        self.end - Duration::days(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// True when the two half-open spans share at least one day. A span
    /// that ended yesterday does not overlap a horizon starting today.
    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Covered days, counting both endpoints of the underlying window.
    pub fn covered_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn contains_includes_start_and_excludes_end() {
        let span = DateSpan::new(date(2024, 1, 8), date(2024, 1, 11));
        assert!(span.contains(date(2024, 1, 8)));
        assert!(span.contains(date(2024, 1, 10)));
        assert!(!span.contains(date(2024, 1, 11)));
        assert_eq!(span.last_day(), date(2024, 1, 10));
    }

    #[test]
    fn overlap_is_exclusive_at_the_edges() {
        let horizon = DateSpan::horizon(date(2024, 1, 10), 7);
        // Ended yesterday: exclusive end equals the horizon start.
        let stale = DateSpan::new(date(2024, 1, 5), date(2024, 1, 10));
        assert!(!stale.overlaps(&horizon));
        // Final day is today.
        let closing = DateSpan::new(date(2024, 1, 5), date(2024, 1, 11));
        assert!(closing.overlaps(&horizon));
        // Starts on the horizon's exclusive end.
        let beyond = DateSpan::new(date(2024, 1, 17), date(2024, 1, 19));
        assert!(!beyond.overlaps(&horizon));
        // Straddles the horizon end.
        let straddling = DateSpan::new(date(2024, 1, 16), date(2024, 1, 20));
        assert!(straddling.overlaps(&horizon));
    }
}
