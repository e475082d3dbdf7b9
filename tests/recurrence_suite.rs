use chrono::{Datelike, Duration, NaiveDate};
use finance_core::book::{Book, ChargeKind, EventKind};
use finance_core::core::services::{ChargeService, EventService};
use finance_core::core::ServiceError;
use finance_core::schedule::{
    next_occurrence, next_occurrence_with, DayOfMonthPolicy, Frequency, RecurrenceRule,
    RuleViolation, ScheduleError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

#[test]
fn weekly_charge_walks_wednesday_to_wednesday() {
    let mut book = Book::new("Walks");
    // 2024-01-03 is a Wednesday; the anchor weekday is derived from it.
    ChargeService::add(
        &mut book,
        "Yoga",
        12.0,
        ChargeKind::Membership,
        Frequency::Weekly,
        date(2024, 1, 3),
    )
    .expect("valid charge");

    let checks = [
        (date(2024, 1, 1), date(2024, 1, 3)),   // Monday before
        (date(2024, 1, 3), date(2024, 1, 3)),   // due today
        (date(2024, 1, 4), date(2024, 1, 10)),  // day after rolls a week
        (date(2024, 1, 28), date(2024, 1, 31)), // Sunday late in the month
        (date(2024, 12, 31), date(2025, 1, 1)), // across the year boundary
    ];
    for (today, expected) in checks {
        let next = ChargeService::next(&book, "Yoga", today).expect("projection");
        assert_eq!(next, expected, "today = {today}");
        assert_eq!(next.weekday(), chrono::Weekday::Wed);
    }
}

#[test]
fn monthly_charge_hits_the_fifteenth_all_year() {
    let mut book = Book::new("Walks");
    ChargeService::add(
        &mut book,
        "Rent",
        1450.0,
        ChargeKind::Bill,
        Frequency::Monthly,
        date(2024, 1, 15),
    )
    .expect("valid charge");

    let mut cursor = date(2024, 1, 1);
    let mut months = Vec::new();
    for _ in 0..12 {
        let hit = ChargeService::next(&book, "Rent", cursor).expect("projection");
        assert!(hit >= cursor, "{hit} fell behind {cursor}");
        assert_eq!(hit.day(), 15);
        months.push((hit.year(), hit.month()));
        cursor = hit + Duration::days(1);
    }
    let expected: Vec<(i32, u32)> = (1..=12).map(|month| (2024, month)).collect();
    assert_eq!(months, expected);
}

#[test]
fn day_31_charge_clamps_to_each_month_end() {
    let mut book = Book::new("Walks");
    ChargeService::add(
        &mut book,
        "Payday Sweep",
        200.0,
        ChargeKind::Service,
        Frequency::Monthly,
        date(2024, 1, 31),
    )
    .expect("valid charge");

    let mut cursor = date(2024, 1, 1);
    let mut days = Vec::new();
    for _ in 0..4 {
        let hit = ChargeService::next(&book, "Payday Sweep", cursor).expect("projection");
        days.push(hit.day());
        cursor = hit + Duration::days(1);
    }
    // Jan 31, leap-year Feb 29, Mar 31, Apr 30.
    assert_eq!(days, vec![31, 29, 31, 30]);
}

#[test]
fn rollover_policy_spills_day_31_into_march() {
    let rule = RecurrenceRule::monthly_on(date(2024, 1, 31), 31);
    assert_eq!(
        next_occurrence_with(&rule, date(2024, 2, 10), DayOfMonthPolicy::Rollover).unwrap(),
        date(2024, 3, 2),
    );
    assert_eq!(
        next_occurrence_with(&rule, date(2025, 2, 10), DayOfMonthPolicy::Rollover).unwrap(),
        date(2025, 3, 3),
    );
    // The default keeps the date inside February.
    assert_eq!(
        next_occurrence(&rule, date(2024, 2, 10)).unwrap(),
        date(2024, 2, 29),
    );
}

#[test]
fn weekly_event_window_shifts_whole_weeks_and_keeps_its_length() {
    let mut book = Book::new("Walks");
    EventService::add(
        &mut book,
        "Book Club",
        EventKind::Meeting,
        Frequency::Weekly,
        date(2024, 1, 1),
        Some(date(2024, 1, 3)),
        None,
    )
    .expect("valid event");

    // Mid-window: the anchor window is reported as-is.
    let current = EventService::next(&book, "Book Club", date(2024, 1, 2)).unwrap();
    assert_eq!(current.start, date(2024, 1, 1));
    assert_eq!(current.end, date(2024, 1, 4));

    // A week later the window has shifted once; its final day is the 10th,
    // so on the 10th it still counts as running.
    let running = EventService::next(&book, "Book Club", date(2024, 1, 10)).unwrap();
    assert_eq!(running.start, date(2024, 1, 8));
    assert_eq!(running.end, date(2024, 1, 11));
    assert_eq!(running.last_day(), date(2024, 1, 10));

    // One day after the final day it shifts again.
    let shifted = EventService::next(&book, "Book Club", date(2024, 1, 11)).unwrap();
    assert_eq!(shifted.start, date(2024, 1, 15));
    assert_eq!(shifted.end, date(2024, 1, 18));
    assert_eq!(shifted.covered_days(), current.covered_days());
}

#[test]
fn projection_is_stable_on_the_due_day_itself() {
    for frequency in [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Annually,
    ] {
        let rule = RecurrenceRule::from_start(frequency, date(2024, 3, 15));
        let first = next_occurrence(&rule, date(2024, 6, 7)).expect("projection");
        let again = next_occurrence(&rule, first).expect("projection");
        assert_eq!(again, first, "{frequency} drifted on its own due day");
    }
}

#[test]
fn recurring_projections_never_fall_behind_today() {
    let rules = [
        RecurrenceRule::daily(date(2023, 11, 1)),
        RecurrenceRule::weekly_on(date(2023, 11, 1), 3),
        RecurrenceRule::monthly_on(date(2023, 11, 1), 31),
        RecurrenceRule::annually_on(date(2020, 2, 29), 2, 29),
    ];
    // Walk across a year boundary and a leap February.
    let base = date(2023, 11, 20);
    for offset in 0..120 {
        let today = base + Duration::days(offset);
        for rule in &rules {
            let next = next_occurrence(rule, today).expect("projection");
            assert!(
                next >= today,
                "{:?} projected {next}, behind {today}",
                rule.frequency
            );
        }
    }
}

#[test]
fn leap_day_anniversary_clamps_in_common_years() {
    let mut book = Book::new("Walks");
    EventService::add(
        &mut book,
        "Leap Dinner",
        EventKind::Anniversary,
        Frequency::Annually,
        date(2024, 2, 29),
        None,
        None,
    )
    .expect("valid event");

    let clamped = EventService::next(&book, "Leap Dinner", date(2024, 3, 1)).unwrap();
    assert_eq!(clamped.start, date(2025, 2, 28));
    assert_eq!(clamped.covered_days(), 1);

    let exact = EventService::next(&book, "Leap Dinner", date(2028, 1, 10)).unwrap();
    assert_eq!(exact.start, date(2028, 2, 29));
}

#[test]
fn rules_survive_a_book_serde_round_trip() {
    let mut book = Book::new("Round Trip");
    ChargeService::add(
        &mut book,
        "Insurance",
        82.5,
        ChargeKind::Insurance,
        Frequency::Annually,
        date(2024, 3, 1),
    )
    .expect("valid charge");
    EventService::add(
        &mut book,
        "Retreat",
        EventKind::Vacation,
        Frequency::Monthly,
        date(2024, 1, 8),
        Some(date(2024, 1, 10)),
        Some("Cabin by the lake".into()),
    )
    .expect("valid event");

    let json = serde_json::to_string_pretty(&book).expect("serialize book");
    let loaded: Book = serde_json::from_str(&json).expect("deserialize book");

    let charge_rule = &loaded.charge_named("Insurance").unwrap().rule;
    assert_eq!(charge_rule, &book.charge_named("Insurance").unwrap().rule);
    assert_eq!(
        next_occurrence(charge_rule, date(2024, 6, 1)).unwrap(),
        date(2025, 3, 1),
    );

    let event = loaded.event_named("Retreat").unwrap();
    assert_eq!(event.rule.anchor_end, Some(date(2024, 1, 10)));
    assert_eq!(event.notes.as_deref(), Some("Cabin by the lake"));
    let span = event.next_span(date(2024, 2, 20)).unwrap();
    assert_eq!(span.start, date(2024, 3, 8));
    assert_eq!(span.covered_days(), 3);
}

#[test]
fn charges_must_recur() {
    let mut book = Book::new("Rejects");
    let err = ChargeService::add(
        &mut book,
        "Single Shot",
        10.0,
        ChargeKind::Other,
        Frequency::Once,
        date(2024, 5, 1),
    )
    .expect_err("one-time charges are not allowed");
    assert!(matches!(
        err,
        ServiceError::Schedule(ScheduleError::InvalidRule(RuleViolation::OnceForbidden))
    ));
}

#[test]
fn event_windows_are_validated_at_creation() {
    let mut book = Book::new("Rejects");

    let inverted = EventService::add(
        &mut book,
        "Backwards",
        EventKind::Other,
        Frequency::Weekly,
        date(2024, 1, 10),
        Some(date(2024, 1, 8)),
        None,
    )
    .expect_err("end before start must fail");
    assert!(matches!(
        inverted,
        ServiceError::Schedule(ScheduleError::InvalidRule(RuleViolation::EndBeforeStart))
    ));

    let oversized = EventService::add(
        &mut book,
        "Ten Day Week",
        EventKind::Festival,
        Frequency::Weekly,
        date(2024, 1, 1),
        Some(date(2024, 1, 11)),
        None,
    )
    .expect_err("a 10-day weekly window must fail");
    assert!(matches!(
        oversized,
        ServiceError::Schedule(ScheduleError::InvalidRule(
            RuleViolation::SpanExceedsFrequency { days: 10, limit: 7 }
        ))
    ));

    let ranged_daily = EventService::add(
        &mut book,
        "Daily Span",
        EventKind::Other,
        Frequency::Daily,
        date(2024, 1, 1),
        Some(date(2024, 1, 5)),
        None,
    )
    .expect_err("ranged daily rules must fail");
    assert!(matches!(
        ranged_daily,
        ServiceError::Schedule(ScheduleError::InvalidRule(
            RuleViolation::SpanExceedsFrequency { days: 4, limit: 1 }
        ))
    ));
}

#[test]
fn unknown_frequency_tokens_are_rejected() {
    assert!("monthly".parse::<Frequency>().is_ok());
    assert!("ANNUALLY".parse::<Frequency>().is_ok());
    let err = "fortnightly"
        .parse::<Frequency>()
        .expect_err("unknown token must fail");
    assert!(matches!(err, ScheduleError::InvalidFrequency(ref raw) if raw == "fortnightly"));
}
