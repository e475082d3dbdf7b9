use std::fs;

use chrono::NaiveDate;
use finance_core::book::{Book, ChargeKind, EventKind};
use finance_core::config::ConfigManager;
use finance_core::core::services::{BudgetService, ChargeService, EventService, SavingsService};
use finance_core::core::BookManager;
use finance_core::currency::CurrencyCode;
use finance_core::errors::BookError;
use finance_core::schedule::Frequency;
use finance_core::storage::{JsonStorage, StorageBackend};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn book_with_rent(name: &str) -> Book {
    let mut book = Book::new(name);
    ChargeService::add(
        &mut book,
        "Rent",
        1450.0,
        ChargeKind::Bill,
        Frequency::Monthly,
        date(2024, 1, 1),
    )
    .expect("valid charge");
    book
}

#[test]
fn blocked_staging_path_leaves_the_saved_book_untouched() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(2)).unwrap();

    let mut book = book_with_rent("Reliable");
    storage.save(&book, "reliable").expect("initial save");
    let path = storage.book_path("reliable");
    let before = fs::read_to_string(&path).expect("read saved book");

    // Saves stage through `<name>.json.tmp`; a directory squatting on that
    // path makes the staged write fail before any rename happens.
    let staging = path.with_extension("json.tmp");
    fs::create_dir_all(&staging).unwrap();

    ChargeService::add(
        &mut book,
        "Power",
        80.0,
        ChargeKind::Bill,
        Frequency::Monthly,
        date(2024, 1, 5),
    )
    .unwrap();
    assert!(storage.save(&book, "reliable").is_err());

    let after = fs::read_to_string(&path).expect("read after failed save");
    assert_eq!(after, before, "failed save must not touch the target file");

    // The pre-write snapshot still ran, so the old content stays recoverable.
    let backups = storage.list_backups("reliable").unwrap();
    assert!(backups
        .iter()
        .any(|name| name.starts_with("reliable_") && name.ends_with(".json")));

    fs::remove_dir_all(&staging).unwrap();
}

#[test]
fn overwriting_a_book_backs_up_the_previous_version() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(5)).unwrap();

    let mut book = book_with_rent("Household");
    storage.save(&book, "household").expect("initial save");

    ChargeService::add(
        &mut book,
        "Water",
        35.0,
        ChargeKind::Bill,
        Frequency::Monthly,
        date(2024, 1, 10),
    )
    .unwrap();
    storage.save(&book, "household").expect("second save");

    let backups = storage.list_backups("household").unwrap();
    assert_eq!(backups.len(), 1, "second save should leave one backup");

    let snapshot_raw =
        fs::read_to_string(storage.backup_path("household", &backups[0])).unwrap();
    let snapshot: Book = serde_json::from_str(&snapshot_raw).unwrap();
    assert_eq!(snapshot.charges.len(), 1, "backup holds the first version");

    let restored = storage.restore("household", &backups[0]).expect("restore");
    assert_eq!(restored.charges.len(), 1);
    let on_disk = storage.load("household").expect("load restored book");
    assert_eq!(on_disk.charges.len(), 1);
}

#[test]
fn manager_round_trips_a_populated_book() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
    let mut manager = BookManager::new(Box::new(storage));

    manager.create("Household 2024").expect("create book");
    {
        let book = manager.require_current_mut().unwrap();
        ChargeService::add(
            book,
            "Rent",
            1450.0,
            ChargeKind::Bill,
            Frequency::Monthly,
            date(2024, 1, 1),
        )
        .unwrap();
        EventService::add(
            book,
            "Street Fair",
            EventKind::Festival,
            Frequency::Annually,
            date(2024, 7, 12),
            Some(date(2024, 7, 14)),
            Some("Bring cash".into()),
        )
        .unwrap();
        BudgetService::add(book, "Groceries", 450.0).unwrap();
        BudgetService::add_expense(book, "Groceries", "Market run", 62.10, date(2024, 1, 6))
            .unwrap();
        SavingsService::add(book, "Emergency Fund", 5000.0).unwrap();
        SavingsService::record_update(book, "Emergency Fund", 200.0, None).unwrap();
        SavingsService::record_update(book, "Emergency Fund", -50.0, Some("car tire".into()))
            .unwrap();
    }
    manager.save().expect("save populated book");
    manager.close();

    let book = manager.open("Household 2024").expect("reopen book");
    assert_eq!(book.name, "Household 2024");
    assert_eq!(book.charges.len(), 1);
    assert_eq!(book.charges[0].amount, 1450.0);
    assert_eq!(book.events[0].notes.as_deref(), Some("Bring cash"));
    assert_eq!(book.budgets[0].expenses.len(), 1);
    assert_eq!(book.budgets[0].spent(), 62.10);

    let goal = book.savings_named("Emergency Fund").unwrap();
    assert_eq!(goal.balance, 150.0);
    assert_eq!(goal.entries.len(), 2);
    assert_eq!(goal.entries[1].note.as_deref(), Some("car tire"));
}

#[test]
fn backup_notes_become_file_name_slugs() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(5)).unwrap();
    let mut manager = BookManager::new(Box::new(storage));

    manager.create("Trip Fund").expect("create book");
    let path = manager.backup(Some("Before Vacation!!")).expect("backup");
    let file_name = path.file_name().and_then(|name| name.to_str()).unwrap();
    assert!(file_name.starts_with("trip_fund_before-vacation_"));
    assert!(file_name.ends_with(".json"));

    let backups = manager.list_backups("Trip Fund").unwrap();
    assert!(backups.iter().any(|name| name == file_name));
}

#[test]
fn retention_caps_backups_per_book() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(2)).unwrap();

    let book = book_with_rent("Busy");
    storage.save(&book, "busy").expect("save book");
    for note in ["one", "two", "three", "four"] {
        storage.backup(&book, "busy", Some(note)).expect("backup");
    }
    let backups = storage.list_backups("busy").unwrap();
    assert!(backups.len() <= 2, "retention of 2 exceeded: {backups:?}");
}

#[test]
fn restore_takes_a_pre_restore_snapshot() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(10)).unwrap();
    let mut manager = BookManager::new(Box::new(storage));

    manager.create("Rolling").expect("create book");
    {
        let book = manager.require_current_mut().unwrap();
        ChargeService::add(
            book,
            "Rent",
            1450.0,
            ChargeKind::Bill,
            Frequency::Monthly,
            date(2024, 1, 1),
        )
        .unwrap();
    }
    manager.save().expect("save first version");
    manager.backup(Some("clean")).expect("labelled backup");

    {
        let book = manager.require_current_mut().unwrap();
        ChargeService::add(
            book,
            "Gym",
            39.0,
            ChargeKind::Membership,
            Frequency::Monthly,
            date(2024, 1, 3),
        )
        .unwrap();
    }
    manager.save().expect("save second version");

    let backups = manager.list_backups("Rolling").unwrap();
    let clean = backups
        .iter()
        .find(|name| name.contains("_clean_"))
        .expect("labelled backup listed")
        .clone();

    manager.restore("Rolling", &clean).expect("restore");
    assert_eq!(
        manager.require_current().unwrap().charges.len(),
        1,
        "restore should replace the in-memory book"
    );

    let after = manager.list_backups("Rolling").unwrap();
    let snapshot = after
        .iter()
        .find(|name| name.contains("_pre-restore_"))
        .expect("restore should snapshot the replaced file")
        .clone();

    manager.restore("Rolling", &snapshot).expect("undo restore");
    assert_eq!(manager.require_current().unwrap().charges.len(), 2);
}

#[test]
fn opening_garbage_reports_a_serde_error() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
    let path = storage.book_path("mangled");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ this is not json").unwrap();

    let mut manager = BookManager::new(Box::new(storage));
    let err = manager.open("mangled").expect_err("garbage must not load");
    assert!(matches!(err, BookError::Json(_)), "got {err:?}");
}

#[test]
fn config_round_trips_and_defaults_when_missing() {
    let temp = tempdir().unwrap();
    let config_manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();

    let missing = config_manager.load().expect("missing file falls back");
    assert_eq!(missing.upcoming_days, 7);
    assert_eq!(missing.currency.as_str(), "USD");
    assert!(missing.last_opened_book.is_none());

    let mut config = missing;
    config.currency = CurrencyCode::new("eur");
    config.locale.language_tag = "fr-FR".into();
    config.locale.decimal_separator = ',';
    config.locale.grouping_separator = ' ';
    config.plain_output = true;
    config.upcoming_days = 14;
    config.last_opened_book = Some("household".into());
    config_manager.save(&config).expect("save config");

    let loaded = config_manager.load().expect("reload config");
    assert_eq!(loaded.currency.as_str(), "EUR");
    assert_eq!(loaded.locale.language_tag, "fr-FR");
    assert_eq!(loaded.locale.decimal_separator, ',');
    assert!(loaded.plain_output);
    assert_eq!(loaded.upcoming_days, 14);
    assert_eq!(loaded.last_opened_book.as_deref(), Some("household"));
}
