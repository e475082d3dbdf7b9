use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    book::{Book, SCHEMA_VERSION},
    core::utils::{self, ensure_dir},
    errors::BookError,
};

use super::{Result, StorageBackend};

const BACKUP_FILE_EXT: &str = "json";
const BACKUP_STAMP: &str = "%Y%m%d_%H%M";
const DEFAULT_KEEP: usize = 5;

/// Stores books as pretty-printed JSON files under a managed directory layout:
/// `<root>/books/<slug>.json` plus timestamped copies in
/// `<root>/backups/<slug>/`.
#[derive(Clone)]
pub struct JsonStorage {
    books_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    /// Opens (creating if needed) a storage layout rooted at `root`, or at the
    /// application data directory when `root` is `None`. `retention` caps how
    /// many backup files are kept per book.
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let base = root.unwrap_or_else(utils::app_data_dir);
        ensure_dir(&base)?;
        let books_dir = utils::books_dir_in(&base);
        let backups_dir = utils::backups_root_in(&base);
        ensure_dir(&books_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            books_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_KEEP).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn write_backup_file(&self, book: &Book, name: &str, note: Option<&str>) -> Result<PathBuf> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let path = dir.join(backup_file_name(name, note));
        fs::write(&path, serde_json::to_string_pretty(book)?)?;
        self.prune_backups(name)?;
        Ok(path)
    }

    fn backup_existing_file(&self, name: &str, path: &Path, label: Option<&str>) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        fs::copy(path, dir.join(backup_file_name(name, label)))?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        for stale in self.list_backups(name)?.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_path(name, stale));
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, book: &Book, name: &str) -> Result<PathBuf> {
        let path = self.book_path(name);
        if path.exists() {
            self.backup_existing_file(name, &path, None)?;
        }
        save_book_to_path(book, &path)?;
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<Book> {
        let path = self.book_path(name);
        if !path.exists() {
            return Err(BookError::BookNotFound(name.to_string()));
        }
        load_book_from_path(&path)
    }

    fn list_books(&self) -> Result<Vec<String>> {
        let mut names = collect_json_names(&self.books_dir, |path| {
            path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string)
        })?;
        names.sort();
        Ok(names)
    }

    fn backup(&self, book: &Book, name: &str, note: Option<&str>) -> Result<PathBuf> {
        self.write_backup_file(book, name, note)
    }

    /// Backup file names, newest first. Entries whose stamp does not parse
    /// sort behind dated ones.
    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let mut entries = collect_json_names(&self.backup_dir(name), |path| {
            path.file_name().and_then(|file| file.to_str()).map(str::to_string)
        })?;
        entries.sort_by_key(|entry| std::cmp::Reverse(parse_backup_stamp(entry)));
        Ok(entries)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Book> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(BookError::Persistence(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        // Snapshot the current file so a restore never destroys state.
        let target = self.book_path(name);
        self.backup_existing_file(name, &target, Some("pre-restore"))?;
        fs::copy(&backup_path, &target)?;
        load_book_from_path(&target)
    }

    fn book_path(&self, name: &str) -> PathBuf {
        self.books_dir
            .join(format!("{}.json", canonical_name(name)))
    }
}

/// Writes `book` to `path` atomically by staging to a sibling temp file and
/// renaming it over the target.
pub fn save_book_to_path(book: &Book, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    utils::replace_file(path, &serde_json::to_string_pretty(book)?)?;
    Ok(())
}

/// Loads a book snapshot from disk, rejecting schema versions newer than this
/// build understands.
pub fn load_book_from_path(path: &Path) -> Result<Book> {
    let book: Book = serde_json::from_str(&fs::read_to_string(path)?)?;
    if book.schema_version > SCHEMA_VERSION {
        return Err(BookError::SchemaTooNew {
            found: book.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(book)
}

/// Lowercases a display name into the slug used for file names.
pub fn canonical_name(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    if slug.bytes().all(|byte| byte == b'_') {
        "book".into()
    } else {
        slug
    }
}

/// `<slug>[_<note-slug>]_<stamp>.json`. The stamp stays last so
/// [`parse_backup_stamp`] finds it whether or not a note is present.
fn backup_file_name(name: &str, note: Option<&str>) -> String {
    let mut stem = canonical_name(name);
    if let Some(label) = slugify_note(note) {
        stem.push('_');
        stem.push_str(&label);
    }
    format!(
        "{}_{}.{}",
        stem,
        Utc::now().format(BACKUP_STAMP),
        BACKUP_FILE_EXT
    )
}

/// Reduces a free-form backup note to lowercase alphanumerics joined by
/// single dashes.
fn slugify_note(note: Option<&str>) -> Option<String> {
    let mut slug = String::new();
    for ch in note?.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.'))
            && !slug.is_empty()
            && !slug.ends_with('-')
        {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    (!slug.is_empty()).then_some(slug)
}

/// Recovers the UTC stamp from the trailing `_YYYYMMDD_HHMM` of a backup
/// file name.
fn parse_backup_stamp(file_name: &str) -> Option<DateTime<Utc>> {
    let stem = file_name.strip_suffix(".json").unwrap_or(file_name);
    let mut pieces = stem.rsplitn(3, '_');
    let time = pieces.next()?;
    let date = pieces.next()?;
    pieces.next()?;

    if date.len() != 8 || time.len() != 4 {
        return None;
    }
    if !date.bytes().chain(time.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Names of `.json` files in `dir`, projected through `pick`. A missing
/// directory reads as empty.
fn collect_json_names(
    dir: &Path,
    pick: impl Fn(&Path) -> Option<String>,
) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_FILE_EXT) {
            continue;
        }
        if let Some(name) = pick(&path) {
            names.push(name);
        }
    }
    Ok(names)
}
