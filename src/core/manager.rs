use std::path::PathBuf;

use crate::book::Book;
use crate::errors::BookError;
use crate::storage::StorageBackend;

/// The book currently held in memory, together with the name it was opened
/// or created under. Keeping both in one slot means a book can never be
/// loaded without a name to save it back to.
struct OpenBook {
    name: String,
    book: Book,
}

/// Facade that coordinates the in-memory book, persistence, and backups.
///
/// The CLI owns exactly one manager; the open book is mutated in place and
/// written back explicitly via [`BookManager::save`].
pub struct BookManager {
    open: Option<OpenBook>,
    storage: Box<dyn StorageBackend>,
}

impl BookManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            open: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Creates a fresh book, makes it current, and persists it immediately.
    pub fn create(&mut self, name: &str) -> Result<PathBuf, BookError> {
        let book = Book::new(name);
        let path = self.storage.save(&book, name)?;
        self.open = Some(OpenBook {
            name: name.to_string(),
            book,
        });
        Ok(path)
    }

    /// Loads the named book from storage and makes it current.
    pub fn open(&mut self, name: &str) -> Result<&Book, BookError> {
        let book = self.storage.load(name)?;
        let slot = self.open.insert(OpenBook {
            name: name.to_string(),
            book,
        });
        Ok(&slot.book)
    }

    /// Persists the current book under its known name.
    pub fn save(&mut self) -> Result<PathBuf, BookError> {
        let open = self.open.as_ref().ok_or(BookError::BookNotLoaded)?;
        self.storage.save(&open.book, &open.name)
    }

    /// Persists the current book under a new name and adopts that name.
    pub fn save_as(&mut self, name: &str) -> Result<PathBuf, BookError> {
        let open = self.open.as_mut().ok_or(BookError::BookNotLoaded)?;
        let path = self.storage.save(&open.book, name)?;
        open.name = name.to_string();
        Ok(path)
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.open.is_some()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.name.as_str())
    }

    pub fn require_current(&self) -> Result<&Book, BookError> {
        self.open
            .as_ref()
            .map(|open| &open.book)
            .ok_or(BookError::BookNotLoaded)
    }

    pub fn require_current_mut(&mut self) -> Result<&mut Book, BookError> {
        self.open
            .as_mut()
            .map(|open| &mut open.book)
            .ok_or(BookError::BookNotLoaded)
    }

    pub fn list_books(&self) -> Result<Vec<String>, BookError> {
        self.storage.list_books()
    }

    /// Snapshots the current book into its backup directory.
    pub fn backup(&self, note: Option<&str>) -> Result<PathBuf, BookError> {
        let open = self.open.as_ref().ok_or(BookError::BookNotLoaded)?;
        self.storage.backup(&open.book, &open.name, note)
    }

    pub fn list_backups(&self, name: &str) -> Result<Vec<String>, BookError> {
        self.storage.list_backups(name)
    }

    /// Restores a backup over the named book. When that book is the current
    /// one, the in-memory copy is replaced as well.
    pub fn restore(&mut self, name: &str, backup_name: &str) -> Result<(), BookError> {
        let restored = self.storage.restore(name, backup_name)?;
        if let Some(open) = self.open.as_mut() {
            if open.name == name {
                open.book = restored;
            }
        }
        Ok(())
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.storage.book_path(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStorage;
    use tempfile::tempdir;

    fn manager_in_temp() -> (BookManager, tempfile::TempDir) {
        let temp = tempdir().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
        (BookManager::new(Box::new(storage)), temp)
    }

    #[test]
    fn create_save_open_roundtrip() {
        let (mut manager, _guard) = manager_in_temp();
        let path = manager.create("Household").expect("create book");
        assert!(path.exists());
        assert_eq!(manager.current_name(), Some("Household"));

        manager.close();
        assert!(!manager.is_loaded());

        manager.open("Household").expect("open book");
        assert_eq!(manager.require_current().unwrap().name, "Household");
    }

    #[test]
    fn save_requires_a_loaded_book() {
        let (mut manager, _guard) = manager_in_temp();
        let err = manager.save().expect_err("save without book must fail");
        assert!(matches!(err, BookError::BookNotLoaded));
    }

    #[test]
    fn restore_replaces_current_book() {
        let (mut manager, _guard) = manager_in_temp();
        manager.create("Trip").expect("create book");
        manager.backup(Some("before")).expect("backup");

        manager.require_current_mut().unwrap().name = "Renamed".into();
        manager.save().expect("save renamed");

        let backups = manager.list_backups("Trip").expect("list backups");
        manager
            .restore("Trip", backups.last().unwrap())
            .expect("restore backup");
        assert_eq!(manager.require_current().unwrap().name, "Trip");
    }

    #[test]
    fn list_books_reflects_storage() {
        let (mut manager, _guard) = manager_in_temp();
        manager.create("Alpha").expect("create");
        manager.create("Beta").expect("create");
        let books = manager.list_books().expect("list");
        assert_eq!(books, vec!["alpha".to_string(), "beta".to_string()]);
    }
}
