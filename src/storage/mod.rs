pub mod json_backend;

use std::path::PathBuf;

use crate::{book::Book, errors::BookError};

pub type Result<T> = std::result::Result<T, BookError>;

/// Abstraction over persistence backends capable of storing books and snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, book: &Book, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<Book>;
    fn list_books(&self) -> Result<Vec<String>>;
    fn backup(&self, book: &Book, name: &str, note: Option<&str>) -> Result<PathBuf>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Book>;
    fn book_path(&self, name: &str) -> PathBuf;
}

pub use json_backend::JsonStorage;
