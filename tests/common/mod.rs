use std::sync::Mutex;

use finance_core::{config::ConfigManager, core::BookManager, storage::JsonStorage};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Temp dirs handed out by `setup_test_env`, parked here so they outlive
/// the managers that point into them.
static LIVE_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Book and config managers rooted in a fresh directory per call.
#[allow(dead_code)]
pub fn setup_test_env() -> (BookManager, ConfigManager) {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().to_path_buf();
    LIVE_DIRS.lock().expect("temp dir registry").push(dir);

    let storage = JsonStorage::new(Some(root.clone()), Some(3)).expect("storage backend");
    let config = ConfigManager::with_base_dir(root).expect("config manager");
    (BookManager::new(Box::new(storage)), config)
}
