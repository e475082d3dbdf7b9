use dirs::home_dir;
use std::{env, fs, io, path::Path, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".finance_core";
const BOOKS_DIR: &str = "books";
const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";

/// Returns the application-specific data directory, defaulting to `~/.finance_core`.
///
/// The `FINANCE_CORE_HOME` environment variable overrides the default, which
/// keeps tests and scripted runs off the real home directory.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("FINANCE_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Managed directory layout rooted at an explicit base directory. Storage
/// backends and the config manager resolve their files through these.
pub fn books_dir_in(base: &Path) -> PathBuf {
    base.join(BOOKS_DIR)
}

pub fn backups_root_in(base: &Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Creates `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Sibling staging path used for atomic writes: `config.json` becomes
/// `config.json.tmp`.
pub fn staged_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    }
}

/// Replaces `path` by writing `contents` to the staging sibling and renaming
/// it into place, so readers never observe a half-written file.
pub fn replace_file(path: &Path, contents: &str) -> io::Result<()> {
    let staged = staged_path(path);
    fs::write(&staged, contents)?;
    fs::rename(&staged, path)
}
