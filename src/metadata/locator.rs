use std::fs;
use std::path::{Path, PathBuf};

/// File name of the per-account DriveFS metadata database.
pub const METADATA_DB_FILE: &str = "metadata_sqlite_db";

/// Lists `<drivefs_dir>/<account>/<db_file_name>` for every account directory
/// that holds a metadata database, sorted.
///
/// A missing or unreadable `drivefs_dir` yields an empty list.
pub fn list_metadata_stores(drivefs_dir: &Path, db_file_name: &str) -> Vec<PathBuf> {
    let entries = match fs::read_dir(drivefs_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot list DriveFS dir {}: {}", drivefs_dir.display(), e);
            return Vec::new();
        }
    };

    let mut stores: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .map(|account_dir| account_dir.join(db_file_name))
        .filter(|db| db.is_file())
        .collect();

    stores.sort();
    stores
}
