use std::fs;
use std::path::{Path, PathBuf};

/// Directory name prefix DriveFS gives each account mount under CloudStorage.
pub const DRIVE_MOUNT_PREFIX: &str = "GoogleDrive-";

/// Lists the Drive mount points under `cloud_storage_dir`, sorted.
///
/// Only immediate subdirectories whose name starts with `name_prefix` count.
/// A missing or unreadable parent yields an empty list.
pub fn list_mount_points(cloud_storage_dir: &Path, name_prefix: &str) -> Vec<PathBuf> {
    let entries = match fs::read_dir(cloud_storage_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(
                "Cannot list mount root {}: {}",
                cloud_storage_dir.display(),
                e
            );
            return Vec::new();
        }
    };

    let mut mounts: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(name_prefix))
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    mounts.sort();
    mounts
}
