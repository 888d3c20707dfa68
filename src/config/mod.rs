pub mod paths;
pub mod persistence;
pub mod schema;

pub use paths::*;
pub use persistence::*;
pub use schema::*;

use crate::metadata::{default_root_prefixes, RootPrefix, METADATA_DB_FILE};

fn default_cloud_storage_dir() -> String {
    "~/Library/CloudStorage".to_string()
}

fn default_drivefs_dir() -> String {
    "~/Library/Application Support/Google/DriveFS".to_string()
}

fn default_mount_prefix() -> String {
    crate::mounts::DRIVE_MOUNT_PREFIX.to_string()
}

fn default_db_file_name() -> String {
    METADATA_DB_FILE.to_string()
}

fn default_busy_timeout_ms() -> u64 {
    1000
}

fn default_max_depth() -> u32 {
    crate::metadata::DEFAULT_MAX_DEPTH
}

fn default_prefixes() -> Vec<RootPrefix> {
    default_root_prefixes()
}

fn default_attribute_name() -> String {
    crate::attribute::DRIVEFS_ITEM_ID_ATTR.to_string()
}

fn default_priority_dirs() -> Vec<String> {
    crate::walker::default_priority_dirs()
}
