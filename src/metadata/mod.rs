//! Fast path: rebuild an item's local path from the DriveFS metadata database.

pub mod locator;
pub mod prefixes;
pub mod query;

pub use locator::{list_metadata_stores, METADATA_DB_FILE};
pub use prefixes::{default_root_prefixes, materialize, RootKind, RootPrefix};
pub use query::{probe_store, query_path_segments};

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(1000);

/// Real Drive hierarchies are far shallower; this only guards bad data.
pub const DEFAULT_MAX_DEPTH: u32 = 50;

#[derive(Debug, Clone)]
pub struct MetadataResolver {
    busy_timeout: Duration,
    max_depth: u32,
    root_prefixes: Vec<RootPrefix>,
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BUSY_TIMEOUT, DEFAULT_MAX_DEPTH, default_root_prefixes())
    }
}

impl MetadataResolver {
    pub fn new(busy_timeout: Duration, max_depth: u32, root_prefixes: Vec<RootPrefix>) -> Self {
        Self {
            busy_timeout,
            max_depth,
            root_prefixes,
        }
    }

    /// Root-to-leaf display names for `cloud_id` in one store.
    pub fn segments(&self, store: &Path, cloud_id: &str) -> Option<Vec<String>> {
        query_path_segments(store, cloud_id, self.busy_timeout, self.max_depth)
    }

    /// Resolves `cloud_id` through `store` onto `mount`.
    pub fn resolve(&self, store: &Path, mount: &Path, cloud_id: &str) -> Option<PathBuf> {
        let segments = self.segments(store, cloud_id)?;
        self.place(&segments, mount)
    }

    /// Maps already-queried segments onto `mount` using the prefix table.
    pub fn place(&self, segments: &[String], mount: &Path) -> Option<PathBuf> {
        materialize(mount, segments, &self.root_prefixes)
    }
}
