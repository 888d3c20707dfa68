//! Two-phase resolution: metadata database first, attribute walk second.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::attribute::AttributeReader;
use crate::metadata::{list_metadata_stores, MetadataResolver};
use crate::mounts::list_mount_points;
use crate::walker::FilesystemWalker;

/// Which phases a resolution may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Strategy {
    /// Metadata database, then the filesystem walk if that finds nothing.
    #[default]
    Auto,
    /// Metadata database only.
    Metadata,
    /// Filesystem walk only.
    Walk,
}

/// The phase that produced a resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Metadata,
    Walk,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Metadata => write!(f, "metadata"),
            Source::Walk => write!(f, "walk"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub path: PathBuf,
    pub source: Source,
}

/// Candidate locations for one resolution call.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    pub stores: Vec<PathBuf>,
    pub mounts: Vec<PathBuf>,
}

impl Candidates {
    /// Enumerates mounts and metadata stores fresh from disk.
    pub fn discover(
        cloud_storage_dir: &Path,
        mount_prefix: &str,
        drivefs_dir: &Path,
        db_file_name: &str,
    ) -> Self {
        Self {
            stores: list_metadata_stores(drivefs_dir, db_file_name),
            mounts: list_mount_points(cloud_storage_dir, mount_prefix),
        }
    }
}

pub struct Resolver<R> {
    metadata: MetadataResolver,
    walker: FilesystemWalker<R>,
}

impl<R: AttributeReader> Resolver<R> {
    pub fn new(metadata: MetadataResolver, walker: FilesystemWalker<R>) -> Self {
        Self { metadata, walker }
    }

    /// Resolves `cloud_id` to an existing local path, or `None`.
    ///
    /// Every store/mount pair is tried through the metadata database before
    /// any mount is walked; the first hit wins.
    pub fn resolve(
        &self,
        cloud_id: &str,
        candidates: &Candidates,
        strategy: Strategy,
    ) -> Option<Resolution> {
        if candidates.mounts.is_empty() {
            tracing::debug!("No Drive mount points found");
            return None;
        }

        if strategy != Strategy::Walk {
            if let Some(path) = self.resolve_via_metadata(cloud_id, candidates) {
                tracing::info!("Resolved {} via metadata: {}", cloud_id, path.display());
                return Some(Resolution {
                    path,
                    source: Source::Metadata,
                });
            }
        }

        if strategy != Strategy::Metadata {
            if let Some(path) = self.resolve_via_walk(cloud_id, &candidates.mounts) {
                tracing::info!("Resolved {} via walk: {}", cloud_id, path.display());
                return Some(Resolution {
                    path,
                    source: Source::Walk,
                });
            }
        }

        tracing::debug!("{} not found", cloud_id);
        None
    }

    fn resolve_via_metadata(&self, cloud_id: &str, candidates: &Candidates) -> Option<PathBuf> {
        for store in &candidates.stores {
            tracing::debug!("Querying metadata store {}", store.display());
            let Some(segments) = self.metadata.segments(store, cloud_id) else {
                continue;
            };
            for mount in &candidates.mounts {
                if let Some(path) = self.metadata.place(&segments, mount) {
                    return Some(path);
                }
                tracing::debug!(
                    "Segments {:?} not present under {}",
                    segments,
                    mount.display()
                );
            }
        }
        None
    }

    fn resolve_via_walk(&self, cloud_id: &str, mounts: &[PathBuf]) -> Option<PathBuf> {
        mounts.iter().find_map(|mount| {
            tracing::debug!("Walking {}", mount.display());
            self.walker.search(mount, cloud_id)
        })
    }
}
