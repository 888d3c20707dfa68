//! Slow path: scan a mount for the entry whose sync attribute carries the ID.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::attribute::{AttrBuffer, AttributeReader};

/// Top-level folders that hold nearly all synced content, searched first.
pub const DEFAULT_PRIORITY_DIRS: &[&str] = &["マイドライブ", "My Drive", "共有ドライブ", "Shared drives"];

pub fn default_priority_dirs() -> Vec<String> {
    DEFAULT_PRIORITY_DIRS.iter().map(|s| s.to_string()).collect()
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

pub struct FilesystemWalker<R> {
    reader: R,
    priority_dirs: Vec<String>,
}

impl<R: AttributeReader> FilesystemWalker<R> {
    pub fn new(reader: R, priority_dirs: Vec<String>) -> Self {
        Self {
            reader,
            priority_dirs,
        }
    }

    #[cfg(test)]
    fn reader(&self) -> &R {
        &self.reader
    }

    /// Searches one mount point for the entry tagged with `cloud_id`.
    ///
    /// Order: the mount itself, then each existing priority entry (file or
    /// directory), then every other non-hidden child. All phases share one visited set.
    pub fn search(&self, mount: &Path, cloud_id: &str) -> Option<PathBuf> {
        let mut walk = Walk::new(&self.reader, cloud_id.as_bytes());

        if walk.check(mount) {
            return Some(mount.to_path_buf());
        }
        if let Ok(real) = fs::canonicalize(mount) {
            walk.visited.insert(real);
        }

        let found = self.search_priority_dirs(&mut walk, mount).or_else(|| {
            self.search_remaining_children(&mut walk, mount)
        });

        tracing::debug!(
            "Walked {} with {} attribute checks ({} dirs)",
            mount.display(),
            walk.checks,
            walk.visited.len()
        );
        found
    }

    fn search_priority_dirs(&self, walk: &mut Walk<'_, R>, mount: &Path) -> Option<PathBuf> {
        for name in &self.priority_dirs {
            let dir = mount.join(name);
            if !dir.exists() {
                continue;
            }
            tracing::trace!("Searching priority entry {}", dir.display());
            if let Some(found) = walk.run(dir) {
                return Some(found);
            }
        }
        None
    }

    fn search_remaining_children(&self, walk: &mut Walk<'_, R>, mount: &Path) -> Option<PathBuf> {
        let children = match visible_children(mount) {
            Ok(children) => children,
            Err(e) => {
                tracing::debug!("Cannot list {}: {}", mount.display(), e);
                return None;
            }
        };

        for child in children {
            let is_priority = child
                .file_name()
                .map(|name| self.priority_dirs.iter().any(|p| name == p.as_str()))
                .unwrap_or(false);
            if is_priority {
                continue;
            }
            if let Some(found) = walk.run(child) {
                return Some(found);
            }
        }
        None
    }
}

/// State for one mount-point walk. Never shared across mounts.
struct Walk<'a, R> {
    reader: &'a R,
    target: &'a [u8],
    buf: AttrBuffer,
    visited: HashSet<PathBuf>,
    checks: usize,
}

impl<'a, R: AttributeReader> Walk<'a, R> {
    fn new(reader: &'a R, target: &'a [u8]) -> Self {
        Self {
            reader,
            target,
            buf: AttrBuffer::new(),
            visited: HashSet::new(),
            checks: 0,
        }
    }

    fn check(&mut self, path: &Path) -> bool {
        self.checks += 1;
        self.buf.matches(self.reader, path, self.target)
    }

    /// Iterative depth-first search rooted at `start`.
    fn run(&mut self, start: PathBuf) -> Option<PathBuf> {
        let mut stack = vec![start];

        while let Some(path) = stack.pop() {
            if self.check(&path) {
                return Some(path);
            }
            if !path.is_dir() {
                continue;
            }

            let real = match fs::canonicalize(&path) {
                Ok(real) => real,
                Err(e) => {
                    tracing::trace!("Cannot resolve {}: {}", path.display(), e);
                    continue;
                }
            };
            if !self.visited.insert(real) {
                tracing::trace!("Already visited {}", path.display());
                continue;
            }

            match visible_children(&path) {
                // Reversed so the lexicographically first child pops first.
                Ok(children) => stack.extend(children.into_iter().rev()),
                Err(e) => tracing::debug!("Skipping {}: {}", path.display(), e),
            }
        }

        None
    }
}

/// Non-hidden entries of `dir`, sorted by name.
fn visible_children(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut children: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| !is_hidden(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect();
    children.sort();
    Ok(children)
}
