use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which collection of Drive roots a prefix directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootKind {
    /// Roots that sit directly in the mount (My Drive).
    Direct,
    /// Backed-up machines under "Computers".
    OtherComputers,
    /// Team roots under "Shared drives".
    SharedDrives,
}

impl std::fmt::Display for RootKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootKind::Direct => write!(f, "direct"),
            RootKind::OtherComputers => write!(f, "other-computers"),
            RootKind::SharedDrives => write!(f, "shared-drives"),
        }
    }
}

/// One entry of the ordered prefix table tried between a mount point and the
/// first path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootPrefix {
    pub prefix: String,
    pub kind: RootKind,
}

impl RootPrefix {
    pub fn new(prefix: &str, kind: RootKind) -> Self {
        Self {
            prefix: prefix.to_string(),
            kind,
        }
    }
}

/// Direct children first, then the localized and English collection folders.
pub fn default_root_prefixes() -> Vec<RootPrefix> {
    vec![
        RootPrefix::new("", RootKind::Direct),
        RootPrefix::new("その他のパソコン", RootKind::OtherComputers),
        RootPrefix::new("Computers", RootKind::OtherComputers),
        RootPrefix::new("共有ドライブ", RootKind::SharedDrives),
        RootPrefix::new("Shared drives", RootKind::SharedDrives),
    ]
}

/// Joins `segments` under `mount`, trying each prefix in order, and returns
/// the first candidate that exists on disk.
pub fn materialize(mount: &Path, segments: &[String], prefixes: &[RootPrefix]) -> Option<PathBuf> {
    if segments.is_empty() {
        return None;
    }
    let relative: PathBuf = segments.iter().collect();

    for rule in prefixes {
        let candidate = if rule.prefix.is_empty() {
            mount.join(&relative)
        } else {
            mount.join(&rule.prefix).join(&relative)
        };

        tracing::trace!("Trying {} root: {}", rule.kind, candidate.display());
        if candidate.exists() {
            return Some(candidate);
        }
    }

    None
}
