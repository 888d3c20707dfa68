use crate::error::{FinderError, Result};
use crate::metadata::{MetadataResolver, RootKind, RootPrefix};
use crate::resolver::Candidates;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::expand_tilde;

const MAX_BUSY_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_storage_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drivefs_dir: Option<String>,
}

impl PathsConfig {
    pub fn get_cloud_storage_dir(&self) -> String {
        self.cloud_storage_dir
            .clone()
            .unwrap_or_else(super::default_cloud_storage_dir)
    }

    pub fn get_drivefs_dir(&self) -> String {
        self.drivefs_dir
            .clone()
            .unwrap_or_else(super::default_drivefs_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MountsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_prefix: Option<String>,
}

impl MountsConfig {
    pub fn get_name_prefix(&self) -> String {
        self.name_prefix
            .clone()
            .unwrap_or_else(super::default_mount_prefix)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetadataConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_prefixes: Option<Vec<RootPrefix>>,
}

impl MetadataConfig {
    pub fn get_db_file_name(&self) -> String {
        self.db_file_name
            .clone()
            .unwrap_or_else(super::default_db_file_name)
    }

    pub fn get_busy_timeout_ms(&self) -> u64 {
        self.busy_timeout_ms
            .unwrap_or_else(super::default_busy_timeout_ms)
    }

    pub fn get_max_depth(&self) -> u32 {
        self.max_depth.unwrap_or_else(super::default_max_depth)
    }

    pub fn get_root_prefixes(&self) -> Vec<RootPrefix> {
        self.root_prefixes
            .clone()
            .unwrap_or_else(super::default_prefixes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WalkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_dirs: Option<Vec<String>>,
}

impl WalkConfig {
    pub fn get_attribute_name(&self) -> String {
        self.attribute_name
            .clone()
            .unwrap_or_else(super::default_attribute_name)
    }

    pub fn get_priority_dirs(&self) -> Vec<String> {
        self.priority_dirs
            .clone()
            .unwrap_or_else(super::default_priority_dirs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub mounts: MountsConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub walk: WalkConfig,
}

impl Config {
    pub fn cloud_storage_dir(&self) -> PathBuf {
        expand_tilde(&self.paths.get_cloud_storage_dir())
    }

    pub fn drivefs_dir(&self) -> PathBuf {
        expand_tilde(&self.paths.get_drivefs_dir())
    }

    pub fn metadata_resolver(&self) -> MetadataResolver {
        MetadataResolver::new(
            Duration::from_millis(self.metadata.get_busy_timeout_ms()),
            self.metadata.get_max_depth(),
            self.metadata.get_root_prefixes(),
        )
    }

    /// Same settings with every default written out, for `config init`.
    pub fn resolved(&self) -> Config {
        Config {
            paths: PathsConfig {
                cloud_storage_dir: Some(self.paths.get_cloud_storage_dir()),
                drivefs_dir: Some(self.paths.get_drivefs_dir()),
            },
            mounts: MountsConfig {
                name_prefix: Some(self.mounts.get_name_prefix()),
            },
            metadata: MetadataConfig {
                db_file_name: Some(self.metadata.get_db_file_name()),
                busy_timeout_ms: Some(self.metadata.get_busy_timeout_ms()),
                max_depth: Some(self.metadata.get_max_depth()),
                root_prefixes: Some(self.metadata.get_root_prefixes()),
            },
            walk: WalkConfig {
                attribute_name: Some(self.walk.get_attribute_name()),
                priority_dirs: Some(self.walk.get_priority_dirs()),
            },
        }
    }

    pub fn discover_candidates(&self) -> Candidates {
        Candidates::discover(
            &self.cloud_storage_dir(),
            &self.mounts.get_name_prefix(),
            &self.drivefs_dir(),
            &self.metadata.get_db_file_name(),
        )
    }
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.metadata.get_max_depth() == 0 {
        return Err(FinderError::Config(
            "metadata.max_depth must be at least 1".to_string(),
        ));
    }

    let busy_timeout_ms = config.metadata.get_busy_timeout_ms();
    if busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
        tracing::warn!(
            "metadata.busy_timeout_ms ({}) is above {}ms; a locked database will stall lookups",
            busy_timeout_ms,
            MAX_BUSY_TIMEOUT_MS
        );
    }

    if let Some(prefixes) = &config.metadata.root_prefixes {
        match prefixes.first() {
            Some(first) if first.prefix.is_empty() && first.kind == RootKind::Direct => {}
            _ => {
                return Err(FinderError::Config(
                    "metadata.root_prefixes must start with the direct rule { prefix = \"\", kind = \"direct\" }"
                        .to_string(),
                ));
            }
        }
    }

    if config.walk.get_attribute_name().contains('\0') {
        return Err(FinderError::Config(
            "walk.attribute_name must not contain NUL bytes".to_string(),
        ));
    }

    Ok(())
}
