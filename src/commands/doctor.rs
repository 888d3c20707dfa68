use std::path::PathBuf;
use std::time::Duration;

use crate::attribute::{platform_reader, AttrBuffer};
use crate::config::{get_config_path, validate_config, Config};
use crate::error::Result;
use crate::metadata::{list_metadata_stores, probe_store};
use crate::mounts::list_mount_points;

struct DiagnosticCheck {
    name: String,
    status: DiagnosticStatus,
    details: Option<String>,
}

enum DiagnosticStatus {
    Ok,
    Warning,
    Error,
}

impl DiagnosticCheck {
    fn ok(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DiagnosticStatus::Ok,
            details: Some(details.into()),
        }
    }

    fn warning(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DiagnosticStatus::Warning,
            details: Some(details.into()),
        }
    }

    fn error(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DiagnosticStatus::Error,
            details: Some(details.into()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            DiagnosticStatus::Ok => "\u{2713}",
            DiagnosticStatus::Warning => "\u{26a0}",
            DiagnosticStatus::Error => "\u{2717}",
        }
    }
}

pub fn run_doctor() -> Result<()> {
    println!();
    println!("gdfid-finder Diagnostics");
    println!("========================");
    println!();

    let mut checks: Vec<DiagnosticCheck> = Vec::new();
    let mut suggestions: Vec<String> = Vec::new();

    let (config_check, config) = check_config();
    if matches!(config_check.status, DiagnosticStatus::Error) {
        suggestions.push("Fix or regenerate the config: gdfid-finder config init --force".to_string());
    }
    checks.push(config_check);

    let (mount_check, mounts) = check_mounts(&config);
    if mounts.is_empty() {
        suggestions.push(
            "Start Google Drive for Desktop and make sure it uses the CloudStorage location"
                .to_string(),
        );
    }
    checks.push(mount_check);

    let store_checks = check_metadata_stores(&config);
    if store_checks
        .iter()
        .all(|check| !matches!(check.status, DiagnosticStatus::Ok))
    {
        suggestions.push(
            "Lookups will fall back to the slower filesystem walk".to_string(),
        );
    }
    checks.extend(store_checks);

    checks.push(check_attribute(&config, &mounts));

    for check in &checks {
        let details = check.details.as_deref().unwrap_or("");
        println!("{} {} - {}", check.symbol(), check.name, details);
    }

    if !suggestions.is_empty() {
        println!();
        println!("Suggestions:");
        for suggestion in &suggestions {
            println!("  -> {}", suggestion);
        }
    }

    println!();

    Ok(())
}

fn check_config() -> (DiagnosticCheck, Config) {
    let config_path = match get_config_path() {
        Ok(path) => path,
        Err(e) => return (DiagnosticCheck::error("Config file", e.to_string()), Config::default()),
    };

    if !config_path.exists() {
        return (
            DiagnosticCheck::ok("Config file", "not present, using defaults"),
            Config::default(),
        );
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(config) => match validate_config(&config) {
                Ok(()) => (
                    DiagnosticCheck::ok("Config file", format!("{} (valid)", config_path.display())),
                    config,
                ),
                Err(e) => (
                    DiagnosticCheck::error("Config file", format!("invalid: {}", e)),
                    Config::default(),
                ),
            },
            Err(e) => (
                DiagnosticCheck::error("Config file", format!("parse error: {}", e)),
                Config::default(),
            ),
        },
        Err(e) => (
            DiagnosticCheck::error("Config file", format!("read error: {}", e)),
            Config::default(),
        ),
    }
}

fn check_mounts(config: &Config) -> (DiagnosticCheck, Vec<PathBuf>) {
    let root = config.cloud_storage_dir();
    let mounts = list_mount_points(&root, &config.mounts.get_name_prefix());

    let check = if !root.exists() {
        DiagnosticCheck::error("Drive mounts", format!("{} does not exist", root.display()))
    } else if mounts.is_empty() {
        DiagnosticCheck::error(
            "Drive mounts",
            format!("no {}* folders in {}", config.mounts.get_name_prefix(), root.display()),
        )
    } else {
        let listing = mounts
            .iter()
            .map(|m| format!("    - {}", m.display()))
            .collect::<Vec<_>>()
            .join("\n");
        DiagnosticCheck::ok("Drive mounts", format!("{} found:\n{}", mounts.len(), listing))
    };

    (check, mounts)
}

fn check_metadata_stores(config: &Config) -> Vec<DiagnosticCheck> {
    let root = config.drivefs_dir();
    let stores = list_metadata_stores(&root, &config.metadata.get_db_file_name());
    if stores.is_empty() {
        return vec![DiagnosticCheck::warning(
            "Metadata databases",
            format!("none found under {}", root.display()),
        )];
    }

    let timeout = Duration::from_millis(config.metadata.get_busy_timeout_ms());
    stores
        .iter()
        .map(|store| {
            let name = format!("Metadata {}", store.display());
            match probe_store(store, timeout) {
                Ok(count) => DiagnosticCheck::ok(name, format!("{} items indexed", count)),
                Err(e) => DiagnosticCheck::warning(name, format!("unusable: {}", e)),
            }
        })
        .collect()
}

fn check_attribute(config: &Config, mounts: &[PathBuf]) -> DiagnosticCheck {
    let attribute_name = config.walk.get_attribute_name();
    let name = format!("Attribute {}", attribute_name);

    let reader = match platform_reader(&attribute_name) {
        Ok(reader) => reader,
        Err(e) => return DiagnosticCheck::error(name, e.to_string()),
    };
    let Some(mount) = mounts.first() else {
        return DiagnosticCheck::warning(name, "no mount to check");
    };

    let mut buf = AttrBuffer::new();
    let candidates = std::iter::once(mount.clone()).chain(
        config
            .walk
            .get_priority_dirs()
            .into_iter()
            .map(|dir| mount.join(dir)),
    );
    for candidate in candidates {
        if let Some(value) = buf.read_value(&reader, &candidate) {
            return DiagnosticCheck::ok(
                name,
                format!("readable ({} = {})", candidate.display(), value),
            );
        }
    }

    DiagnosticCheck::warning(
        name,
        format!("not readable on {} or its top-level folders", mount.display()),
    )
}
