use crate::cli::ConfigAction;
use crate::config::{get_config_path, load_config, save_config};
use crate::error::{FinderError, Result};

pub fn handle_config_command(action: Option<ConfigAction>) -> Result<()> {
    match action {
        Some(ConfigAction::Path) => {
            let config_path = get_config_path()?;
            println!("Config location: {}", config_path.display());
        }
        None | Some(ConfigAction::Show) => {
            let config_path = get_config_path()?;
            let config = load_config()?;
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("Config file: {} (not found, using defaults)", config_path.display());
            }
            println!();
            println!("Current configuration:");
            println!("  Paths:");
            println!("    cloud_storage_dir: {}", config.cloud_storage_dir().display());
            println!("    drivefs_dir: {}", config.drivefs_dir().display());
            println!("  Mounts:");
            println!("    name_prefix: {}", config.mounts.get_name_prefix());
            println!("  Metadata:");
            println!("    db_file_name: {}", config.metadata.get_db_file_name());
            println!(
                "    busy_timeout_ms: {}",
                config.metadata.get_busy_timeout_ms()
            );
            println!("    max_depth: {}", config.metadata.get_max_depth());
            println!("    root_prefixes:");
            for rule in config.metadata.get_root_prefixes() {
                let shown = if rule.prefix.is_empty() {
                    "(mount root)"
                } else {
                    rule.prefix.as_str()
                };
                println!("      - {} [{}]", shown, rule.kind);
            }
            println!("  Walk:");
            println!("    attribute_name: {}", config.walk.get_attribute_name());
            println!(
                "    priority_dirs: {:?}",
                config.walk.get_priority_dirs()
            );
        }
        Some(ConfigAction::Init { force }) => {
            let config_path = get_config_path()?;
            if config_path.exists() && !force {
                return Err(FinderError::Config(format!(
                    "Config already exists at {} (use --force to overwrite)",
                    config_path.display()
                )));
            }
            // An unparseable file is replaced wholesale with defaults.
            let config = load_config().unwrap_or_default();
            save_config(&config.resolved())?;
            println!("Wrote config to {}", config_path.display());
        }
    }
    Ok(())
}
