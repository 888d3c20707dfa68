use crate::error::{FinderError, Result};
use std::path::Path;
use std::process::Command;

/// Shows `path` in the desktop file manager.
///
/// The path is passed as a plain argument, never interpolated into a script.
pub fn reveal_in_file_manager(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(FinderError::Reveal(format!(
            "Path does not exist: {}",
            path.display()
        )));
    }

    let mut command = reveal_command(path);
    let program = command.get_program().to_string_lossy().to_string();
    let output = command
        .output()
        .map_err(|e| FinderError::Reveal(format!("Failed to run '{}': {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            "Unknown error".to_string()
        } else {
            stderr
        };
        return Err(FinderError::Reveal(message));
    }

    Ok(())
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg("-R").arg(path);
    command
}

/// xdg-open has no "select" mode, so open the containing folder instead.
#[cfg(not(target_os = "macos"))]
fn reveal_command(path: &Path) -> Command {
    let target = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    };
    let mut command = Command::new("xdg-open");
    command.arg(target);
    command
}
