use crate::error::{FinderError, Result};
use regex::Regex;
use std::io::{IsTerminal, Read};
use std::sync::LazyLock;

/// Drive file IDs are alphanumeric plus '-' and '_'.
static FILE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("file ID pattern is valid"));

pub fn validate_file_id(file_id: &str) -> Result<String> {
    let file_id = file_id.trim();

    if file_id.is_empty() {
        return Err(FinderError::InvalidFileId(
            "File ID cannot be empty".to_string(),
        ));
    }

    if !FILE_ID_PATTERN.is_match(file_id) {
        return Err(FinderError::InvalidFileId(format!(
            "'{}' is not a Drive file ID (expected letters, digits, '-' or '_')",
            file_id
        )));
    }

    Ok(file_id.to_string())
}

/// Takes the ID from the argument, else from piped stdin.
pub fn read_file_id(arg: Option<String>) -> Result<String> {
    if let Some(file_id) = arg.filter(|id| !id.trim().is_empty()) {
        return validate_file_id(&file_id);
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(FinderError::InvalidFileId(
            "No file ID provided".to_string(),
        ));
    }

    let mut input = String::new();
    stdin.lock().read_to_string(&mut input)?;
    validate_file_id(&input)
}
