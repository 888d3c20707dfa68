use serde::Serialize;
use std::path::PathBuf;

use crate::cli::read_file_id;
use crate::config::load_config;
use crate::error::Result;
use crate::finder::find_file_by_id;
use crate::resolver::{Source, Strategy};
use crate::reveal::reveal_in_file_manager;

#[derive(Serialize)]
struct FindOutput {
    id: String,
    path: PathBuf,
    strategy: Source,
}

pub fn find_and_reveal(
    file_id: Option<String>,
    strategy: Strategy,
    no_reveal: bool,
    json: bool,
) -> Result<i32> {
    let file_id = read_file_id(file_id)?;
    let config = load_config()?;

    let Some(resolution) = find_file_by_id(&config, &file_id, strategy)? else {
        eprintln!("Error: File not found for ID: {}", file_id);
        return Ok(1);
    };

    if !no_reveal {
        reveal_in_file_manager(&resolution.path)?;
    }

    if json {
        let output = FindOutput {
            id: file_id,
            path: resolution.path,
            strategy: resolution.source,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", resolution.path.display());
    }

    Ok(0)
}
