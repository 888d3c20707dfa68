use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::resolver::Strategy;

#[derive(Parser, Debug)]
#[command(name = "gdfid-finder")]
#[command(about = "Find a Google Drive for Desktop file by its Drive ID and reveal it locally")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Resolve a Drive file ID to its local path")]
    Find {
        #[arg(help = "Drive file ID (read from stdin when omitted)")]
        file_id: Option<String>,

        #[arg(long, value_enum, default_value_t = Strategy::Auto, help = "Resolution phases to use")]
        strategy: Strategy,

        #[arg(long, help = "Print the path without revealing it in the file manager")]
        no_reveal: bool,

        #[arg(long, help = "JSON output")]
        json: bool,
    },
    #[command(about = "Print the Drive ID attribute of a local file or folder")]
    Inspect {
        #[arg(help = "Path inside a Drive mount")]
        path: PathBuf,
    },
    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    #[command(about = "Diagnose mounts, metadata databases and attribute access")]
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    #[command(about = "Show current configuration values")]
    Show,
    #[command(about = "Show config file path")]
    Path,
    #[command(about = "Write a config file with every default filled in")]
    Init {
        #[arg(long, help = "Overwrite an existing config file")]
        force: bool,
    },
}
