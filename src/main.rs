use clap::Parser;

mod attribute;
mod cli;
mod commands;
mod config;
mod error;
mod finder;
mod metadata;
mod mounts;
mod resolver;
mod reveal;
mod walker;

use cli::{Args, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    match run() {
        Ok(code) => {
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> error::Result<i32> {
    // stdout carries the resolved path, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("GDFID_LOG").unwrap_or_else(|_| "warn".to_string()),
        ))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Find {
            file_id,
            strategy,
            no_reveal,
            json,
        } => commands::find_and_reveal(file_id, strategy, no_reveal, json),
        Commands::Inspect { path } => commands::inspect_path(&path),
        Commands::Config { action } => {
            commands::handle_config_command(action)?;
            Ok(0)
        }
        Commands::Doctor => {
            commands::run_doctor()?;
            Ok(0)
        }
    }
}
