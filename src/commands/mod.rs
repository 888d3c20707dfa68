pub mod config;
pub mod doctor;
pub mod find;
pub mod inspect;

pub use config::handle_config_command;
pub use doctor::run_doctor;
pub use find::find_and_reveal;
pub use inspect::inspect_path;
