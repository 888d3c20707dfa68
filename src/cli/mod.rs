pub mod args;
pub mod validation;

pub use args::{Args, Commands, ConfigAction};
pub use validation::{read_file_id, validate_file_id};
