use std::path::Path;

use crate::attribute::{platform_reader, AttrBuffer};
use crate::config::load_config;
use crate::error::{FinderError, Result};

pub fn inspect_path(path: &Path) -> Result<i32> {
    if !path.exists() {
        return Err(FinderError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let config = load_config()?;
    let attribute_name = config.walk.get_attribute_name();
    let reader = platform_reader(&attribute_name)?;

    match AttrBuffer::new().read_value(&reader, path) {
        Some(value) => {
            println!("{}", value);
            Ok(0)
        }
        None => {
            eprintln!(
                "No '{}' attribute on {}",
                attribute_name,
                path.display()
            );
            Ok(1)
        }
    }
}
