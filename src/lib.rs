pub mod attribute;
pub mod cli;
pub mod config;
pub mod error;
pub mod finder;
pub mod metadata;
pub mod mounts;
pub mod resolver;
pub mod reveal;
pub mod walker;

pub use attribute::{
    platform_reader, AttrBuffer, AttributeReader, LibcXattrReader, XattrCrateReader,
    ATTR_BUFFER_SIZE, DRIVEFS_ITEM_ID_ATTR,
};

pub use config::expand_tilde;
pub use config::get_config_path;
pub use config::load_config;
pub use config::save_config;
pub use config::Config;

pub use error::{FinderError, Result};

pub use finder::{build_resolver, find_file_by_id};

pub use metadata::{MetadataResolver, RootKind, RootPrefix};

pub use mounts::list_mount_points;

pub use resolver::{Candidates, Resolution, Resolver, Source, Strategy};

pub use walker::FilesystemWalker;
