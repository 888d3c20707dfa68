use crate::attribute::{platform_reader, AttributeReader};
use crate::config::Config;
use crate::error::Result;
use crate::resolver::{Resolution, Resolver, Strategy};
use crate::walker::FilesystemWalker;

/// Builds a resolver from `config` using the platform attribute reader.
pub fn build_resolver(config: &Config) -> Result<Resolver<Box<dyn AttributeReader>>> {
    let reader = platform_reader(&config.walk.get_attribute_name())?;
    Ok(Resolver::new(
        config.metadata_resolver(),
        FilesystemWalker::new(reader, config.walk.get_priority_dirs()),
    ))
}

/// Resolves a Drive file ID to its local path.
///
/// Mounts and metadata stores are rediscovered on every call. `Ok(None)`
/// means the ID is not present locally; errors only come from an unusable
/// configuration.
pub fn find_file_by_id(
    config: &Config,
    cloud_id: &str,
    strategy: Strategy,
) -> Result<Option<Resolution>> {
    let resolver = build_resolver(config)?;
    let candidates = config.discover_candidates();
    tracing::debug!(
        "Resolving {} with {} store(s) and {} mount(s)",
        cloud_id,
        candidates.stores.len(),
        candidates.mounts.len()
    );
    Ok(resolver.resolve(cloud_id.trim(), &candidates, strategy))
}
