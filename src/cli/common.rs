//! Common utilities shared across CLI commands.

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::geo::{GenerateOptions, Generation, generate, load_dataset};
use crate::registry::Registry;
use crate::{debug, log};

/// Load the registry and the geo dataset, then expand them into a generation.
///
/// Every command that needs the route set goes through here, so `generate`,
/// `check` and `routes` always agree on it.
pub fn load_generation(config: &SiteConfig) -> Result<(Registry, Generation)> {
    let registry = Registry::load(&config.paths.whitelist)?;
    let hubs = load_dataset(&config.paths.geo)?;
    debug!(
        "generate";
        "{} service areas, {} hubs",
        registry.areas().len(),
        hubs.len()
    );

    let service_areas: Vec<String> = registry.slugs().iter().map(str::to_string).collect();
    let generation = generate(
        &hubs,
        GenerateOptions {
            routes: &config.routes,
            generate: &config.generate,
            service_areas: &service_areas,
        },
    )
    .with_context(|| {
        format!(
            "Failed to generate routes from '{}'",
            config.root_relative(&config.paths.geo)
        )
    })?;

    Ok((registry, generation))
}

/// Log a list of project paths under one module prefix.
pub fn log_paths<'a>(
    config: &SiteConfig,
    module: &str,
    label: &str,
    paths: impl IntoIterator<Item = &'a std::path::PathBuf>,
) {
    for path in paths {
        log!(module; "{label} {}", config.root_relative(path));
    }
}
