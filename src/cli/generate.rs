//! `generate` command: page wrappers, route manifest and optional sitemap.

use anyhow::{Result, bail};

use super::GenerateArgs;
use super::common::{load_generation, log_paths};
use crate::config::SiteConfig;
use crate::geo::render_manifest;
use crate::geo::sitemap::render_sitemap;
use crate::geo::write::{self, OutputLayout, PlannedFile};
use crate::log;
use crate::utils::plural_count;

pub fn generate_site(config: &SiteConfig, args: &GenerateArgs) -> Result<()> {
    let (_, generation) = load_generation(config)?;

    let layout = OutputLayout {
        pages_dir: &config.paths.pages,
        manifest: &config.paths.manifest,
        extension: &config.generate.extension,
    };
    let manifest = render_manifest(&generation, &config.generate);
    let mut files = write::plan(&generation, manifest, layout);

    if args.sitemap {
        if config.site.url.is_none() {
            bail!("`--sitemap` needs `[site] url` in {}", crate::config::CONFIG_FILE);
        }
        files.push(PlannedFile {
            path: config.paths.sitemap.clone(),
            contents: render_sitemap(&generation.routes, config.site.base_url()),
        });
    }

    let digest = write::digest(&files);
    let stale = write::find_stale(&generation, layout)?;

    if args.check {
        let summary = write::check_files(&files);
        log_paths(config, "check", "missing", &summary.missing);
        log_paths(config, "check", "changed", &summary.changed);
        log_paths(config, "check", "stale", &stale);

        if !summary.is_clean() || !stale.is_empty() {
            let outdated = summary.missing.len() + summary.changed.len() + stale.len();
            bail!(
                "generated output is out of date ({}), run `geowarden generate`",
                plural_count(outdated, "file")
            );
        }
        log!("check"; "{} up to date (digest {digest})", plural_count(files.len(), "file"));
        return Ok(());
    }

    let mut summary = write::write_files(&files)?;
    if args.clean {
        summary.removed = write::remove_stale(&stale)?;
        log_paths(config, "generate", "removed", &summary.removed);
    } else {
        log_paths(config, "warning", "stale (use --clean to remove)", &stale);
    }

    log!(
        "generate";
        "{}: {} written, {} unchanged (digest {digest})",
        plural_count(generation.routes.len(), "route"),
        summary.written.len(),
        summary.unchanged
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const REGISTRY: &str = r#"
disallowed = ["Cedar Park"]

[[area]]
display_name = "Austin"
slug = "austin"
full_address = "Austin, TX, USA"
"#;

    const DATASET: &str = r#"
[[hub]]
name = "Steiner Ranch"
slug = "steiner-ranch-78732"

[[hub.neighborhood]]
name = "Rob Roy"
slug = "rob-roy"
"#;

    fn project(root: &Path) -> SiteConfig {
        fs::create_dir_all(root.join("data")).unwrap();
        fs::write(root.join("data/service-areas.toml"), REGISTRY).unwrap();
        fs::write(root.join("data/geo.toml"), DATASET).unwrap();

        let mut config = test_parse_config("[site]\nurl = \"https://example.com\"");
        config.paths.resolve(root);
        config.set_root(root);
        config
    }

    fn args(check: bool, clean: bool) -> GenerateArgs {
        GenerateArgs {
            check,
            clean,
            sitemap: true,
        }
    }

    #[test]
    fn test_generate_then_check() {
        let temp = TempDir::new().unwrap();
        let config = project(temp.path());

        assert!(generate_site(&config, &args(true, false)).is_err());

        generate_site(&config, &args(false, false)).unwrap();
        let pages = &config.paths.pages;
        assert!(pages.join("HubSteinerRanch78732.tsx").exists());
        assert!(pages.join("NeighborhoodSteinerRanch78732RobRoy.tsx").exists());
        let sitemap = fs::read_to_string(&config.paths.sitemap).unwrap();
        assert!(sitemap.contains("https://example.com/areas/steiner-ranch-78732/rob-roy"));

        generate_site(&config, &args(true, false)).unwrap();
    }

    #[test]
    fn test_stale_pages_fail_check_until_cleaned() {
        let temp = TempDir::new().unwrap();
        let config = project(temp.path());
        generate_site(&config, &args(false, false)).unwrap();

        let stale = config.paths.pages.join("HubDavenportRanchWest.tsx");
        let handwritten = config.paths.pages.join("AreasIndex.tsx");
        fs::write(&stale, "old").unwrap();
        fs::write(&handwritten, "mine").unwrap();
        assert!(generate_site(&config, &args(true, false)).is_err());

        generate_site(&config, &args(false, true)).unwrap();
        assert!(!stale.exists());
        assert!(handwritten.exists());
        generate_site(&config, &args(true, false)).unwrap();
    }

    #[test]
    fn test_sitemap_requires_site_url() {
        let temp = TempDir::new().unwrap();
        let mut config = project(temp.path());
        config.site.url = None;
        assert!(generate_site(&config, &args(false, false)).is_err());
    }
}
