//! `check` command: redirects, sitemap and router against the route set.

use anyhow::{Result, bail};

use super::common::load_generation;
use crate::config::{SiteConfig, ValidateLevel};
use crate::consistency::{
    ConsistencyReport, check_redirects_file, check_router_file, check_sitemap_file,
};
use crate::log;
use crate::utils::plural_count;

pub fn check_site(config: &SiteConfig) -> Result<()> {
    let (_, generation) = load_generation(config)?;
    let routes = &generation.routes;
    let paths = &config.paths;

    let mut reports: Vec<ConsistencyReport> = Vec::new();
    if config.validate.redirects {
        reports.push(check_redirects_file(
            &paths.redirects,
            &config.root_relative(&paths.redirects),
            routes,
            &config.routes,
        ));
    }
    if config.validate.sitemap {
        let host = config.site.host();
        reports.push(check_sitemap_file(
            &paths.sitemap,
            &config.root_relative(&paths.sitemap),
            routes,
            &config.routes,
            host.as_deref(),
        ));
    }
    if let Some(router) = &paths.router {
        reports.push(check_router_file(
            router,
            &config.root_relative(router),
            routes,
            &config.routes.prefix,
        ));
    }

    if reports.is_empty() {
        log!("check"; "no checks enabled");
        return Ok(());
    }

    for report in &reports {
        report.print();
        log!("check"; "{report}");
    }

    let errors: usize = reports.iter().map(|r| r.errors.len()).sum();
    if errors == 0 {
        return Ok(());
    }

    let failing: Vec<&str> = reports
        .iter()
        .filter(|r| r.has_errors())
        .map(|r| r.source.as_str())
        .collect();
    let message = format!(
        "found {} in {}",
        plural_count(errors, "error"),
        failing.join(", ")
    );
    match config.validate.level {
        ValidateLevel::Error => bail!(message),
        ValidateLevel::Warn => {
            log!("warning"; "{message} (level = warn, not failing)");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::registry::TEST_REGISTRY;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const DATASET: &str = r#"
[[hub]]
name = "Davenport Ranch"
slug = "davenport-ranch"
"#;

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc></url>
  <url><loc>https://example.com/areas/davenport-ranch</loc></url>
  <url><loc>https://example.com/service-areas/round-rock</loc></url>
</urlset>
"#;

    fn project(root: &Path, redirects: &str) -> SiteConfig {
        fs::create_dir_all(root.join("data")).unwrap();
        fs::create_dir_all(root.join("public")).unwrap();
        fs::write(root.join("data/service-areas.toml"), TEST_REGISTRY).unwrap();
        fs::write(root.join("data/geo.toml"), DATASET).unwrap();
        fs::write(root.join("public/_redirects"), redirects).unwrap();
        fs::write(root.join("public/sitemap.xml"), SITEMAP).unwrap();

        let mut config = test_parse_config("[site]\nurl = \"https://example.com\"");
        config.paths.resolve(root);
        config.set_root(root);
        config
    }

    #[test]
    fn test_consistent_project() {
        let temp = TempDir::new().unwrap();
        let config = project(temp.path(), "/old /areas/davenport-ranch 301\n/* /index.html 200\n");
        check_site(&config).unwrap();
    }

    #[test]
    fn test_unknown_redirect_target_fails() {
        let temp = TempDir::new().unwrap();
        let mut config = project(
            temp.path(),
            "/old /areas/davenport-ranch-west 301\n/* /index.html 200\n",
        );
        let err = check_site(&config).unwrap_err();
        assert!(err.to_string().contains("_redirects"));

        config.validate.redirects = false;
        check_site(&config).unwrap();
    }

    #[test]
    fn test_router_drift_fails() {
        let temp = TempDir::new().unwrap();
        let mut config = project(temp.path(), "/* /index.html 200\n");
        let router = temp.path().join("App.tsx");
        fs::write(
            &router,
            "<Route path=\"/areas/davenport-ranch-west\" element={<Page />} />\n",
        )
        .unwrap();
        config.paths.router = Some(router);
        assert!(check_site(&config).is_err());

        config.validate.level = ValidateLevel::Warn;
        check_site(&config).unwrap();
    }
}
