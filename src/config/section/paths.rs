//! `[paths]` section configuration.
//!
//! All paths are relative to the project root (the directory holding
//! `geowarden.toml`) and are resolved to absolute paths once at load time.

use macros::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::path::{normalize_path, resolve_under};

/// Project-relative inputs and outputs.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "paths")]
pub struct PathsConfig {
    /// Build output directory scanned by `validate`.
    #[config(default = "dist")]
    pub output: PathBuf,

    /// Authored source directory checked against the deny-list.
    #[config(default = "src")]
    pub source: PathBuf,

    /// Whitelist registry (service areas and deny-list).
    #[config(default = "data/service-areas.toml")]
    pub whitelist: PathBuf,

    /// Hub and neighborhood dataset.
    #[config(default = "data/geo.toml")]
    pub geo: PathBuf,

    /// Redirects file (`from to status` per line).
    #[config(default = "public/_redirects")]
    pub redirects: PathBuf,

    /// Sitemap checked by `check` and written by `generate --sitemap`.
    #[config(default = "public/sitemap.xml")]
    pub sitemap: PathBuf,

    /// Directory receiving one generated page wrapper per hub and neighborhood.
    #[config(default = "src/pages/areas")]
    pub pages: PathBuf,

    /// Generated route manifest for the application router.
    #[config(default = "src/generated/geoRoutes.tsx")]
    pub manifest: PathBuf,

    /// Hand-maintained router file compared against the dataset (optional).
    pub router: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: "dist".into(),
            source: "src".into(),
            whitelist: "data/service-areas.toml".into(),
            geo: "data/geo.toml".into(),
            redirects: "public/_redirects".into(),
            sitemap: "public/sitemap.xml".into(),
            pages: "src/pages/areas".into(),
            manifest: "src/generated/geoRoutes.tsx".into(),
            router: None,
        }
    }
}

impl PathsConfig {
    /// Resolve every path against `root`.
    pub fn resolve(&mut self, root: &Path) {
        for path in [
            &mut self.output,
            &mut self.source,
            &mut self.whitelist,
            &mut self.geo,
            &mut self.redirects,
            &mut self.sitemap,
            &mut self.pages,
            &mut self.manifest,
        ] {
            *path = normalize_path(&resolve_under(root, path));
        }
        if let Some(router) = self.router.take() {
            self.router = Some(normalize_path(&resolve_under(root, &router)));
        }
    }
}
