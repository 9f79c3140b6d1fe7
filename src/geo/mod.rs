//! Geo hierarchy: hubs, neighborhoods, and everything derived from them.
//!
//! # Module Structure
//!
//! ```text
//! geo/
//! ├── naming     # Component names from slugs
//! ├── route      # RoutePath, RouteEntry, RouteSet
//! ├── generate   # Dataset -> routes + page wrappers + manifest
//! ├── write      # Write-if-changed, --check, stale files
//! ├── sitemap    # Route set -> sitemap.xml
//! └── drift      # Router declarations vs dataset
//! ```
//!
//! The dataset file is the only place hubs and neighborhoods are declared:
//!
//! ```toml
//! [[hub]]
//! name = "Steiner Ranch"
//! slug = "steiner-ranch-78732"
//!
//! [[hub.neighborhood]]
//! name = "Rob Roy"
//! slug = "rob-roy"
//! ```

pub mod drift;
pub mod generate;
pub mod naming;
pub mod route;
pub mod sitemap;
pub mod write;

pub use generate::{GenerateOptions, Generation, generate, render_manifest};
pub use route::{RoutePath, RouteSet};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{
    ConfigDiagnostics, ConfigError, FieldPath, print_unknown_fields_warning,
    read_toml_with_ignored,
};

/// A hub: top-level area with its own route under the area prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoArea {
    pub name: String,
    pub slug: String,
    #[serde(default, rename = "neighborhood")]
    pub neighborhoods: Vec<Neighborhood>,
}

/// A neighborhood, owned by exactly one hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Default, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    hub: Vec<GeoArea>,
}

/// Load the hub dataset.
///
/// Structural slug problems are left to [`generate`], which reports them
/// with route context. Only blank names are rejected here.
pub fn load_dataset(path: &Path) -> Result<Vec<GeoArea>, ConfigError> {
    let (file, ignored) = read_toml_with_ignored::<DatasetFile>(path)?;
    if !ignored.is_empty() {
        print_unknown_fields_warning(&ignored, path);
    }

    let mut diag = ConfigDiagnostics::new(path.display().to_string());
    if file.hub.is_empty() {
        diag.warn(FieldPath::new("hub"), "dataset declares no hubs");
    }
    for hub in &file.hub {
        if hub.name.trim().is_empty() {
            diag.error(
                FieldPath::new("hub.name"),
                format!("hub `{}` has an empty name", hub.slug),
            );
        }
        for nb in &hub.neighborhoods {
            if nb.name.trim().is_empty() {
                diag.error(
                    FieldPath::new("hub.neighborhood.name"),
                    format!("neighborhood `{}/{}` has an empty name", hub.slug, nb.slug),
                );
            }
        }
    }
    diag.finish()?;

    Ok(file.hub)
}
