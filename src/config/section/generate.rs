//! `[generate]` section configuration.

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Shape of generated page wrappers and the route manifest.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "generate")]
pub struct GenerateConfig {
    /// Shared page component every wrapper renders.
    #[config(default = "GeoAreaPage")]
    pub page_component: String,

    /// Module the shared page component is imported from.
    #[config(default = "@/components/GeoAreaPage")]
    pub page_import: String,

    /// Module prefix used by the manifest to import generated wrappers.
    #[config(default = "@/pages/areas")]
    pub import_prefix: String,

    /// File extension of generated wrappers.
    #[config(default = "tsx")]
    pub extension: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            page_component: "GeoAreaPage".into(),
            page_import: "@/components/GeoAreaPage".into(),
            import_prefix: "@/pages/areas".into(),
            extension: "tsx".into(),
        }
    }
}

impl GenerateConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let is_ident = |s: &str| {
            let mut chars = s.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        };
        if !is_ident(&self.page_component) {
            diag.error(
                Self::FIELDS.page_component,
                format!("`{}` is not a valid component name", self.page_component),
            );
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            diag.error_with_hint(
                Self::FIELDS.extension,
                format!("invalid extension `{}`", self.extension),
                "write the extension without a leading dot, e.g. \"tsx\"",
            );
        }
    }
}
