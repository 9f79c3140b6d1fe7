//! `[site]` section configuration.

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Site information.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "site")]
pub struct SiteInfoConfig {
    /// Public base URL, used for sitemap `<loc>` entries (e.g. "https://example.com").
    pub url: Option<String>,
}

impl SiteInfoConfig {
    /// Base URL without trailing slash, empty when unset.
    pub fn base_url(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }

    /// Host of the configured URL, if any.
    pub fn host(&self) -> Option<String> {
        let url = url::Url::parse(self.url.as_deref()?).ok()?;
        url.host_str().map(str::to_string)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let field: FieldPath = Self::FIELDS.url;
        match self.url.as_deref() {
            Some(url) => {
                if url::Url::parse(url).is_err() {
                    diag.error_with_hint(
                        field,
                        format!("`{url}` is not an absolute URL"),
                        "use the full form, e.g. \"https://example.com\"",
                    );
                }
            }
            None => diag.warn(field, "not set, sitemap host checks are skipped"),
        }
    }
}
