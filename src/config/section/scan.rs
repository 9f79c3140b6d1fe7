//! `[scan]` section configuration.

use macros::Config;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// File extensions and exclude patterns for tree scans.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "scan")]
pub struct ScanConfig {
    /// Extensions scanned in the build output.
    #[config(default = r#"["html", "xml", "json", "js", "txt"]"#)]
    pub extensions: Vec<String>,

    /// Extensions scanned in the authored source (deny-list only).
    #[config(default = r#"["ts", "tsx", "js", "jsx", "json", "html", "md"]"#)]
    pub source_extensions: Vec<String>,

    /// Regexes matched against root-relative paths; matching entries are skipped.
    #[config(default = r#"['(^|/)\.git(/|$)', '(^|/)node_modules(/|$)', '\.map$', '\.(png|jpe?g|gif|webp|avif|ico|svg|woff2?|ttf|eot|pdf|mp4)$']"#)]
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            extensions: strings(&["html", "xml", "json", "js", "txt"]),
            source_extensions: strings(&["ts", "tsx", "js", "jsx", "json", "html", "md"]),
            exclude: strings(&[
                r"(^|/)\.git(/|$)",
                r"(^|/)node_modules(/|$)",
                r"\.map$",
                r"\.(png|jpe?g|gif|webp|avif|ico|svg|woff2?|ttf|eot|pdf|mp4)$",
            ]),
        }
    }
}

impl ScanConfig {
    /// Compile exclude patterns. Call after [`ScanConfig::validate`].
    pub fn exclude_regexes(&self) -> Vec<Regex> {
        self.exclude
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for pattern in &self.exclude {
            if let Err(e) = Regex::new(pattern) {
                diag.error(Self::FIELDS.exclude, format!("invalid regex `{pattern}`: {e}"));
            }
        }
        if self.extensions.is_empty() {
            diag.error(Self::FIELDS.extensions, "at least one extension is required");
        }
        for ext in self.extensions.iter().chain(&self.source_extensions) {
            if ext.starts_with('.') {
                diag.warn(
                    Self::FIELDS.extensions,
                    format!("`{ext}` has a leading dot and will never match"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_excludes_compile() {
        let config = ScanConfig::default();
        assert_eq!(config.exclude_regexes().len(), config.exclude.len());
    }

    #[test]
    fn test_invalid_exclude_reported() {
        let config = ScanConfig {
            exclude: vec!["(".into()],
            ..ScanConfig::default()
        };
        let mut diag = ConfigDiagnostics::new("test");
        config.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "scan.exclude");
    }
}
