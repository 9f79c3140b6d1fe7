//! `[routes]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [routes]
//! prefix = "/areas"
//! service_area_prefix = "/service-areas"
//! static_routes = ["/", "/about", "/services", "/contact"]
//! canonical = ["/about", "/services", "/contact"]
//! strict_prefixes = ["/services", "/areas", "/service-areas"]
//! exempt_prefixes = ["/blog/"]
//! fallback_from = "/*"
//! fallback_to = "/index.html"
//! fallback_status = 200
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Route prefixes, static routes and redirect policy.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "routes")]
pub struct RoutesConfig {
    /// Prefix of hub and neighborhood routes.
    #[config(default = "/areas")]
    pub prefix: String,

    /// Prefix of whitelisted service-area routes.
    #[config(default = "/service-areas")]
    pub service_area_prefix: String,

    /// Fixed routes of the application.
    #[config(default = r#"["/", "/about", "/services", "/services/interior-painting", "/services/exterior-painting", "/services/cabinet-painting", "/gallery", "/contact", "/free-estimate", "/blog", "/areas", "/service-areas"]"#)]
    pub static_routes: Vec<String>,

    /// Canonical pages that must not carry trailing-slash self-redirects.
    #[config(default = r#"["/about", "/services", "/gallery", "/contact", "/free-estimate", "/blog", "/areas", "/service-areas"]"#)]
    pub canonical: Vec<String>,

    /// Top-level segments whose routes are fully enumerable (unknown targets are errors).
    #[config(default = r#"["/services", "/areas", "/service-areas"]"#)]
    pub strict_prefixes: Vec<String>,

    /// Path prefixes generated dynamically (skipped by sitemap checks).
    #[config(default = r#"["/blog/"]"#)]
    pub exempt_prefixes: Vec<String>,

    /// Source of the SPA fallback rule.
    #[config(default = "/*")]
    pub fallback_from: String,

    /// Target of the SPA fallback rule.
    #[config(default = "/index.html")]
    pub fallback_to: String,

    /// Status of the SPA fallback rule.
    #[config(default = "200")]
    pub fallback_status: u16,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            prefix: "/areas".into(),
            service_area_prefix: "/service-areas".into(),
            static_routes: strings(&[
                "/",
                "/about",
                "/services",
                "/services/interior-painting",
                "/services/exterior-painting",
                "/services/cabinet-painting",
                "/gallery",
                "/contact",
                "/free-estimate",
                "/blog",
                "/areas",
                "/service-areas",
            ]),
            canonical: strings(&[
                "/about",
                "/services",
                "/gallery",
                "/contact",
                "/free-estimate",
                "/blog",
                "/areas",
                "/service-areas",
            ]),
            strict_prefixes: strings(&["/services", "/areas", "/service-areas"]),
            exempt_prefixes: strings(&["/blog/"]),
            fallback_from: "/*".into(),
            fallback_to: "/index.html".into(),
            fallback_status: 200,
        }
    }
}

impl RoutesConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let fields = Self::FIELDS;
        let single: [(FieldPath, &str); 2] = [
            (fields.prefix, &self.prefix),
            (fields.service_area_prefix, &self.service_area_prefix),
        ];
        for (field, value) in single {
            check_route(diag, field, value);
            if value == "/" {
                diag.error(field, "prefix must not be the site root");
            }
        }

        let lists: [(FieldPath, &[String]); 4] = [
            (fields.static_routes, &self.static_routes),
            (fields.canonical, &self.canonical),
            (fields.strict_prefixes, &self.strict_prefixes),
            (fields.exempt_prefixes, &self.exempt_prefixes),
        ];
        for (field, values) in lists {
            for value in values {
                check_route(diag, field, value);
            }
        }

        if !(200..=599).contains(&self.fallback_status) {
            diag.error(
                fields.fallback_status,
                format!("`{}` is not an HTTP status", self.fallback_status),
            );
        }
    }
}

fn check_route(diag: &mut ConfigDiagnostics, field: FieldPath, value: &str) {
    if !value.starts_with('/') {
        diag.error_with_hint(
            field,
            format!("`{value}` must start with `/`"),
            format!("use \"/{}\"", value.trim_start_matches('/')),
        );
    }
}
