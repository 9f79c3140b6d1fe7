//! `[validate]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [validate]
//! free_text = true      # Locale mentions must name a whitelisted place
//! disallowed = true     # Deny-list terms are never allowed
//! slugs = true          # /service-areas/<slug> must be whitelisted
//! schema = true         # JSON-LD City names must be whitelisted
//! source = true         # Also scan authored source for deny-list terms
//! redirects = true      # `check` validates the redirects file
//! sitemap = true        # `check` validates the sitemap
//! level = "error"       # Failure level: error | warn
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};

/// Rule toggles and failure level.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "validate")]
pub struct ValidateConfig {
    /// Flag locale mentions that name no whitelisted place.
    #[config(default = "true")]
    pub free_text: bool,

    /// Flag deny-list terms (case-insensitive).
    #[config(default = "true")]
    pub disallowed: bool,

    /// Flag service-area links whose slug is not whitelisted.
    #[config(default = "true")]
    pub slugs: bool,

    /// Flag structured City records whose name is not whitelisted.
    #[config(default = "true")]
    pub schema: bool,

    /// Scan the authored source directory for deny-list terms.
    #[config(default = "true")]
    pub source: bool,

    /// Check the redirects file.
    #[config(default = "true")]
    pub redirects: bool,

    /// Check the sitemap.
    #[config(default = "true")]
    pub sitemap: bool,

    /// How to treat failures: "error" or "warn".
    #[config(default = "error")]
    pub level: ValidateLevel,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            free_text: true,
            disallowed: true,
            slugs: true,
            schema: true,
            source: true,
            redirects: true,
            sitemap: true,
            level: ValidateLevel::default(),
        }
    }
}

/// Validation error level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidateLevel {
    /// Treat validation failures as errors (exit status 1).
    #[default]
    Error,
    /// Treat validation failures as warnings (exit status 0).
    Warn,
}

// ============================================================================
// Tests
// ============================================================================
