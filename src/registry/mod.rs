//! Whitelist registry: the allowed service areas plus the deny-list.
//!
//! The registry file is the single source of truth for place names:
//!
//! ```toml
//! disallowed = ["Cedar Park", "Leander"]
//!
//! [[area]]
//! display_name = "Austin"
//! slug = "austin"
//! full_address = "Austin, TX, USA"
//! zip_code = "78701"
//! ```
//!
//! Loading validates every entry and reports all problems at once.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::{
    ConfigDiagnostics, ConfigError, FieldPath, parse_toml_with_ignored,
    print_unknown_fields_warning,
};

/// One whitelisted service area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub display_name: String,
    pub slug: String,
    pub full_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

/// On-disk shape of the registry file.
#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    disallowed: Vec<String>,
    #[serde(default, rename = "area")]
    areas: Vec<ServiceArea>,
}

/// Insertion-ordered string set.
///
/// Iteration follows declaration order; lookups go through the hash set.
#[derive(Debug, Clone, Default)]
pub struct NameSet {
    order: Vec<String>,
    index: FxHashSet<String>,
}

impl NameSet {
    /// Insert a value, returning `false` if it was already present.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.index.insert(value.to_string()) {
            self.order.push(value.to_string());
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn contains(&self, value: &str) -> bool {
        self.index.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Loaded and validated whitelist.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    areas: Vec<ServiceArea>,
    display_names: NameSet,
    slugs: NameSet,
    full_addresses: NameSet,
    disallowed: NameSet,
}

impl Registry {
    /// Load the registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::parse(&content, path)
    }

    /// Parse registry content already in memory. `path` is used for messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let (file, ignored) = parse_toml_with_ignored::<RegistryFile>(content)
            .map_err(|err| ConfigError::Parse(path.to_path_buf(), err))?;
        if !ignored.is_empty() {
            print_unknown_fields_warning(&ignored, path);
        }
        Self::build(file, &path.display().to_string())
    }

    fn build(file: RegistryFile, source: &str) -> Result<Self, ConfigError> {
        let mut diag = ConfigDiagnostics::new(source);
        let mut registry = Self::default();

        if file.areas.is_empty() {
            diag.error_with_hint(
                FieldPath::new("area"),
                "registry has no service areas",
                "add at least one [[area]] table",
            );
        }

        for area in &file.areas {
            check_area(area, &mut diag);
            if !area.slug.is_empty() && !registry.slugs.insert(&area.slug) {
                diag.error(
                    FieldPath::new("area.slug"),
                    format!("duplicate slug `{}`", area.slug),
                );
            }
            if !area.display_name.is_empty() && !registry.display_names.insert(&area.display_name)
            {
                diag.warn(
                    FieldPath::new("area.display_name"),
                    format!("duplicate display name `{}`", area.display_name),
                );
            }
            if !area.full_address.is_empty() {
                registry.full_addresses.insert(&area.full_address);
            }
        }

        for term in &file.disallowed {
            if term.trim().is_empty() {
                diag.error(FieldPath::new("disallowed"), "empty deny-list term");
                continue;
            }
            if registry.display_names.contains(term) {
                diag.warn(
                    FieldPath::new("disallowed"),
                    format!("`{term}` is both whitelisted and disallowed, it will always be flagged"),
                );
            }
            registry.disallowed.insert(term);
        }

        registry.areas = file.areas;
        diag.finish()?;
        Ok(registry)
    }

    pub fn areas(&self) -> &[ServiceArea] {
        &self.areas
    }

    pub fn display_names(&self) -> &NameSet {
        &self.display_names
    }

    pub fn slugs(&self) -> &NameSet {
        &self.slugs
    }

    #[allow(dead_code)]
    pub fn full_addresses(&self) -> &NameSet {
        &self.full_addresses
    }

    pub fn disallowed(&self) -> &NameSet {
        &self.disallowed
    }

    /// Whether `line` contains any whitelisted full address or display name.
    pub fn mentions_whitelisted(&self, line: &str) -> bool {
        self.full_addresses.iter().any(|addr| line.contains(addr))
            || self.display_names.iter().any(|name| line.contains(name))
    }
}

fn check_area(area: &ServiceArea, diag: &mut ConfigDiagnostics) {
    if area.display_name.trim().is_empty() {
        diag.error(FieldPath::new("area.display_name"), "display name must not be empty");
    }
    if area.full_address.trim().is_empty() {
        diag.error(
            FieldPath::new("area.full_address"),
            format!("full address of `{}` must not be empty", area.slug),
        );
    }
    if area.slug.is_empty() {
        diag.error(FieldPath::new("area.slug"), "slug must not be empty");
    } else if !is_slug(&area.slug) {
        diag.error_with_hint(
            FieldPath::new("area.slug"),
            format!("`{}` is not a valid slug", area.slug),
            "use lowercase letters, digits and single hyphens",
        );
    }
    if let Some(zip) = &area.zip_code
        && !is_zip(zip)
    {
        diag.error(
            FieldPath::new("area.zip_code"),
            format!("`{zip}` is not a ZIP code"),
        );
    }
}

/// Lowercase-hyphenated slug: `[a-z0-9]+(-[a-z0-9]+)*`.
pub fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && s.split('-').all(|part| {
            !part.is_empty()
                && part
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

fn is_zip(s: &str) -> bool {
    let (head, tail) = s.split_once('-').unwrap_or((s, ""));
    let digits = |p: &str, n: usize| p.len() == n && p.bytes().all(|b| b.is_ascii_digit());
    digits(head, 5) && (tail.is_empty() && !s.contains('-') || digits(tail, 4))
}

#[cfg(test)]
pub(crate) const TEST_REGISTRY: &str = r#"
disallowed = ["Cedar Park", "Leander"]

[[area]]
display_name = "Austin"
slug = "austin"
full_address = "Austin, TX, USA"
zip_code = "78701"

[[area]]
display_name = "Round Rock"
slug = "round-rock"
full_address = "Round Rock, TX, USA"

[[area]]
display_name = "Steiner Ranch"
slug = "steiner-ranch"
full_address = "Steiner Ranch, Austin, TX 78732"
"#;

#[cfg(test)]
pub(crate) fn test_registry() -> Registry {
    Registry::parse(TEST_REGISTRY, Path::new("service-areas.toml")).unwrap()
}
