//! Route paths and the derived route set.
//!
//! - [`RoutePath`]: normalized, decoded route path
//! - [`RouteEntry`]: one route with its kind and component
//! - [`RouteSet`]: ordered routes with O(1) membership

use percent_encoding::percent_decode_str;
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::sync::Arc;

/// Decoded route path.
///
/// Invariants:
/// - Always starts with `/`
/// - No trailing slash, except for the root `/`
/// - No query string or fragment
/// - Percent-decoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePath(Arc<str>);

impl RoutePath {
    /// Normalize a raw path (`/areas/x/`, `areas/x?ref=1`, `/areas/%78`).
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Self::root();
        }

        let path = strip_query_fragment(trimmed);
        let decoded = percent_decode_str(&path)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or(path);

        let stripped = decoded.trim_end_matches('/');
        if stripped.is_empty() {
            return Self::root();
        }
        if stripped.starts_with('/') {
            Self(Arc::from(stripped))
        } else {
            Self(Arc::from(format!("/{stripped}")))
        }
    }

    /// Route path of an absolute URL (`https://example.com/areas/x/`).
    pub fn from_url(url: &url::Url) -> Self {
        Self::new(url.path())
    }

    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join a child segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.is_root() {
            Self::new(&format!("/{segment}"))
        } else {
            Self::new(&format!("{}/{segment}", self.0))
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.as_ref() == "/"
    }

    /// Get parent route path.
    ///
    /// `/areas/x/y` -> `/areas/x`, `/areas` -> `/`, `/` -> `None`
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) | None => Some(Self::root()),
            Some(idx) => Some(Self(Arc::from(&self.0[..idx]))),
        }
    }

    /// Whether this path is `prefix` or lies below it, on segment boundaries.
    pub fn is_under(&self, prefix: &str) -> bool {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return true;
        }
        match self.0.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Strip query string and fragment. Dot segments are kept as written.
fn strip_query_fragment(path: &str) -> String {
    path.split(['?', '#']).next().unwrap_or(path).to_string()
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoutePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoutePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Serialize for RoutePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

// ============================================================================
// Route entries
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Static,
    Hub,
    Neighborhood,
    ServiceArea,
}

/// One derived route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: RoutePath,
    pub kind: RouteKind,
    pub component: String,
}

/// Ordered route set with path lookup.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    entries: Vec<RouteEntry>,
    index: FxHashMap<RoutePath, usize>,
}

impl RouteSet {
    /// Append a route, returning the existing entry if the path is taken.
    pub fn insert(&mut self, entry: RouteEntry) -> Result<(), &RouteEntry> {
        if let Some(&idx) = self.index.get(&entry.path) {
            return Err(&self.entries[idx]);
        }
        self.index.insert(entry.path.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&RouteEntry> {
        self.index.get(path).map(|&idx| &self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Routes of the given kind, in insertion order.
    pub fn of_kind(&self, kind: RouteKind) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Neighborhood routes whose parent hub route is missing.
    pub fn orphans(&self) -> Vec<&RouteEntry> {
        self.of_kind(RouteKind::Neighborhood)
            .filter(|entry| {
                entry
                    .path
                    .parent()
                    .and_then(|parent| self.get(parent.as_str()))
                    .is_none_or(|parent| parent.kind != RouteKind::Hub)
            })
            .collect()
    }
}

impl Serialize for RouteSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
