//! Drift between the dataset and a hand-maintained route declaration file.
//!
//! The application router may still declare area routes by hand
//! (`<Route path="/areas/davenport-ranch-west" ... />`). Those declarations
//! are compared with the generated route set; differences are reported and
//! never fixed automatically.

use regex::Regex;
use std::sync::LazyLock;

use super::route::{RouteKind, RoutePath, RouteSet};

/// `path="/x"`, `path: '/x'`, `path={"/x"}` and friends.
static PATH_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bpath\s*[:=]\s*\{?\s*["'`](/[^"'`]*)["'`]"#).expect("valid path regex")
});

/// A route declared in the router file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub path: RoutePath,
    pub line: usize,
}

#[derive(Debug, Default)]
pub struct DriftReport {
    /// Declared under the area prefix but absent from the dataset.
    pub unknown: Vec<Declaration>,
    /// Produced by the dataset but never declared.
    pub undeclared: Vec<RoutePath>,
}

impl DriftReport {
    pub fn is_empty(&self) -> bool {
        self.unknown.is_empty() && self.undeclared.is_empty()
    }
}

/// Extract static route declarations under `prefix` from router source text.
///
/// Dynamic segments (`:slug`, `*`) are skipped; they do not name a route.
pub fn declarations(source: &str, prefix: &str) -> Vec<Declaration> {
    let mut out = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        for caps in PATH_DECL.captures_iter(line) {
            let raw = &caps[1];
            if raw.contains([':', '*']) {
                continue;
            }
            let path = RoutePath::new(raw);
            if path.is_under(prefix) && path.as_str() != RoutePath::new(prefix).as_str() {
                out.push(Declaration {
                    path,
                    line: idx + 1,
                });
            }
        }
    }
    out
}

/// Compare router declarations with the hub and neighborhood routes of `routes`.
///
/// A router that declares nothing under the prefix is assumed to mount the
/// generated manifest, so nothing is reported as undeclared.
pub fn compare(declared: &[Declaration], routes: &RouteSet) -> DriftReport {
    let mut report = DriftReport::default();

    for decl in declared {
        let known = routes
            .get(decl.path.as_str())
            .is_some_and(|entry| matches!(entry.kind, RouteKind::Hub | RouteKind::Neighborhood));
        if !known {
            report.unknown.push(decl.clone());
        }
    }

    if declared.is_empty() {
        return report;
    }

    for entry in routes
        .iter()
        .filter(|e| matches!(e.kind, RouteKind::Hub | RouteKind::Neighborhood))
    {
        if !declared.iter().any(|d| d.path == entry.path) {
            report.undeclared.push(entry.path.clone());
        }
    }
    report
}
