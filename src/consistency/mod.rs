//! Route, redirect and sitemap consistency.
//!
//! Each check reads one artifact and returns its own [`ConsistencyReport`];
//! nothing is shared between checks.

pub mod redirects;
pub mod report;
pub mod sitemap;

pub use report::ConsistencyReport;

use std::fs;
use std::path::Path;

use crate::config::RoutesConfig;
use crate::debug;
use crate::geo::RouteSet;
use crate::geo::drift::{self, DriftReport};
use crate::utils::plural_count;

/// Read and check a redirects file. A missing file is an error finding.
pub fn check_redirects_file(
    path: &Path,
    label: &str,
    routes: &RouteSet,
    policy: &RoutesConfig,
) -> ConsistencyReport {
    let mut report = ConsistencyReport::new(label);
    match fs::read_to_string(path) {
        Ok(content) => {
            let rules = redirects::parse_redirects(&content, &mut report);
            redirects::check_redirects(&rules, routes, policy, &mut report);
        }
        Err(e) => report.error(None, format!("cannot read `{}`: {e}", path.display())),
    }
    report
}

/// Read and check a sitemap. Missing or malformed XML is an error finding.
pub fn check_sitemap_file(
    path: &Path,
    label: &str,
    routes: &RouteSet,
    policy: &RoutesConfig,
    host: Option<&str>,
) -> ConsistencyReport {
    let mut report = ConsistencyReport::new(label);
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            report.error(None, format!("cannot read `{}`: {e}", path.display()));
            return report;
        }
    };
    match sitemap::parse_sitemap(&content) {
        Ok(entries) => sitemap::check_sitemap(&entries, routes, policy, host, &mut report),
        Err(e) => report.error(None, format!("malformed sitemap: {e}")),
    }
    report
}

/// Compare a router file with the route set.
///
/// Declared routes the dataset does not produce are errors; dataset routes
/// the router never declares are warnings.
pub fn check_router_file(
    path: &Path,
    label: &str,
    routes: &RouteSet,
    prefix: &str,
) -> ConsistencyReport {
    let mut report = ConsistencyReport::new(label);
    match fs::read_to_string(path) {
        Ok(content) => {
            let declared = drift::declarations(&content, prefix);
            let drift = drift::compare(&declared, routes);
            if drift.is_empty() {
                debug!("check"; "{label}: {} in sync", plural_count(declared.len(), "declared route"));
            }
            drift_findings(&drift, &mut report);
        }
        Err(e) => report.error(None, format!("cannot read `{}`: {e}", path.display())),
    }
    report
}

fn drift_findings(drift: &DriftReport, report: &mut ConsistencyReport) {
    for decl in &drift.unknown {
        report.error(
            Some(decl.line),
            format!("router declares `{}` but the geo dataset does not", decl.path),
        );
    }
    for path in &drift.undeclared {
        report.warn(None, format!("dataset route `{path}` is not declared by the router"));
    }
}
