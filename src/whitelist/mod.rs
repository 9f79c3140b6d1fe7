//! Whitelist validator.
//!
//! Classifies scanned lines against the [`Registry`] and collects the
//! findings into a [`ValidationReport`]. Files are processed in parallel;
//! the indexed collect keeps traversal order, so reports are deterministic.

pub mod report;
pub mod rules;

pub use report::ValidationReport;
pub use rules::{Matcher, Rules, Violation};

use rayon::prelude::*;

use crate::debug;
use crate::registry::Registry;
use crate::scan::{IoWarning, Line, Scanner, SourceFile};

/// Classify a sequence of lines.
#[allow(dead_code)]
pub fn validate_lines<'a>(
    lines: impl IntoIterator<Item = Line<'a>>,
    registry: &Registry,
    rules: &Rules,
) -> Result<Vec<Violation>, regex::Error> {
    let matcher = Matcher::new(rules, registry)?;
    let mut out = Vec::new();
    for line in lines {
        matcher.check_line(&line, &mut out);
    }
    Ok(out)
}

/// Scan every file of `scanner` and classify all of its lines.
pub fn validate_tree(
    scope: &str,
    scanner: &Scanner,
    registry: &Registry,
    rules: &Rules,
) -> Result<ValidationReport, regex::Error> {
    let matcher = Matcher::new(rules, registry)?;
    let entries: Vec<_> = scanner.entries().collect();

    let outcomes: Vec<Result<Vec<Violation>, IoWarning>> = entries
        .into_par_iter()
        .map(|entry| {
            let file = entry.and_then(|path| scanner.read(&path))?;
            Ok(check_file(&matcher, &file))
        })
        .collect();

    let mut report = ValidationReport {
        scope: scope.to_string(),
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok(violations) => {
                report.files_scanned += 1;
                report.violations.extend(violations);
            }
            Err(warning) => {
                debug!("scan"; "skipped {}", warning);
                report.warnings.push(warning);
            }
        }
    }
    Ok(report)
}

fn check_file(matcher: &Matcher<'_>, file: &SourceFile) -> Vec<Violation> {
    let mut out = Vec::new();
    for line in file.lines() {
        matcher.check_line(&line, &mut out);
    }
    out
}
