//! Violation report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;
use serde::Serialize;

use super::rules::{Violation, ViolationKind};
use crate::scan::IoWarning;
use crate::utils::plural_s;

/// Immutable result of one validation pass.
#[derive(Debug, Default, Serialize)]
pub struct ValidationReport {
    /// Which tree was scanned ("output", "source").
    pub scope: String,
    pub files_scanned: usize,
    /// In traversal order, then line order, then rule order.
    pub violations: Vec<Violation>,
    pub warnings: Vec<IoWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Violations grouped by kind, then by file in traversal order.
    pub fn grouped(&self) -> BTreeMap<ViolationKind, Vec<(&str, Vec<&Violation>)>> {
        let mut groups: BTreeMap<ViolationKind, Vec<(&str, Vec<&Violation>)>> = BTreeMap::new();
        for v in &self.violations {
            let files = groups.entry(v.kind).or_default();
            match files.iter_mut().find(|(file, _)| *file == v.file) {
                Some((_, list)) => list.push(v),
                None => files.push((v.file.as_str(), vec![v])),
            }
        }
        groups
    }

    /// Print the full report to stderr, one section per violation kind.
    pub fn print(&self) {
        for (kind, files) in self.grouped() {
            print_section(kind, &files);
        }
    }
}

/// Print one kind's findings grouped by file.
fn print_section(kind: ViolationKind, files: &[(&str, Vec<&Violation>)]) {
    eprintln!();

    let file_count = files.len();
    let count: usize = files.iter().map(|(_, v)| v.len()).sum();

    // Section header
    eprintln!(
        "{} {}",
        kind.as_str().red().bold(),
        format!(
            "({file_count} file{}, {count} violation{})",
            plural_s(file_count),
            plural_s(count)
        )
        .dimmed()
    );

    for (path, violations) in files {
        eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
        for v in violations {
            let line = format!("L{}", v.line);
            if v.detail.is_empty() {
                eprintln!("{} {} {}", "→".red(), line.dimmed(), v.excerpt);
            } else {
                eprintln!(
                    "{} {} `{}` {}",
                    "→".red(),
                    line.dimmed(),
                    v.detail.yellow(),
                    v.excerpt
                );
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.violation_count();
        let files = self.files_scanned;
        if total == 0 {
            write!(
                f,
                "{} {}",
                "all checks passed".green(),
                format!("({files} file{} scanned)", plural_s(files)).dimmed()
            )
        } else {
            write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                total.to_string().red().bold(),
                format!("violation{}", plural_s(total)).dimmed()
            )
        }
    }
}
