//! Consistency findings.

use std::fmt;

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::utils::plural_s;

/// One consistency finding, anchored to a line or entry when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "L{line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors and warnings of one checked artifact.
#[derive(Debug, Default, Serialize)]
pub struct ConsistencyReport {
    /// What was checked (`public/_redirects`, `public/sitemap.xml`).
    pub source: String,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ConsistencyReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn error(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.errors.push(Finding {
            line,
            message: message.into(),
        });
    }

    pub fn warn(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.warnings.push(Finding {
            line,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Print errors, then warnings, to stderr.
    pub fn print(&self) {
        self.print_section("errors", &self.errors, true);
        self.print_section("warnings", &self.warnings, false);
    }

    fn print_section(&self, name: &str, findings: &[Finding], is_error: bool) {
        if findings.is_empty() {
            return;
        }
        eprintln!();

        let header = format!("{} {name}", self.source);
        let count = format!("({} finding{})", findings.len(), plural_s(findings.len()));
        if is_error {
            eprintln!("{} {}", header.red().bold(), count.dimmed());
        } else {
            eprintln!("{} {}", header.magenta().bold(), count.dimmed());
        }

        for finding in findings {
            let arrow = if is_error {
                "→".red().to_string()
            } else {
                "→".magenta().to_string()
            };
            eprintln!("{arrow} {finding}");
        }
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.len();
        let warnings = self.warnings.len();
        if errors == 0 {
            write!(f, "{} {}", self.source, "consistent".green())?;
        } else {
            write!(
                f,
                "{} {} {}",
                self.source,
                errors.to_string().red().bold(),
                format!("error{}", plural_s(errors)).dimmed()
            )?;
        }
        if warnings > 0 {
            write!(
                f,
                " {}",
                format!("({warnings} warning{})", plural_s(warnings)).dimmed()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_display() {
        let finding = Finding {
            line: Some(3),
            message: "unknown target".into(),
        };
        assert_eq!(finding.to_string(), "L3: unknown target");
    }

    #[test]
    fn test_report_summary() {
        let mut report = ConsistencyReport::new("_redirects");
        assert!(report.to_string().contains("consistent"));

        report.warn(None, "soft");
        assert!(!report.has_errors());
        assert!(report.to_string().contains("1 warning"));

        report.error(Some(1), "hard");
        assert!(report.has_errors());
        assert!(report.to_string().contains("error"));
    }
}
