//! `validate` command: whitelist scan of the build output and deny-list scan
//! of authored source.

use anyhow::{Result, bail};
use regex::Regex;

use super::ValidateArgs;
use crate::config::{SiteConfig, ValidateLevel};
use crate::registry::Registry;
use crate::scan::Scanner;
use crate::utils::path::display_relative;
use crate::utils::plural_count;
use crate::whitelist::{Rules, ValidationReport, validate_tree};
use crate::{debug, log};

pub fn validate_site(config: &SiteConfig, args: &ValidateArgs) -> Result<()> {
    let registry = Registry::load(&config.paths.whitelist)?;
    debug!(
        "registry";
        "{}, {}",
        plural_count(registry.slugs().len(), "service area"),
        plural_count(registry.disallowed().len(), "deny-list term")
    );
    let rules = Rules::new(
        &config.locale,
        &config.routes.service_area_prefix,
        &config.validate,
    )?;

    let mut reports = Vec::new();
    if !args.source_only {
        reports.push(scan_output(config, &registry, &rules)?);
    }
    if (args.source_only || config.validate.source)
        && let Some(report) = scan_source(config, &registry, &rules)?
    {
        reports.push(report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            report.print();
            if !report.warnings.is_empty() {
                log!("warning"; "{}: skipped {}", report.scope, plural_count(report.warnings.len(), "unreadable file"));
            }
            log!("validate"; "{}: {report}", report.scope);
        }
    }

    finish(&reports, config.validate.level, args.json)
}

/// Full rule set over the build output.
fn scan_output(config: &SiteConfig, registry: &Registry, rules: &Rules) -> Result<ValidationReport> {
    let output = &config.paths.output;
    if !output.is_dir() {
        bail!(
            "output directory `{}` not found, build the site first",
            config.root_relative(output)
        );
    }

    let scanner = Scanner::new(output.clone(), &config.scan.extensions, config.scan.exclude_regexes());
    debug!("validate"; "scanning {}", config.root_relative(output));
    Ok(validate_tree("output", &scanner, registry, rules)?)
}

/// Deny-list only, over the authored source. The whitelist file itself is
/// skipped when it lives under the source tree.
fn scan_source(
    config: &SiteConfig,
    registry: &Registry,
    rules: &Rules,
) -> Result<Option<ValidationReport>> {
    let source = &config.paths.source;
    if !source.is_dir() {
        log!("warning"; "source directory `{}` not found, skipping deny-list scan", config.root_relative(source));
        return Ok(None);
    }

    let mut excludes = config.scan.exclude_regexes();
    if config.paths.whitelist.starts_with(source) {
        let rel = display_relative(&config.paths.whitelist, source);
        excludes.push(Regex::new(&format!("^{}$", regex::escape(&rel)))?);
    }

    let scanner = Scanner::new(source.clone(), &config.scan.source_extensions, excludes);
    debug!("validate"; "scanning {}", config.root_relative(source));
    Ok(Some(validate_tree("source", &scanner, registry, &rules.deny_list_only())?))
}

/// Turn the reports into an exit status.
fn finish(reports: &[ValidationReport], level: ValidateLevel, quiet: bool) -> Result<()> {
    let total: usize = reports.iter().map(ValidationReport::violation_count).sum();
    if total == 0 {
        return Ok(());
    }

    let dirty: Vec<&str> = reports
        .iter()
        .filter(|r| !r.is_clean())
        .map(|r| r.scope.as_str())
        .collect();
    let message = format!(
        "found {} in {}",
        plural_count(total, "violation"),
        dirty.join(" and ")
    );

    match level {
        ValidateLevel::Error => bail!(message),
        ValidateLevel::Warn => {
            if !quiet {
                log!("warning"; "{message} (level = warn, not failing)");
            }
            Ok(())
        }
    }
}
