//! Redirects file parsing and checks.
//!
//! One rule per line in the `_redirects` format:
//!
//! ```text
//! # comment
//! /old-page        /about          301
//! /areas/x/        /areas/x        301!
//! /*               /index.html     200
//! ```
//!
//! Status defaults to 301; a trailing `!` forces the rule. Fields after the
//! status (conditions) are ignored.

use crate::config::RoutesConfig;
use crate::geo::{RoutePath, RouteSet};

use super::report::ConsistencyReport;

/// One parsed redirect rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub line: usize,
    pub from: String,
    pub to: String,
    pub status: u16,
    pub force: bool,
}

impl RedirectRule {
    /// Targets that are not site routes: external URLs (absolute or
    /// protocol-relative) and splat placeholders.
    fn target_is_exempt(&self) -> bool {
        url::Url::parse(&self.to).is_ok()
            || self.to.starts_with("//")
            || self.from.contains('*')
            || self.from.contains(":splat")
            || self.to.contains(":splat")
            || self.to.split('/').any(|seg| seg.starts_with(':'))
    }
}

/// Parse redirect rules. Malformed lines are recorded as errors in `report`.
pub fn parse_redirects(content: &str, report: &mut ConsistencyReport) -> Vec<RedirectRule> {
    let mut rules = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = text.split_whitespace().collect();
        let [from, to, rest @ ..] = fields.as_slice() else {
            report.error(
                Some(line),
                format!("malformed rule `{text}` (expected `from to [status]`)"),
            );
            continue;
        };

        let (status, force) = match rest.first() {
            None => (301, false),
            Some(field) => {
                let (code, force) = match field.strip_suffix('!') {
                    Some(code) => (code, true),
                    None => (*field, false),
                };
                match code.parse::<u16>() {
                    Ok(status) => (status, force),
                    Err(_) if field.contains('=') => (301, false),
                    Err(_) => {
                        report.error(Some(line), format!("invalid status `{field}`"));
                        continue;
                    }
                }
            }
        };

        rules.push(RedirectRule {
            line,
            from: from.to_string(),
            to: to.to_string(),
            status,
            force,
        });
    }
    rules
}

/// Check parsed rules against the route set and redirect policy.
pub fn check_redirects(
    rules: &[RedirectRule],
    routes: &RouteSet,
    policy: &RoutesConfig,
    report: &mut ConsistencyReport,
) {
    let canonical: Vec<RoutePath> = policy.canonical.iter().map(|p| RoutePath::new(p)).collect();

    for rule in rules {
        if is_fallback(rule, policy) {
            continue;
        }

        // `P/ -> P` on a canonical page
        if rule.from.len() > 1
            && rule.from.ends_with('/')
            && (300..400).contains(&rule.status)
            && !rule.target_is_exempt()
        {
            let from = RoutePath::new(&rule.from);
            let to = RoutePath::new(&rule.to);
            if from == to && canonical.contains(&to) {
                report.error(
                    Some(rule.line),
                    format!(
                        "trailing-slash redirect `{} -> {}` on canonical page `{to}`",
                        rule.from, rule.to
                    ),
                );
                continue;
            }
        }

        if rule.target_is_exempt() {
            continue;
        }

        let target = RoutePath::new(&rule.to);
        if routes.contains(target.as_str()) {
            continue;
        }

        let strict = policy
            .strict_prefixes
            .iter()
            .any(|prefix| target.is_under(prefix));
        let message = format!("target `{}` of `{}` is not a known route", rule.to, rule.from);
        if strict {
            report.error(Some(rule.line), message);
        } else {
            report.warn(Some(rule.line), message);
        }
    }

    check_fallback(rules, policy, report);
}

fn is_fallback(rule: &RedirectRule, policy: &RoutesConfig) -> bool {
    rule.from == policy.fallback_from
        && rule.to == policy.fallback_to
        && rule.status == policy.fallback_status
}

/// The SPA fallback must be the last active rule, otherwise it shadows what follows.
fn check_fallback(rules: &[RedirectRule], policy: &RoutesConfig, report: &mut ConsistencyReport) {
    let expected = format!(
        "{} {} {}",
        policy.fallback_from, policy.fallback_to, policy.fallback_status
    );

    let Some(last) = rules.last() else {
        report.error(None, format!("no active rules, expected `{expected}` as the last rule"));
        return;
    };

    if is_fallback(last, policy) {
        return;
    }

    match rules.iter().find(|r| is_fallback(r, policy)) {
        Some(fallback) => report.error(
            Some(fallback.line),
            format!(
                "fallback `{expected}` must be the last rule, it shadows rules through line {}",
                last.line
            ),
        ),
        None => report.error(None, format!("missing fallback rule `{expected}`")),
    }
}
