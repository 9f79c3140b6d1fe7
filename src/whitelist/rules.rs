//! Line classification rules.
//!
//! Every rule looks at one line in isolation. Within a line, findings are
//! emitted in rule order: free text, deny-list, service-area slugs, schema.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fmt;

use crate::config::{LocaleConfig, ValidateConfig};
use crate::registry::Registry;
use crate::scan::Line;

/// Bytes of context kept on each side of a match.
const EXCERPT_RADIUS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    UnlistedLocation,
    DisallowedTerm,
    InvalidServiceAreaSlug,
    SchemaCityNotWhitelisted,
}

impl ViolationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnlistedLocation => "UNLISTED_LOCATION",
            Self::DisallowedTerm => "DISALLOWED_TERM",
            Self::InvalidServiceAreaSlug => "INVALID_SERVICE_AREA_SLUG",
            Self::SchemaCityNotWhitelisted => "SCHEMA_CITY_NOT_WHITELISTED",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub file: String,
    pub line: usize,
    pub kind: ViolationKind,
    /// The offending term, slug or name (empty for free-text findings).
    pub detail: String,
    pub excerpt: String,
}

/// Compiled, registry-independent rules.
#[derive(Debug, Clone)]
pub struct Rules {
    pub free_text: bool,
    pub disallowed: bool,
    pub slugs: bool,
    pub schema: bool,
    indicator: Regex,
    slug: Regex,
    city_type: Regex,
    city_name: Regex,
}

impl Rules {
    pub fn new(
        locale: &LocaleConfig,
        service_area_prefix: &str,
        toggles: &ValidateConfig,
    ) -> Result<Self, regex::Error> {
        let prefix = regex::escape(service_area_prefix.trim_end_matches('/'));
        Ok(Self {
            free_text: toggles.free_text,
            disallowed: toggles.disallowed,
            slugs: toggles.slugs,
            schema: toggles.schema,
            indicator: Regex::new(&locale.indicator_pattern())?,
            // the prefix has to open a path, not continue another segment
            slug: Regex::new(&format!(
                r#"(?:^|[^\w-]|://[^/\s"'<>]+){prefix}/([A-Za-z0-9_-]+)"#
            ))?,
            city_type: Regex::new(r#"["']?@type["']?\s*:\s*["']City["']"#)?,
            city_name: Regex::new(r#"(?:^|[{,\s])["']?name["']?\s*:\s*["']([^"']*)["']"#)?,
        })
    }

    /// Same rules with everything but the deny-list turned off.
    pub fn deny_list_only(&self) -> Self {
        Self {
            free_text: false,
            disallowed: true,
            slugs: false,
            schema: false,
            ..self.clone()
        }
    }
}

/// Rules bound to a registry, ready to classify lines.
pub struct Matcher<'a> {
    rules: &'a Rules,
    registry: &'a Registry,
    /// Deny-list terms with case-insensitive patterns, in declaration order.
    terms: Vec<(&'a str, Regex)>,
}

impl<'a> Matcher<'a> {
    pub fn new(rules: &'a Rules, registry: &'a Registry) -> Result<Self, regex::Error> {
        let terms = if rules.disallowed {
            registry
                .disallowed()
                .iter()
                .map(|term| {
                    RegexBuilder::new(&regex::escape(term))
                        .case_insensitive(true)
                        .build()
                        .map(|re| (term, re))
                })
                .collect::<Result<_, _>>()?
        } else {
            Vec::new()
        };
        Ok(Self {
            rules,
            registry,
            terms,
        })
    }

    /// Classify one line, appending findings to `out`.
    pub fn check_line(&self, line: &Line<'_>, out: &mut Vec<Violation>) {
        let text = line.text;
        let mut push = |kind, detail: &str, start: usize, end: usize| {
            out.push(Violation {
                file: line.file.to_string(),
                line: line.number,
                kind,
                detail: detail.to_string(),
                excerpt: excerpt(text, start, end),
            });
        };

        if self.rules.free_text
            && let Some(m) = self.rules.indicator.find(text)
            && !self.registry.mentions_whitelisted(text)
        {
            push(ViolationKind::UnlistedLocation, "", m.start(), m.end());
        }

        for (term, re) in &self.terms {
            if let Some(m) = re.find(text) {
                push(ViolationKind::DisallowedTerm, *term, m.start(), m.end());
            }
        }

        if self.rules.slugs {
            let mut seen: Vec<&str> = Vec::new();
            for caps in self.rules.slug.captures_iter(text) {
                let (Some(whole), Some(slug)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let slug = slug.as_str();
                if self.registry.slugs().contains(slug) || seen.contains(&slug) {
                    continue;
                }
                seen.push(slug);
                push(ViolationKind::InvalidServiceAreaSlug, slug, whole.start(), whole.end());
            }
        }

        if self.rules.schema {
            let mut records: Vec<usize> = Vec::new();
            for m in self.rules.city_type.find_iter(text) {
                let (start, end) = enclosing_object(text, m.start());
                if records.contains(&start) {
                    continue;
                }
                records.push(start);
                let Some(name) = self.record_name(&text[start..end]) else {
                    continue;
                };
                if !self.registry.display_names().contains(name.as_str()) {
                    push(
                        ViolationKind::SchemaCityNotWhitelisted,
                        name.as_str(),
                        start + name.start(),
                        start + name.end(),
                    );
                }
            }
        }
    }

    /// First `name` value at the top level of a record (nested objects skipped).
    fn record_name<'t>(&self, record: &'t str) -> Option<regex::Match<'t>> {
        let top = usize::from(record.starts_with('{'));
        self.rules
            .city_name
            .captures_iter(record)
            .filter_map(|caps| caps.get(1))
            .find(|name| nesting(&record[..name.start()]) == top)
    }
}

/// Byte range of the innermost `{...}` around `at`, or the whole line when
/// the braces are not balanced on it.
fn enclosing_object(text: &str, at: usize) -> (usize, usize) {
    let bytes = text.as_bytes();

    let mut start = 0;
    let mut depth = 0usize;
    for (i, &b) in bytes[..at].iter().enumerate().rev() {
        match b {
            b'}' => depth += 1,
            b'{' if depth == 0 => {
                start = i;
                break;
            }
            b'{' => depth -= 1,
            _ => {}
        }
    }

    let mut end = text.len();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(at) {
        match b {
            b'{' => depth += 1,
            b'}' if depth == 0 => {
                end = i + 1;
                break;
            }
            b'}' => depth -= 1,
            _ => {}
        }
    }
    (start, end)
}

/// Open braces minus closed braces.
fn nesting(text: &str) -> usize {
    text.bytes()
        .fold(0isize, |depth, b| match b {
            b'{' => depth + 1,
            b'}' => depth - 1,
            _ => depth,
        })
        .max(0) as usize
}

/// Bounded window of `text` around `start..end`, cut on char boundaries.
pub fn excerpt(text: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(EXCERPT_RADIUS);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + EXCERPT_RADIUS).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }

    let mut out = String::with_capacity(to - from + 6);
    if from > 0 {
        out.push_str("...");
    }
    out.push_str(text[from..to].trim());
    if to < text.len() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::registry::test_registry;

    fn rules() -> Rules {
        let config = SiteConfig::default();
        Rules::new(
            &config.locale,
            &config.routes.service_area_prefix,
            &config.validate,
        )
        .unwrap()
    }

    fn check(text: &str) -> Vec<Violation> {
        check_with(&rules(), text)
    }

    fn check_with(rules: &Rules, text: &str) -> Vec<Violation> {
        let registry = test_registry();
        let matcher = Matcher::new(rules, &registry).unwrap();
        let mut out = Vec::new();
        matcher.check_line(
            &Line {
                file: "index.html",
                number: 7,
                text,
            },
            &mut out,
        );
        out
    }

    fn kinds(violations: &[Violation]) -> Vec<ViolationKind> {
        violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_whitelisted_location_passes() {
        assert!(check("Proudly serving Austin, TX since 1998").is_empty());
        assert!(check("Visit us: Steiner Ranch, Austin, TX 78732").is_empty());
        assert!(check("Round Rock, TX, USA").is_empty());
    }

    #[test]
    fn test_unlisted_location_flagged() {
        let found = check("Now serving Pflugerville, TX");
        assert_eq!(kinds(&found), [ViolationKind::UnlistedLocation]);
        assert_eq!(found[0].file, "index.html");
        assert_eq!(found[0].line, 7);

        let found = check("Mailing zip 78660 only");
        assert_eq!(kinds(&found), [ViolationKind::UnlistedLocation]);
    }

    #[test]
    fn test_line_without_indicator_passes() {
        assert!(check("Interior painting done right").is_empty());
        assert!(check("Call 512-555-0100").is_empty());
    }

    #[test]
    fn test_disallowed_term_beats_whitelist() {
        let found = check("Austin, TX and nearby cedar PARK homes");
        assert_eq!(kinds(&found), [ViolationKind::DisallowedTerm]);
        assert_eq!(found[0].detail, "Cedar Park");
        assert!(found[0].excerpt.contains("cedar PARK"));
    }

    #[test]
    fn test_disallowed_one_per_distinct_term() {
        let found = check("Cedar Park, Leander and Cedar Park again");
        let terms: Vec<_> = found
            .iter()
            .filter(|v| v.kind == ViolationKind::DisallowedTerm)
            .map(|v| v.detail.as_str())
            .collect();
        assert_eq!(terms, ["Cedar Park", "Leander"]);
    }

    #[test]
    fn test_free_text_precedes_deny_list() {
        let found = check("Leander, TX");
        assert_eq!(
            kinds(&found),
            [ViolationKind::UnlistedLocation, ViolationKind::DisallowedTerm]
        );
    }

    #[test]
    fn test_service_area_slugs() {
        assert!(check(r#"<a href="/service-areas/austin">Austin</a>"#).is_empty());

        let found = check(
            r#"<a href="/service-areas/cedar-park">x</a><a href="/service-areas/cedar-park/">y</a>"#,
        );
        let slugs: Vec<_> = found
            .iter()
            .filter(|v| v.kind == ViolationKind::InvalidServiceAreaSlug)
            .map(|v| v.detail.as_str())
            .collect();
        assert_eq!(slugs, ["cedar-park"]);
        assert!(check("see /service-areas for details").is_empty());
    }

    #[test]
    fn test_slug_ends_at_punctuation() {
        assert!(check("See /service-areas/austin.").is_empty());
        assert!(check("links: /service-areas/austin, /service-areas/round-rock;").is_empty());
        assert!(check(r#"{&quot;href&quot;:&quot;/service-areas/austin&quot;}"#).is_empty());
        assert!(check("(/service-areas/steiner-ranch) or https://example.com/service-areas/austin").is_empty());

        let found = check("See /service-areas/hutto.");
        assert_eq!(kinds(&found), [ViolationKind::InvalidServiceAreaSlug]);
        assert_eq!(found[0].detail, "hutto");

        let found = check(r#"<a href="https://example.com/service-areas/hutto?x=1">"#);
        assert_eq!(found[0].detail, "hutto");
    }

    #[test]
    fn test_slug_prefix_must_start_a_path() {
        assert!(check("/old-service-areas/hutto").is_empty());
        assert!(check("/blog/service-areas/hutto").is_empty());
        assert!(check("https://example.com/blog/service-areas/hutto").is_empty());
    }

    #[test]
    fn test_schema_city_records() {
        assert!(check(r#"{"@type": "City", "name": "Austin"}"#).is_empty());

        let found = check(r#"areaServed:[{"@type":"City",name:"Georgetown"}]"#);
        assert_eq!(kinds(&found), [ViolationKind::SchemaCityNotWhitelisted]);
        assert_eq!(found[0].detail, "Georgetown");

        let found = check(r#"{'@type': 'City', 'name': 'Hutto'}"#);
        assert_eq!(found[0].detail, "Hutto");
    }

    #[test]
    fn test_schema_city_key_order() {
        let found = check(r##"{"@type":"City","@id":"#georgetown","name":"Georgetown"}"##);
        assert_eq!(kinds(&found), [ViolationKind::SchemaCityNotWhitelisted]);
        assert_eq!(found[0].detail, "Georgetown");

        let found = check(r#"{"name":"Georgetown","@type":"City"}"#);
        assert_eq!(kinds(&found), [ViolationKind::SchemaCityNotWhitelisted]);
        assert_eq!(found[0].detail, "Georgetown");

        assert!(check(r#"{"name": "Austin", "url": "/", "@type": "City"}"#).is_empty());
    }

    #[test]
    fn test_schema_city_nested_records() {
        let line = r#"{"@type":"HousePainter","name":"Acme","areaServed":[{"@type":"City","name":"Austin"},{"@type":"City","name":"Hutto"}]}"#;
        let found = check(line);
        assert_eq!(kinds(&found), [ViolationKind::SchemaCityNotWhitelisted]);
        assert_eq!(found[0].detail, "Hutto");

        let line = r#"{"@type":"City","containedInPlace":{"@type":"State","name":"Texas"},"name":"Round Rock"}"#;
        assert!(check(line).is_empty());
    }

    #[test]
    fn test_full_addresses_pass() {
        let registry = test_registry();
        assert!(!registry.full_addresses().is_empty());
        for addr in registry.full_addresses().iter() {
            assert!(check(&format!("\"{addr}\"")).is_empty(), "{addr}");
            assert!(check(addr).is_empty(), "{addr}");
        }
    }

    #[test]
    fn test_deny_list_only() {
        let rules = rules().deny_list_only();
        assert!(check_with(&rules, "Pflugerville, TX /service-areas/nowhere").is_empty());
        assert_eq!(
            kinds(&check_with(&rules, "leander")),
            [ViolationKind::DisallowedTerm]
        );
    }

    #[test]
    fn test_excerpt_bounded_and_utf8_safe() {
        let long = format!("{}Pflugerville, TX{}", "é".repeat(200), "ü".repeat(200));
        let start = long.find("Pflugerville").unwrap();
        let ex = excerpt(&long, start, start + 16);
        assert!(ex.starts_with("..."));
        assert!(ex.ends_with("..."));
        assert!(ex.contains("Pflugerville, TX"));
        assert!(ex.len() <= 16 + 2 * EXCERPT_RADIUS + 8);

        assert_eq!(excerpt("  short line ", 2, 7), "short line");
    }
}
