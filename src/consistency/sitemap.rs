//! Sitemap parsing and checks.

use quick_xml::Reader;
use quick_xml::events::Event;
use rustc_hash::FxHashSet;

use crate::config::RoutesConfig;
use crate::geo::{RoutePath, RouteSet};

use super::report::ConsistencyReport;

/// One `<loc>` inside a `<url>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// 1-based position among `<url>` entries.
    pub index: usize,
    pub loc: String,
}

/// Extract every `<loc>` that is a direct child of `<url>`. Extension
/// elements such as `<image:image><image:loc>` are skipped.
/// Returns a message on malformed XML.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapEntry>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut url_count = 0usize;
    // depth of the open `<url>` element
    let mut url_depth: Option<usize> = None;
    let mut loc: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"url" if url_depth.is_none() => {
                        url_depth = Some(depth);
                        url_count += 1;
                    }
                    b"loc" if url_depth.is_some_and(|d| d + 1 == depth) => {
                        loc = Some(String::new());
                    }
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                match e.local_name().as_ref() {
                    b"url" if url_depth == Some(depth) => url_depth = None,
                    b"loc" if url_depth.is_some_and(|d| d + 1 == depth) => {
                        if let Some(value) = loc.take() {
                            entries.push(SitemapEntry {
                                index: url_count,
                                loc: value.trim().to_string(),
                            });
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(text)) => {
                if let Some(value) = loc.as_mut() {
                    value.push_str(&utf8(&text, &reader)?);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(value) = loc.as_mut() {
                    value.push_str(&utf8(&data, &reader)?);
                }
            }
            Ok(Event::GeneralRef(reference)) => {
                if let Some(value) = loc.as_mut() {
                    let name = utf8(&reference, &reader)?;
                    let entity = format!("&{name};");
                    let resolved = quick_xml::escape::unescape(&entity).map_err(|e| {
                        format!("at position {}: {e}", reader.buffer_position())
                    })?;
                    value.push_str(&resolved);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("at position {}: {e}", reader.error_position())),
            _ => {}
        }
    }

    if depth != 0 {
        return Err("unexpected end of document (unclosed element)".to_string());
    }
    Ok(entries)
}

fn utf8<'b>(bytes: &'b [u8], reader: &Reader<&[u8]>) -> Result<&'b str, String> {
    std::str::from_utf8(bytes)
        .map_err(|e| format!("at position {}: {e}", reader.buffer_position()))
}

/// Check sitemap entries against the route set.
///
/// `host` is the configured site host; entries on other hosts are warnings.
pub fn check_sitemap(
    entries: &[SitemapEntry],
    routes: &RouteSet,
    policy: &RoutesConfig,
    host: Option<&str>,
    report: &mut ConsistencyReport,
) {
    let mut seen: FxHashSet<RoutePath> = FxHashSet::default();

    for entry in entries {
        let at = Some(entry.index);
        let path = match url::Url::parse(&entry.loc) {
            Ok(url) => {
                if let Some(expected) = host
                    && url.host_str() != Some(expected)
                {
                    report.warn(
                        at,
                        format!("`{}` is not on the configured host `{expected}`", entry.loc),
                    );
                }
                RoutePath::from_url(&url)
            }
            Err(_) => {
                report.warn(at, format!("`{}` is not an absolute URL", entry.loc));
                RoutePath::new(&entry.loc)
            }
        };

        if !seen.insert(path.clone()) {
            report.warn(at, format!("duplicate entry for `{path}`"));
            continue;
        }

        let exempt = policy
            .exempt_prefixes
            .iter()
            .any(|prefix| path.is_under(prefix) && path.as_str() != prefix.trim_end_matches('/'));
        if exempt || routes.contains(path.as_str()) {
            continue;
        }

        report.error(at, format!("`{}` does not match any route", entry.loc));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::geo::route::{RouteEntry, RouteKind};

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc></url>
  <url>
    <loc>
      https://example.com/areas/austin/
    </loc>
    <lastmod>2025-01-01</lastmod>
  </url>
  <url><loc><![CDATA[https://example.com/blog/first-post]]></loc></url>
  <url><loc>https://example.com/areas/ghost-town</loc></url>
  <url><loc>https://example.com/areas/austin</loc></url>
  <url><loc>https://staging.example.com/about?x=1&amp;y=2</loc></url>
</urlset>
"#;

    fn routes() -> RouteSet {
        let mut set = RouteSet::default();
        for path in ["/", "/about", "/blog", "/areas/austin"] {
            set.insert(RouteEntry {
                path: RoutePath::new(path),
                kind: RouteKind::Static,
                component: String::new(),
            })
            .unwrap();
        }
        set
    }

    fn check(xml: &str) -> ConsistencyReport {
        let config = SiteConfig::default();
        let mut report = ConsistencyReport::new("sitemap.xml");
        let entries = parse_sitemap(xml).unwrap();
        check_sitemap(&entries, &routes(), &config.routes, Some("example.com"), &mut report);
        report
    }

    #[test]
    fn test_parse_entries() {
        let entries = parse_sitemap(SITEMAP).unwrap();
        let locs: Vec<_> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            [
                "https://example.com/",
                "https://example.com/areas/austin/",
                "https://example.com/blog/first-post",
                "https://example.com/areas/ghost-town",
                "https://example.com/areas/austin",
                "https://staging.example.com/about?x=1&y=2",
            ]
        );
        assert_eq!(entries[3].index, 4);
    }

    #[test]
    fn test_check_findings() {
        let report = check(SITEMAP);

        let errors: Vec<_> = report.errors.iter().map(|f| f.line).collect();
        assert_eq!(errors, [Some(4)]);
        assert!(report.errors[0].message.contains("ghost-town"));

        let warnings: Vec<_> = report.warnings.iter().map(|f| f.line).collect();
        assert_eq!(warnings, [Some(5), Some(6)]);
        assert!(report.warnings[0].message.contains("duplicate"));
        assert!(report.warnings[1].message.contains("staging.example.com"));
    }

    #[test]
    fn test_blog_index_is_not_exempt() {
        let mut set = routes();
        let xml = r#"<urlset><url><loc>https://example.com/blog</loc></url></urlset>"#;
        let entries = parse_sitemap(xml).unwrap();
        let config = SiteConfig::default();
        let mut report = ConsistencyReport::new("sitemap.xml");
        check_sitemap(&entries, &set, &config.routes, None, &mut report);
        assert!(!report.has_errors());

        set = RouteSet::default();
        let mut report = ConsistencyReport::new("sitemap.xml");
        check_sitemap(&entries, &set, &config.routes, None, &mut report);
        assert!(report.has_errors());
    }

    #[test]
    fn test_image_extension_locs_are_ignored() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url>
    <loc>https://example.com/about</loc>
    <image:image>
      <image:loc>https://example.com/img/kitchen.jpg</image:loc>
    </image:image>
  </url>
  <url>
    <image:image><image:loc>https://example.com/img/bath.jpg</image:loc></image:image>
    <loc>https://example.com/areas/austin</loc>
  </url>
</urlset>
"#;
        let entries = parse_sitemap(xml).unwrap();
        let found: Vec<_> = entries.iter().map(|e| (e.index, e.loc.as_str())).collect();
        assert_eq!(
            found,
            [(1, "https://example.com/about"), (2, "https://example.com/areas/austin")]
        );

        let report = check(xml);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_malformed_sitemap() {
        assert!(parse_sitemap("<urlset><url><loc>x</url></urlset>").is_err());
        assert!(parse_sitemap("<urlset><url><loc>x</loc></url>").is_err());
    }
}
