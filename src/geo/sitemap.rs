//! Sitemap rendering.
//!
//! Renders the route set as a sitemap.xml listing every route.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/areas/austin</loc>
//!   </url>
//! </urlset>
//! ```
//!
//! No `<lastmod>` is written, so the output only changes with the route set.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::borrow::Cow;

use super::route::RouteSet;

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Characters encoded inside a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

struct Sitemap {
    urls: Vec<String>,
}

impl Sitemap {
    fn build(routes: &RouteSet, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let urls = routes
            .iter()
            .map(|entry| {
                let encoded = utf8_percent_encode(entry.path.as_str(), SEGMENT);
                format!("{base_url}{encoded}")
            })
            .collect();
        Self { urls }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(128 + self.urls.len() * 64);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for loc in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&loc));
            xml.push_str("</loc>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Render `routes` as sitemap XML with absolute `<loc>` entries under `base_url`.
pub fn render_sitemap(routes: &RouteSet, base_url: &str) -> String {
    Sitemap::build(routes, base_url).into_xml()
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
