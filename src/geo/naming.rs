//! Component naming for generated routes.
//!
//! Names are a pure function of the route's path segments:
//!
//! | route                          | component                           |
//! |--------------------------------|-------------------------------------|
//! | `/areas/steiner-ranch-78732`   | `HubSteinerRanch78732`              |
//! | `/areas/steiner-ranch/rob-roy` | `NeighborhoodSteinerRanchRobRoy`    |
//! | `/free-estimate`               | `PageFreeEstimate`                  |
//! | `/`                            | `PageIndex`                         |
//! | `/service-areas/round-rock`    | `ServiceAreaRoundRock`              |
//!
//! Distinct slugs can still map to the same name (`a` + `b-c` and `a-b` + `c`),
//! so callers must check for collisions.

use deunicode::deunicode;

/// PascalCase an arbitrary string.
///
/// Input is transliterated to ASCII, split on every non-alphanumeric run,
/// and each token is title-cased.
pub fn pascal_case(input: &str) -> String {
    let ascii = deunicode(input);
    let mut out = String::with_capacity(ascii.len());
    for token in ascii
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        let mut chars = token.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    out
}

pub fn hub_component(hub_slug: &str) -> String {
    format!("Hub{}", pascal_case(hub_slug))
}

pub fn neighborhood_component(hub_slug: &str, neighborhood_slug: &str) -> String {
    format!(
        "Neighborhood{}{}",
        pascal_case(hub_slug),
        pascal_case(neighborhood_slug)
    )
}

pub fn static_component(path: &str) -> String {
    let name = pascal_case(path);
    if name.is_empty() {
        "PageIndex".to_string()
    } else {
        format!("Page{name}")
    }
}

pub fn service_area_component(slug: &str) -> String {
    format!("ServiceArea{}", pascal_case(slug))
}
