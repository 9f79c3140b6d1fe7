//! `routes` command: dump the full route set as JSON.

use anyhow::Result;

use super::common::load_generation;
use crate::config::SiteConfig;
use crate::geo::RouteSet;

pub fn print_routes(config: &SiteConfig, pretty: bool) -> Result<()> {
    let (_, generation) = load_generation(config)?;
    println!("{}", routes_json(&generation.routes, pretty)?);
    Ok(())
}

fn routes_json(routes: &RouteSet, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(routes)
    } else {
        serde_json::to_string(routes)
    }
}
