//! Expansion of the hub and neighborhood dataset into routes and page files.
//!
//! Generation is pure: it returns a [`Generation`] value and never touches
//! the filesystem. Materialization lives in [`super::write`].

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::naming::{hub_component, neighborhood_component, service_area_component, static_component};
use super::route::{RouteEntry, RouteKind, RoutePath, RouteSet};
use super::GeoArea;
use crate::config::{GenerateConfig, RoutesConfig};
use crate::registry::is_slug;

/// Header written at the top of every generated artifact.
pub const GENERATED_HEADER: &str = "// Generated by geowarden from the geo dataset. Do not edit.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("component name `{name}` is produced by both `{first}` and `{second}`")]
    NamingCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("route `{path}` is declared twice (`{first}` and `{second}`)")]
    DuplicateRoute {
        path: String,
        first: String,
        second: String,
    },

    #[error("invalid slug `{slug}` in {owner}")]
    InvalidSlug { owner: String, slug: String },

    #[error("neighborhood route `{path}` has no hub route")]
    OrphanNeighborhood { path: String },
}

/// Inputs of a generation run besides the dataset.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions<'a> {
    pub routes: &'a RoutesConfig,
    pub generate: &'a GenerateConfig,
    /// Whitelisted service-area slugs, in registry order.
    pub service_areas: &'a [String],
}

/// A generated page wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name inside the pages directory (`HubAustin.tsx`).
    pub file_name: String,
    pub component: String,
    pub contents: String,
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct Generation {
    pub routes: RouteSet,
    pub files: Vec<GeneratedFile>,
}

/// Expand `hubs` into the full route set and one page file per hub and neighborhood.
///
/// Output depends only on the inputs: same dataset, same bytes.
pub fn generate(hubs: &[GeoArea], options: GenerateOptions<'_>) -> Result<Generation, GenerateError> {
    let mut builder = Builder::default();

    for raw in &options.routes.static_routes {
        let path = RoutePath::new(raw);
        let component = static_component(path.as_str());
        builder.push(path, RouteKind::Static, component)?;
    }

    let prefix = RoutePath::new(&options.routes.prefix);
    for hub in hubs {
        if !is_slug(&hub.slug) {
            return Err(GenerateError::InvalidSlug {
                owner: format!("hub `{}`", hub.name),
                slug: hub.slug.clone(),
            });
        }
        let hub_path = prefix.join(&hub.slug);
        let component = hub_component(&hub.slug);
        builder.push(hub_path.clone(), RouteKind::Hub, component.clone())?;
        builder.files.push(render_wrapper(
            &component,
            options.generate,
            &hub.slug,
            None,
        ));

        for nb in &hub.neighborhoods {
            if !is_slug(&nb.slug) {
                return Err(GenerateError::InvalidSlug {
                    owner: format!("neighborhood `{}` of hub `{}`", nb.name, hub.slug),
                    slug: nb.slug.clone(),
                });
            }
            let component = neighborhood_component(&hub.slug, &nb.slug);
            builder.push(hub_path.join(&nb.slug), RouteKind::Neighborhood, component.clone())?;
            builder.files.push(render_wrapper(
                &component,
                options.generate,
                &hub.slug,
                Some(&nb.slug),
            ));
        }
    }

    let sa_prefix = RoutePath::new(&options.routes.service_area_prefix);
    for slug in options.service_areas {
        builder.push(
            sa_prefix.join(slug),
            RouteKind::ServiceArea,
            service_area_component(slug),
        )?;
    }

    if let Some(orphan) = builder.routes.orphans().first() {
        return Err(GenerateError::OrphanNeighborhood {
            path: orphan.path.to_string(),
        });
    }

    for file in &mut builder.files {
        file.file_name = format!("{}.{}", file.component, options.generate.extension);
    }

    Ok(Generation {
        routes: builder.routes,
        files: builder.files,
    })
}

#[derive(Default)]
struct Builder {
    routes: RouteSet,
    files: Vec<GeneratedFile>,
    /// Component name -> route path that claimed it first.
    names: FxHashMap<String, RoutePath>,
}

impl Builder {
    fn push(&mut self, path: RoutePath, kind: RouteKind, component: String) -> Result<(), GenerateError> {
        if let Some(first) = self.names.get(&component) {
            if *first == path {
                return Err(GenerateError::DuplicateRoute {
                    path: path.to_string(),
                    first: component.clone(),
                    second: component,
                });
            }
            return Err(GenerateError::NamingCollision {
                name: component,
                first: first.to_string(),
                second: path.to_string(),
            });
        }

        let entry = RouteEntry {
            path: path.clone(),
            kind,
            component: component.clone(),
        };
        if let Err(existing) = self.routes.insert(entry) {
            return Err(GenerateError::DuplicateRoute {
                path: path.to_string(),
                first: existing.component.clone(),
                second: component,
            });
        }
        self.names.insert(component, path);
        Ok(())
    }
}

/// Thin wrapper binding one route to the shared page component.
fn render_wrapper(
    component: &str,
    config: &GenerateConfig,
    hub_slug: &str,
    neighborhood_slug: Option<&str>,
) -> GeneratedFile {
    let page = &config.page_component;
    let props = match neighborhood_slug {
        Some(nb) => format!("hubSlug=\"{hub_slug}\" neighborhoodSlug=\"{nb}\""),
        None => format!("hubSlug=\"{hub_slug}\""),
    };
    let contents = format!(
        "{GENERATED_HEADER}\n\
         import {page} from \"{import}\";\n\
         \n\
         export default function {component}() {{\n  return <{page} {props} />;\n}}\n",
        import = config.page_import,
    );
    GeneratedFile {
        file_name: String::new(),
        component: component.to_string(),
        contents,
    }
}

/// Render the route manifest: one import and one route declaration per generated page.
pub fn render_manifest(generation: &Generation, config: &GenerateConfig) -> String {
    let mut out = String::with_capacity(256 + generation.files.len() * 128);
    out.push_str(GENERATED_HEADER);
    out.push('\n');

    let prefix = config.import_prefix.trim_end_matches('/');
    for file in &generation.files {
        out.push_str(&format!(
            "import {name} from \"{prefix}/{name}\";\n",
            name = file.component
        ));
    }

    out.push_str("\nexport const geoRoutes = [\n");
    for entry in generation
        .routes
        .iter()
        .filter(|e| matches!(e.kind, RouteKind::Hub | RouteKind::Neighborhood))
    {
        out.push_str(&format!(
            "  {{ path: \"{}\", component: {} }},\n",
            entry.path, entry.component
        ));
    }
    out.push_str("];\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::geo::Neighborhood;

    fn hub(slug: &str, neighborhoods: &[&str]) -> GeoArea {
        GeoArea {
            name: slug.to_string(),
            slug: slug.to_string(),
            neighborhoods: neighborhoods
                .iter()
                .map(|nb| Neighborhood {
                    name: nb.to_string(),
                    slug: nb.to_string(),
                })
                .collect(),
        }
    }

    fn run(hubs: &[GeoArea], service_areas: &[String]) -> Result<Generation, GenerateError> {
        let config = SiteConfig::default();
        generate(
            hubs,
            GenerateOptions {
                routes: &config.routes,
                generate: &config.generate,
                service_areas,
            },
        )
    }

    #[test]
    fn test_steiner_ranch_scenario() {
        let hubs = [hub("steiner-ranch-78732", &["rob-roy"])];
        let generation = run(&hubs, &[]).unwrap();

        let hub_route = generation.routes.get("/areas/steiner-ranch-78732").unwrap();
        assert_eq!(hub_route.kind, RouteKind::Hub);
        assert_eq!(hub_route.component, "HubSteinerRanch78732");

        let nb_route = generation
            .routes
            .get("/areas/steiner-ranch-78732/rob-roy")
            .unwrap();
        assert_eq!(nb_route.component, "NeighborhoodSteinerRanch78732RobRoy");

        let names: Vec<_> = generation.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            names,
            ["HubSteinerRanch78732.tsx", "NeighborhoodSteinerRanch78732RobRoy.tsx"]
        );
        assert!(generation.files[1]
            .contents
            .contains("hubSlug=\"steiner-ranch-78732\" neighborhoodSlug=\"rob-roy\""));

        let manifest = render_manifest(&generation, &SiteConfig::default().generate);
        assert!(manifest.contains(
            "import HubSteinerRanch78732 from \"@/pages/areas/HubSteinerRanch78732\";"
        ));
        assert!(manifest.contains(
            "{ path: \"/areas/steiner-ranch-78732/rob-roy\", component: NeighborhoodSteinerRanch78732RobRoy }"
        ));
        assert!(!manifest.contains("PageIndex"));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let hubs = [hub("austin", &["zilker", "hyde-park"]), hub("round-rock", &[])];
        let sa = ["austin".to_string()];
        let a = run(&hubs, &sa).unwrap();
        let b = run(&hubs, &sa).unwrap();
        assert_eq!(a.files, b.files);
        assert!(a.routes.iter().eq(b.routes.iter()));

        let config = SiteConfig::default().generate;
        assert_eq!(render_manifest(&a, &config), render_manifest(&b, &config));
    }

    #[test]
    fn test_route_set_contents() {
        let hubs = [hub("austin", &["zilker"])];
        let generation = run(&hubs, &["round-rock".to_string()]).unwrap();
        let routes = &generation.routes;

        assert!(routes.contains("/"));
        assert_eq!(routes.get("/").unwrap().component, "PageIndex");
        assert!(routes.contains("/areas/austin/zilker"));
        assert_eq!(
            routes.get("/service-areas/round-rock").unwrap().component,
            "ServiceAreaRoundRock"
        );
        assert_eq!(
            routes.len(),
            SiteConfig::default().routes.static_routes.len() + 3
        );
    }

    #[test]
    fn test_shipped_style_dataset_is_collision_free() {
        let hubs = [
            hub("steiner-ranch-78732", &["rob-roy", "river-place"]),
            hub("davenport-ranch", &["west"]),
            hub("davenport-ranch-west", &[]),
        ];
        let generation = run(&hubs, &[]).unwrap();
        let mut names: Vec<_> = generation.routes.iter().map(|r| r.component.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_neighborhood_naming_collision() {
        let hubs = [hub("a", &["b-c"]), hub("a-b", &["c"])];
        let err = run(&hubs, &[]).unwrap_err();
        assert_eq!(
            err,
            GenerateError::NamingCollision {
                name: "NeighborhoodABC".into(),
                first: "/areas/a/b-c".into(),
                second: "/areas/a-b/c".into(),
            }
        );
    }

    #[test]
    fn test_static_naming_collision() {
        let mut config = SiteConfig::default();
        config.routes.static_routes = vec!["/a-b".into(), "/a_b".into()];
        let err = generate(
            &[],
            GenerateOptions {
                routes: &config.routes,
                generate: &config.generate,
                service_areas: &[],
            },
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::NamingCollision { ref name, .. } if name == "PageAB"));
    }

    #[test]
    fn test_duplicate_hub_route() {
        let hubs = [hub("austin", &[]), hub("austin", &[])];
        let err = run(&hubs, &[]).unwrap_err();
        assert!(matches!(err, GenerateError::DuplicateRoute { ref path, .. } if path == "/areas/austin"));
    }

    #[test]
    fn test_invalid_slug() {
        let err = run(&[hub("Austin", &[])], &[]).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidSlug { ref slug, .. } if slug == "Austin"));

        let err = run(&[hub("austin", &["a_b"])], &[]).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidSlug { ref slug, .. } if slug == "a_b"));
    }

    #[test]
    fn test_same_neighborhood_slug_under_different_hubs() {
        let hubs = [hub("austin", &["downtown"]), hub("round-rock", &["downtown"])];
        let generation = run(&hubs, &[]).unwrap();
        assert!(generation.routes.contains("/areas/austin/downtown"));
        assert!(generation.routes.contains("/areas/round-rock/downtown"));
    }
}
