//! Configuration section definitions for `geowarden.toml`.
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `[site]`     | Public site URL                                  |
//! | `[paths]`    | Project-relative inputs and outputs              |
//! | `[generate]` | Shape of generated page wrappers and manifest    |
//! | `[routes]`   | Route prefixes, static routes, redirect policy   |
//! | `[scan]`     | File extensions and exclude patterns             |
//! | `[locale]`   | Locale indicator for free-text location checks   |
//! | `[validate]` | Rule toggles and failure level                   |

mod generate;
mod locale;
mod paths;
mod routes;
mod scan;
mod site;
mod validate;

pub use generate::GenerateConfig;
pub use locale::LocaleConfig;
pub use paths::PathsConfig;
pub use routes::RoutesConfig;
pub use scan::ScanConfig;
pub use site::SiteInfoConfig;
pub use validate::{ValidateConfig, ValidateLevel};
