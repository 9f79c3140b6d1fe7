//! Project initialization.
//!
//! Writes a commented `geowarden.toml` whose values are the built-in defaults.

use anyhow::{Context, Result, bail};
use std::fs;

use crate::config::{
    GenerateConfig, LocaleConfig, PathsConfig, RoutesConfig, ScanConfig, SiteConfig,
    SiteInfoConfig, ValidateConfig,
};
use crate::log;

/// Generate geowarden.toml content with comments
pub fn generate_config_template() -> String {
    let sections = [
        SiteInfoConfig::template_with_header(),
        PathsConfig::template_with_header(),
        GenerateConfig::template_with_header(),
        RoutesConfig::template_with_header(),
        ScanConfig::template_with_header(),
        LocaleConfig::template_with_header(),
        ValidateConfig::template_with_header(),
    ];

    let mut out = format!(
        "# geowarden configuration file (v{})\n\n",
        env!("CARGO_PKG_VERSION")
    );
    out.push_str(&sections.join("\n\n"));
    out.push('\n');
    out
}

/// Write the config template into the project root.
///
/// With `dry`, the template is printed to stdout and nothing is written.
pub fn init_project(config: &SiteConfig, dry: bool) -> Result<()> {
    let template = generate_config_template();
    if dry {
        print!("{template}");
        return Ok(());
    }

    let path = &config.config_path;
    if path.exists() {
        bail!("`{}` already exists", path.display());
    }

    fs::create_dir_all(config.get_root())
        .with_context(|| format!("Failed to create '{}'", config.get_root().display()))?;
    fs::write(path, template)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_template_matches_defaults() {
        let parsed = test_parse_config(&generate_config_template());
        let defaults = SiteConfig::default();
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::to_value(&defaults).unwrap()
        );
    }

    #[test]
    fn test_template_has_every_section() {
        let template = generate_config_template();
        for section in [
            "[site]",
            "[paths]",
            "[generate]",
            "[routes]",
            "[scan]",
            "[locale]",
            "[validate]",
        ] {
            assert!(template.contains(section), "missing {section}");
        }
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.set_root(temp.path());
        config.config_path = temp.path().join("geowarden.toml");

        init_project(&config, false).unwrap();
        assert!(config.config_path.exists());
        assert!(init_project(&config, false).is_err());
    }
}
