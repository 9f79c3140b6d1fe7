//! Project configuration management for `geowarden.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── generate   # [generate]
//! │   ├── locale     # [locale]
//! │   ├── paths      # [paths]
//! │   ├── routes     # [routes]
//! │   ├── scan       # [scan]
//! │   ├── site       # [site]
//! │   └── validate   # [validate]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! The project root is the directory holding the config file. Every path in
//! `[paths]` is resolved against it once, so no component depends on the
//! process working directory afterwards.

pub mod section;
pub mod types;

pub use section::{
    GenerateConfig, LocaleConfig, PathsConfig, RoutesConfig, ScanConfig, SiteInfoConfig,
    ValidateConfig, ValidateLevel,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{CheckArgs, Cli, Commands, ValidateArgs},
    log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config filename
pub const CONFIG_FILE: &str = "geowarden.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing geowarden.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site information
    pub site: SiteInfoConfig,

    /// Inputs and outputs
    pub paths: PathsConfig,

    /// Generated page and manifest shape
    pub generate: GenerateConfig,

    /// Route prefixes and redirect policy
    pub routes: RoutesConfig,

    /// Tree scan settings
    pub scan: ScanConfig,

    /// Locale indicator
    pub locale: LocaleConfig,

    /// Validation settings
    pub validate: ValidateConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// With `--root`, the config is read from that directory. Otherwise the
    /// config file is searched upward from the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        if !cli.is_init() && !exists {
            bail!(ConfigError::Validation(format!(
                "config file `{}` not found, run `geowarden init` to create one",
                cli.config.display()
            )));
        }

        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;
        config.finalize(&root);
        config.apply_command_options(cli);

        if !cli.is_init() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Resolve config file path based on `--root` and the current directory.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        if let Some(root) = &cli.root {
            let root = crate::utils::path::resolve_under(Path::new(""), root);
            let path = crate::utils::path::normalize_path(&root).join(&cli.config);
            let exists = path.exists();
            return Ok((path, exists));
        }

        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        if cli.is_init() {
            let path = cwd.join(&cli.config);
            let exists = path.exists();
            return Ok((path, exists));
        }

        match find_config_file(&cwd, &cli.config) {
            Some(path) => Ok((path, true)),
            None => Ok((cwd.join(&cli.config), false)),
        }
    }

    /// Set the root and resolve all configured paths against it.
    fn finalize(&mut self, root: &Path) {
        let root = crate::utils::path::normalize_path(root);
        self.paths.resolve(&root);
        self.config_path = crate::utils::path::normalize_path(&self.config_path);
        self.set_root(&root);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let (config, ignored) = read_toml_with_ignored::<Self>(path)?;
        if !ignored.is_empty() {
            print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    #[cfg(test)]
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        Ok(parse_toml_with_ignored(content)?)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Get path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> String {
        crate::utils::path::display_relative(path.as_ref(), &self.root)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        match &cli.command {
            Commands::Validate { args } => self.apply_validate_args(args),
            Commands::Check { args } => self.apply_check_args(args),
            Commands::Init { .. } | Commands::Generate { .. } | Commands::Routes { .. } => {}
        }
    }

    /// Apply validate arguments from CLI.
    fn apply_validate_args(&mut self, args: &ValidateArgs) {
        if args.output_only {
            self.validate.source = false;
        }
        if args.warn_only {
            self.validate.level = ValidateLevel::Warn;
        }
    }

    /// Apply check arguments from CLI.
    fn apply_check_args(&mut self, args: &CheckArgs) {
        Self::update_option(&mut self.validate.redirects, args.redirects.as_ref());
        Self::update_option(&mut self.validate.sitemap, args.sitemap.as_ref());
        if args.warn_only {
            self.validate.level = ValidateLevel::Warn;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new(CONFIG_FILE);

        self.site.validate(&mut diag);
        self.generate.validate(&mut diag);
        self.routes.validate(&mut diag);
        self.scan.validate(&mut diag);
        self.locale.validate(&mut diag);

        diag.finish().map_err(Into::into)
    }
}

// ============================================================================
// TOML helpers (shared with the registry and geo dataset loaders)
// ============================================================================

/// Parse TOML content, collecting unknown field paths instead of failing.
pub fn parse_toml_with_ignored<T: DeserializeOwned>(
    content: &str,
) -> Result<(T, Vec<String>), toml::de::Error> {
    let mut ignored = Vec::new();
    let deserializer = toml::Deserializer::new(content);
    let value = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
        ignored.push(path.to_string());
    })?;
    Ok((value, ignored))
}

/// Read and parse a TOML file, mapping failures to [`ConfigError`].
pub fn read_toml_with_ignored<T: DeserializeOwned>(
    path: &Path,
) -> Result<(T, Vec<String>), ConfigError> {
    let content =
        fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
    parse_toml_with_ignored(&content).map_err(|err| ConfigError::Parse(path.to_path_buf(), err))
}

/// Print warning about unknown fields.
pub fn print_unknown_fields_warning(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "unknown fields in {} (ignored):", display_path);
    for field in fields {
        eprintln!("- {}", field);
    }
}

/// Find config file by searching upward from `start`.
///
/// ```text
/// /home/user/site/src/pages/   ← cwd
/// /home/user/site/geowarden.toml ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
