//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Geo page generator and location whitelist guard
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Project root (the config file is read from this directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Config file name (default: geowarden.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "geowarden.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a commented geowarden.toml template
    #[command(visible_alias = "i")]
    Init {
        /// Print the template to stdout instead of writing it
        #[arg(long)]
        dry: bool,
    },

    /// Generate geo page wrappers and the route manifest
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Scan build output and source for unlisted or disallowed locations
    #[command(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },

    /// Check redirects, sitemap and router against the route set
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },

    /// Print the full route set as JSON
    #[command(visible_alias = "r")]
    Routes {
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

/// Generate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Compare with files on disk without writing; fail if anything is stale
    #[arg(long)]
    pub check: bool,

    /// Remove generated pages the dataset no longer produces
    #[arg(long)]
    pub clean: bool,

    /// Also write sitemap.xml from the route set
    #[arg(short = 'S', long)]
    pub sitemap: bool,
}

/// Validate command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Only scan the build output
    #[arg(long, conflicts_with = "source_only")]
    pub output_only: bool,

    /// Only scan authored source for deny-list terms
    #[arg(long)]
    pub source_only: bool,

    /// Treat violations as warnings instead of errors
    #[arg(long, short = 'w')]
    pub warn_only: bool,

    /// Print reports as JSON to stdout
    #[arg(long)]
    pub json: bool,
}

/// Check command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Treat findings as warnings instead of errors
    #[arg(long, short = 'w')]
    pub warn_only: bool,

    /// Check the redirects file
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub redirects: Option<bool>,

    /// Check the sitemap
    #[arg(short = 'S', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_options() {
        let cli = Cli::try_parse_from(["geowarden", "validate", "-w", "--root", "site", "-v"])
            .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("site")));
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("geowarden.toml"));
        match cli.command {
            Commands::Validate { args } => assert!(args.warn_only && !args.json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_toggles() {
        let cli = Cli::try_parse_from(["geowarden", "check", "--sitemap", "false", "--redirects"])
            .unwrap();
        match cli.command {
            Commands::Check { args } => {
                assert_eq!(args.sitemap, Some(false));
                assert_eq!(args.redirects, Some(true));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_output_and_source_only_conflict() {
        let result =
            Cli::try_parse_from(["geowarden", "validate", "--output-only", "--source-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::try_parse_from(["geowarden", "g", "--check"]).unwrap();
        assert!(matches!(cli.command, Commands::Generate { args } if args.check));
        assert!(Cli::try_parse_from(["geowarden", "i", "--dry"]).unwrap().is_init());
    }
}
