use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_ARCH, DEFAULT_BASE_URL};
use crate::installers::FetcherKind;

/// Go version switcher - Manage installed Go toolchains
///
/// Versions live under a root directory laid out as
/// `<root>/<version>/<arch>/`. Switching rewrites the GOROOT, GOPATH and
/// PATH exports in your shell profile; start a new login shell afterwards.
#[derive(Parser, Debug)]
#[command(name = "go-switcher", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding installed versions [default: /usr/local/bin/go-switcher]
    #[arg(long, global = true, value_name = "DIR", env = "GO_SWITCHER_ROOT")]
    pub root: Option<PathBuf>,

    /// Shell profile to rewrite on switch [default: ~/.profile]
    #[arg(long, global = true, value_name = "FILE", env = "GO_SWITCHER_PROFILE")]
    pub profile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List downloaded Go versions
    #[command(visible_alias = "ls")]
    List,

    /// Download a Go version from the official source
    Download {
        /// Version to download (e.g. 1.23.0)
        #[arg(value_name = "VERSION")]
        version: String,

        /// Architecture to download (e.g. linux-amd64, darwin-arm64)
        #[arg(long, value_name = "ARCH", default_value = DEFAULT_ARCH)]
        arch: String,

        /// Base URL archives are fetched from
        #[arg(
            long,
            value_name = "URL",
            env = "GO_SWITCHER_BASE_URL",
            default_value = DEFAULT_BASE_URL
        )]
        base_url: String,

        /// How archives are downloaded and unpacked
        #[arg(
            long,
            value_enum,
            value_name = "FETCHER",
            env = "GO_SWITCHER_FETCHER",
            default_value_t = FetcherKind::External
        )]
        fetcher: FetcherKind,
    },

    /// Switch the active Go version by updating profile exports
    #[command(visible_alias = "use")]
    Switch {
        /// Version (e.g. 1.23.0) or number shown by `list`
        #[arg(value_name = "VERSION|NUMBER", allow_negative_numbers = true)]
        target: String,

        /// Architecture to switch to; ignored when a number is given
        #[arg(long, value_name = "ARCH", default_value = DEFAULT_ARCH)]
        arch: String,
    },

    /// Remove all downloaded Go versions
    Clean,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_switch_defaults() {
        let cli = Cli::try_parse_from(["go-switcher", "switch", "2"]).unwrap();
        match cli.command {
            Commands::Switch { target, arch } => {
                assert_eq!(target, "2");
                assert_eq!(arch, DEFAULT_ARCH);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_download_flags() {
        let cli = Cli::try_parse_from([
            "go-switcher",
            "--root",
            "/opt/go",
            "download",
            "1.23.0",
            "--arch",
            "darwin-arm64",
            "--fetcher",
            "native",
        ])
        .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/opt/go")));
        match cli.command {
            Commands::Download {
                version,
                arch,
                fetcher,
                ..
            } => {
                assert_eq!(version, "1.23.0");
                assert_eq!(arch, "darwin-arm64");
                assert_eq!(fetcher, FetcherKind::Native);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_download_requires_version() {
        assert!(Cli::try_parse_from(["go-switcher", "download"]).is_err());
    }
}
