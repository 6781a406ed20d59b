use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

use crate::profile::Profile;
use crate::store::VersionStore;

/// Root used when neither `--root` nor `GO_SWITCHER_ROOT` is given
pub const DEFAULT_ROOT: &str = "/usr/local/bin/go-switcher";
pub const DEFAULT_ARCH: &str = "linux-amd64";
pub const DEFAULT_BASE_URL: &str = "https://go.dev/dl/";
const PROFILE_FILE: &str = ".profile";

/// Resolved settings shared by every command
///
/// There is no configuration file; values come from flags, environment
/// variables and these defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub profile: PathBuf,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>, profile: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            profile: profile.into(),
        }
    }

    /// Fill unset values with defaults (`$HOME/.profile` for the profile)
    ///
    /// The root is made absolute against the current directory since it
    /// ends up in profile exports read by a login shell.
    pub fn resolve(root: Option<PathBuf>, profile: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let root = std::path::absolute(&root)
            .with_context(|| format!("Failed to resolve version root {:?}", root))?;
        let profile = match profile {
            Some(profile) => profile,
            None => default_profile_path()?,
        };
        Ok(Self::new(root, profile))
    }

    pub fn store(&self) -> VersionStore {
        VersionStore::new(&self.root)
    }

    pub fn profile(&self) -> Profile {
        Profile::new(&self.profile)
    }
}

fn default_profile_path() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .context("Failed to get home directory")
        .map(|dirs| dirs.home_dir().join(PROFILE_FILE))
}

/// Parse a download base URL, forcing a trailing slash so archive names
/// are appended rather than replacing the last path segment
pub fn parse_base_url(value: &str) -> Result<Url> {
    let mut url = Url::parse(value).with_context(|| format!("Invalid base URL '{value}'"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("Base URL '{value}' cannot hold archive paths");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
