use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

use crate::store::{validate_component, VersionStore};

mod command;
mod http;

pub use command::CommandFetcher;
pub use http::HttpFetcher;

/// Backend used to download and unpack release archives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FetcherKind {
    /// Run `wget` and `tar`
    #[default]
    External,
    /// Download over HTTP and unpack in-process
    Native,
}

impl fmt::Display for FetcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetcherKind::External => write!(f, "external"),
            FetcherKind::Native => write!(f, "native"),
        }
    }
}

pub trait Fetcher {
    /// Download `url` to `dest`
    fn download(&self, url: &Url, dest: &Path) -> Result<()>;
    /// Unpack the gzipped tarball at `archive` into `dest`
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

pub fn create_fetcher(kind: FetcherKind) -> Result<Box<dyn Fetcher>> {
    match kind {
        FetcherKind::External => Ok(Box::new(CommandFetcher::default())),
        FetcherKind::Native => Ok(Box::new(HttpFetcher::from_env()?)),
    }
}

/// A published Go release for one architecture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    pub arch: String,
}

impl Release {
    pub fn new(version: impl Into<String>, arch: impl Into<String>) -> Result<Self> {
        let version = version.into();
        let arch = arch.into();
        validate_component("version", &version)?;
        validate_component("architecture", &arch)?;
        Ok(Self { version, arch })
    }

    /// Archive file name, e.g. `go1.23.0.linux-amd64.tar.gz`
    pub fn archive_name(&self) -> String {
        format!("go{}.{}.tar.gz", self.version, self.arch)
    }

    pub fn url(&self, base: &Url) -> Result<Url> {
        let name = self.archive_name();
        base.join(&name)
            .with_context(|| format!("Failed to build download URL for {name} from {base}"))
    }
}

/// Download and unpack `release` into the store
///
/// The archive is staged in `temp_dir` and deleted afterwards; a failed
/// delete is only logged. Returns the install directory.
pub fn install(
    store: &VersionStore,
    fetcher: &dyn Fetcher,
    release: &Release,
    base_url: &Url,
    temp_dir: &Path,
) -> Result<PathBuf> {
    let url = release.url(base_url)?;
    let archive = temp_dir.join(release.archive_name());
    let target = store.install_dir(&release.version, &release.arch);

    fs::create_dir_all(&target)
        .with_context(|| format!("Failed to create install directory {:?}", target))?;

    debug!(url = %url, archive = ?archive, "Downloading release archive");
    let result = fetcher
        .download(&url, &archive)
        .with_context(|| format!("Failed to download archive {url}"))
        .and_then(|()| {
            debug!(archive = ?archive, target = ?target, "Extracting release archive");
            fetcher
                .extract(&archive, &target)
                .with_context(|| format!("Failed to extract archive {:?}", archive))
        });

    remove_archive(&archive);
    result?;

    Ok(target)
}

fn remove_archive(archive: &Path) {
    if let Err(err) = fs::remove_file(archive) {
        if archive.exists() {
            warn!(archive = ?archive, error = %err, "Failed to remove downloaded archive");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Writes a placeholder archive and fakes extraction with a `go/bin/go` file
    #[derive(Default)]
    struct FakeFetcher {
        fail_download: bool,
        fail_extract: bool,
        downloads: RefCell<Vec<String>>,
    }

    impl Fetcher for FakeFetcher {
        fn download(&self, url: &Url, dest: &Path) -> Result<()> {
            self.downloads.borrow_mut().push(url.to_string());
            if self.fail_download {
                anyhow::bail!("connection refused");
            }
            fs::write(dest, b"archive")?;
            Ok(())
        }

        fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
            assert!(archive.exists());
            if self.fail_extract {
                anyhow::bail!("corrupt archive");
            }
            fs::create_dir_all(dest.join("go/bin"))?;
            fs::write(dest.join("go/bin/go"), b"go")?;
            Ok(())
        }
    }

    fn base_url() -> Url {
        Url::parse("https://go.dev/dl/").unwrap()
    }

    #[test]
    fn test_archive_name_and_url() {
        let release = Release::new("1.23.0", "linux-amd64").unwrap();
        assert_eq!(release.archive_name(), "go1.23.0.linux-amd64.tar.gz");
        assert_eq!(
            release.url(&base_url()).unwrap().as_str(),
            "https://go.dev/dl/go1.23.0.linux-amd64.tar.gz"
        );
    }

    #[test]
    fn test_release_rejects_invalid_components() {
        assert!(Release::new("../1.23.0", "linux-amd64").is_err());
        assert!(Release::new("1.23.0", "").is_err());
    }

    #[test]
    fn test_fetcher_kind_display() {
        assert_eq!(FetcherKind::default(), FetcherKind::External);
        assert_eq!(FetcherKind::External.to_string(), "external");
        assert_eq!(FetcherKind::Native.to_string(), "native");
    }

    #[test]
    fn test_install_extracts_and_removes_archive() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::new(temp.path().join("root"));
        let staging = temp.path().join("tmp");
        fs::create_dir_all(&staging).unwrap();
        let fetcher = FakeFetcher::default();
        let release = Release::new("1.23.0", "linux-amd64").unwrap();

        let target = install(&store, &fetcher, &release, &base_url(), &staging).unwrap();

        assert_eq!(target, store.install_dir("1.23.0", "linux-amd64"));
        assert!(target.join("go/bin/go").exists());
        assert!(!staging.join("go1.23.0.linux-amd64.tar.gz").exists());
        assert_eq!(
            fetcher.downloads.borrow().as_slice(),
            ["https://go.dev/dl/go1.23.0.linux-amd64.tar.gz"]
        );

        let entries = store.scan().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].to_string(), "1.23.0 (linux-amd64)");
    }

    #[test]
    fn test_install_download_failure_aborts() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::new(temp.path().join("root"));
        let fetcher = FakeFetcher {
            fail_download: true,
            ..Default::default()
        };
        let release = Release::new("1.23.0", "linux-amd64").unwrap();

        let err = install(&store, &fetcher, &release, &base_url(), temp.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to download archive"));
        assert!(format!("{err:#}").contains("connection refused"));
    }

    #[test]
    fn test_install_extract_failure_cleans_archive() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::new(temp.path().join("root"));
        let fetcher = FakeFetcher {
            fail_extract: true,
            ..Default::default()
        };
        let release = Release::new("1.22.5", "darwin-arm64").unwrap();

        let err = install(&store, &fetcher, &release, &base_url(), temp.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to extract archive"));
        assert!(!temp.path().join("go1.22.5.darwin-arm64.tar.gz").exists());
    }

    #[test]
    fn test_install_overwrites_existing_target() {
        let temp = TempDir::new().unwrap();
        let store = VersionStore::new(temp.path().join("root"));
        let target = store.install_dir("1.23.0", "linux-amd64");
        fs::create_dir_all(target.join("go/bin")).unwrap();
        fs::write(target.join("go/bin/go"), b"old").unwrap();

        let release = Release::new("1.23.0", "linux-amd64").unwrap();
        install(
            &store,
            &FakeFetcher::default(),
            &release,
            &base_url(),
            temp.path(),
        )
        .unwrap();

        assert_eq!(fs::read(target.join("go/bin/go")).unwrap(), b"go");
    }
}
