use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::environment::GoEnvironment;
use crate::error::StoreError;

/// One installed toolchain discovered under the version root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    pub version: String,
    pub arch: String,
    /// Install directory: `<root>/<version>/<arch>`
    pub path: PathBuf,
}

impl InstalledVersion {
    /// Environment exports pointing at this installation
    pub fn environment(&self) -> GoEnvironment {
        GoEnvironment::for_install(&self.path)
    }
}

impl fmt::Display for InstalledVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.arch)
    }
}

/// How the user picked a version for `switch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// 1-based position in scan order
    Index(i64),
    /// Literal version directory name, combined with an architecture
    Version(String),
}

impl VersionSelector {
    pub fn parse(input: &str) -> Self {
        match input.parse::<i64>() {
            Ok(index) => VersionSelector::Index(index),
            Err(_) => VersionSelector::Version(input.to_string()),
        }
    }
}

/// Outcome of a best-effort `clean`
#[derive(Debug, Default)]
pub struct CleanReport {
    pub removed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Version store - the directory tree holding installed toolchains
///
/// Layout is `<root>/<version>/<arch>/` with `go/` (the extracted
/// toolchain) and `workspace/` (GOPATH) below each architecture directory.
/// The filesystem is the only record; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct VersionStore {
    root: PathBuf,
}

impl VersionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Directory a given version/architecture pair is installed into
    pub fn install_dir(&self, version: &str, arch: &str) -> PathBuf {
        self.root.join(version).join(arch)
    }

    /// List installed versions, sorted by version then architecture
    ///
    /// A missing root yields an empty list. Version directories that cannot
    /// be read are skipped with a warning.
    pub fn scan(&self) -> Result<Vec<InstalledVersion>> {
        let versions = match subdirectories(&self.root) {
            Ok(versions) => versions,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(root = ?self.root, "Version root does not exist");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read version root {:?}", self.root))
            }
        };

        let mut entries = Vec::new();
        for (version, version_dir) in versions {
            let arches = match subdirectories(&version_dir) {
                Ok(arches) => arches,
                Err(err) => {
                    warn!(path = ?version_dir, error = %err, "Skipping unreadable version directory");
                    continue;
                }
            };

            for (arch, path) in arches {
                entries.push(InstalledVersion {
                    version: version.clone(),
                    arch,
                    path,
                });
            }
        }

        entries.sort_by(|a, b| {
            compare_versions(&a.version, &b.version).then_with(|| a.arch.cmp(&b.arch))
        });
        debug!(count = entries.len(), root = ?self.root, "Scanned version root");

        Ok(entries)
    }

    /// Resolve a selector against the current scan
    ///
    /// An index picks version and architecture from the scan and ignores
    /// `arch`; a literal version is joined with `arch` and must exist on disk.
    pub fn resolve(&self, selector: &VersionSelector, arch: &str) -> Result<InstalledVersion> {
        let mut entries = self.scan()?;
        if entries.is_empty() {
            return Err(StoreError::NoVersions {
                root: self.root.clone(),
            }
            .into());
        }

        match selector {
            VersionSelector::Index(index) => {
                let count = entries.len();
                let position = usize::try_from(*index)
                    .ok()
                    .filter(|position| (1..=count).contains(position))
                    .ok_or(StoreError::IndexOutOfRange {
                        index: *index,
                        count,
                    })?;

                Ok(entries.swap_remove(position - 1))
            }
            VersionSelector::Version(version) => {
                validate_component("version", version)?;
                validate_component("architecture", arch)?;

                let path = self.install_dir(version, arch);
                if !path.is_dir() {
                    return Err(StoreError::NotInstalled {
                        version: version.clone(),
                        arch: arch.to_string(),
                    }
                    .into());
                }

                Ok(InstalledVersion {
                    version: version.clone(),
                    arch: arch.to_string(),
                    path,
                })
            }
        }
    }

    /// Remove every version directory under the root
    ///
    /// Failures are recorded per entry and do not stop the sweep.
    pub fn clean(&self) -> Result<CleanReport> {
        self.sweep(|path| fs::remove_dir_all(path))
    }

    fn sweep(&self, mut remove: impl FnMut(&Path) -> io::Result<()>) -> Result<CleanReport> {
        let mut report = CleanReport::default();

        let versions = match subdirectories(&self.root) {
            Ok(versions) => versions,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(report),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read version root {:?}", self.root))
            }
        };

        for (name, path) in versions {
            debug!(path = ?path, "Removing version directory");
            match remove(&path) {
                Ok(()) => report.removed.push(name),
                Err(err) => {
                    warn!(path = ?path, error = %err, "Failed to remove version directory");
                    report.failed.push((name, err.to_string()));
                }
            }
        }

        Ok(report)
    }
}

/// Reject values that would escape `<root>/<version>/<arch>`
pub fn validate_component(kind: &'static str, value: &str) -> Result<(), StoreError> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\0');

    if invalid {
        return Err(StoreError::InvalidComponent {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Real (non-symlink) subdirectories of `dir` with UTF-8 names
fn subdirectories(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => dirs.push((name, entry.path())),
            Err(name) => debug!(name = ?name, "Skipping directory with non UTF-8 name"),
        }
    }
    Ok(dirs)
}

/// Natural ordering for version strings: digit runs compare numerically
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    let left_segments = segments(left);
    let right_segments = segments(right);

    for (a, b) in left_segments.iter().zip(right_segments.iter()) {
        let ordering = match (is_numeric(a), is_numeric(b)) {
            (true, true) => compare_numeric(a, b),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => a.cmp(b),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    left_segments
        .len()
        .cmp(&right_segments.len())
        .then_with(|| left.cmp(right))
}

fn segments(value: &str) -> Vec<&str> {
    let bytes = value.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;

    for i in 1..bytes.len() {
        if bytes[i].is_ascii_digit() != bytes[i - 1].is_ascii_digit() {
            segments.push(&value[start..i]);
            start = i;
        }
    }
    if start < value.len() {
        segments.push(&value[start..]);
    }
    segments
}

fn is_numeric(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_digit())
}

// Compared as strings so long digit runs cannot overflow.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
