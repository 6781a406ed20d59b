use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::environment::{
    GoEnvironment, GOPATH_EXPORT, GOROOT_EXPORT, PATH_EXPORT, PROFILE_COMMENT,
};
use crate::error::StoreError;

/// Shell profile file holding the Go exports (e.g. `~/.profile`)
#[derive(Debug, Clone)]
pub struct Profile {
    path: PathBuf,
}

impl Profile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail with `ProfileMissing` unless the profile is present
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.is_file() {
            return Ok(());
        }
        Err(StoreError::ProfileMissing {
            path: self.path.clone(),
        }
        .into())
    }

    /// Read the profile; a missing file is an error, never created
    pub fn read(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StoreError::ProfileMissing {
                path: self.path.clone(),
            }
            .into()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read profile {:?}", self.path))
            }
        }
    }

    /// Replace the managed exports with ones pointing at `env`
    ///
    /// Full-file rewrite: no backup and no atomic rename.
    pub fn apply(&self, env: &GoEnvironment) -> Result<()> {
        let contents = self.read()?;
        let updated = rewrite(&contents, env);

        fs::write(&self.path, updated)
            .with_context(|| format!("Failed to write profile {:?}", self.path))?;
        debug!(profile = ?self.path, goroot = ?env.goroot, "Profile rewritten");
        Ok(())
    }

    /// GOROOT currently exported by the profile, if any
    pub fn active_goroot(&self) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = self.read()?;
        Ok(contents
            .lines()
            .filter_map(|line| line.trim_start().strip_prefix(GOROOT_EXPORT))
            .last()
            .map(|value| PathBuf::from(value.trim().trim_matches('"'))))
    }
}

/// Drop managed lines from `contents` and append a fresh export block
pub fn rewrite(contents: &str, env: &GoEnvironment) -> String {
    let mut lines: Vec<&str> = contents
        .lines()
        .filter(|line| !is_managed_line(line))
        .collect();

    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    let exports = env.export_lines();
    let mut output = String::with_capacity(contents.len() + 256);
    for line in &lines {
        output.push_str(line);
        output.push('\n');
    }
    if !lines.is_empty() {
        output.push('\n');
    }
    output.push_str(PROFILE_COMMENT);
    output.push('\n');
    for export in &exports {
        output.push_str(export);
        output.push('\n');
    }

    output
}

// Exact prefixes only: unrelated PATH additions survive a rewrite.
fn is_managed_line(line: &str) -> bool {
    let trimmed = line.trim_start();

    if trimmed.trim_end() == PROFILE_COMMENT {
        return true;
    }
    if trimmed.starts_with(GOPATH_EXPORT) || trimmed.starts_with(GOROOT_EXPORT) {
        return true;
    }
    trimmed
        .strip_prefix(PATH_EXPORT)
        .is_some_and(|value| value.trim_end().trim_end_matches('/').ends_with("/go/bin"))
}
