use std::path::PathBuf;
use thiserror::Error;

/// User-facing failures of the version store and profile operations.
///
/// I/O and process failures are carried as `anyhow::Error` with context;
/// these variants cover input that the user can correct.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("No Go versions found in {}", root.display())]
    NoVersions { root: PathBuf },

    #[error("Invalid number {index}. Please choose a number between 1 and {count}")]
    IndexOutOfRange { index: i64, count: usize },

    #[error("Go version {version} for architecture {arch} is not installed")]
    NotInstalled { version: String, arch: String },

    #[error("Profile file {} does not exist", path.display())]
    ProfileMissing { path: PathBuf },

    #[error("Invalid {kind} '{value}': must be a single path component")]
    InvalidComponent { kind: &'static str, value: String },
}
