// Public API
pub mod cli;
pub mod commands;
pub mod ui;

// Core domain types
mod config;
mod environment;
mod error;
mod installers;
mod profile;
mod store;

// Re-export main types
pub use config::Config;
pub use environment::GoEnvironment;
pub use error::StoreError;
pub use installers::{
    create_fetcher, install, CommandFetcher, Fetcher, FetcherKind, HttpFetcher, Release,
};
pub use profile::Profile;
pub use store::{CleanReport, InstalledVersion, VersionSelector, VersionStore};
