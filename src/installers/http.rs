use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use std::env;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use tar::Archive;
use tracing::warn;
use url::Url;

use super::Fetcher;

const DEFAULT_USER_AGENT: &str = concat!("go-switcher/", env!("CARGO_PKG_VERSION"));

/// In-process fetcher: blocking HTTP download and gzip/tar extraction
#[derive(Clone)]
pub struct HttpFetcher {
    http: Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            user_agent: user_agent.into(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let user_agent = env::var("GO_SWITCHER_USER_AGENT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        Self::new(user_agent)
    }
}

impl Fetcher for HttpFetcher {
    fn download(&self, url: &Url, dest: &Path) -> Result<()> {
        let mut response = self
            .http
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .with_context(|| format!("Failed to request {url}"))?;

        if !response.status().is_success() {
            bail!("Download of {url} returned {}", response.status());
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let temp_path = dest.with_extension("download");
        let result = write_body(&mut response, &temp_path)
            .with_context(|| format!("Failed while writing {url} to {:?}", temp_path))
            .and_then(|()| {
                fs::rename(&temp_path, dest).with_context(|| {
                    format!(
                        "Failed to move download from {:?} to {:?}",
                        temp_path, dest
                    )
                })
            });

        if result.is_err() {
            if let Err(err) = fs::remove_file(&temp_path) {
                if temp_path.exists() {
                    warn!(path = ?temp_path, error = %err, "Failed to remove partial download");
                }
            }
        }

        result
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let file =
            File::open(archive).with_context(|| format!("Failed to open archive {:?}", archive))?;
        Archive::new(GzDecoder::new(file))
            .unpack(dest)
            .with_context(|| format!("Failed to unpack tar.gz archive {:?}", archive))
    }
}

fn write_body(body: &mut impl Read, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create temporary file {:?}", path))?;
    io::copy(body, &mut file)?;
    file.flush()?;
    Ok(())
}
