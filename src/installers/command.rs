use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use url::Url;

use super::Fetcher;

/// Fetcher that shells out to an external downloader and `tar`
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    downloader: String,
    extractor: String,
}

impl Default for CommandFetcher {
    fn default() -> Self {
        Self::new("wget", "tar")
    }
}

impl CommandFetcher {
    pub fn new(downloader: impl Into<String>, extractor: impl Into<String>) -> Self {
        Self {
            downloader: downloader.into(),
            extractor: extractor.into(),
        }
    }

    fn run(&self, program: &str, command: &mut Command) -> Result<()> {
        let output = command
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to run '{program}' - is it installed?"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            if detail.is_empty() {
                bail!("'{program}' exited with {}", output.status);
            }
            bail!("'{program}' exited with {}: {detail}", output.status);
        }
        Ok(())
    }
}

impl Fetcher for CommandFetcher {
    fn download(&self, url: &Url, dest: &Path) -> Result<()> {
        let mut command = Command::new(&self.downloader);
        command.arg("-q").arg("-O").arg(dest).arg(url.as_str());
        self.run(&self.downloader, &mut command)
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let mut command = Command::new(&self.extractor);
        command.arg("-xzf").arg(archive).arg("-C").arg(dest);
        self.run(&self.extractor, &mut command)
    }
}
