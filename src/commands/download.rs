use crate::config::{parse_base_url, Config};
use crate::installers::{self, create_fetcher, FetcherKind, Release};
use crate::ui;
use anyhow::Result;
use std::env;

pub fn execute(
    config: &Config,
    version: &str,
    arch: &str,
    base_url: &str,
    fetcher: FetcherKind,
) -> Result<()> {
    let release = Release::new(version, arch)?;
    let base_url = parse_base_url(base_url)?;
    let fetcher = create_fetcher(fetcher)?;
    let store = config.store();

    let progress = ui::Progress::new(
        "Downloading",
        format!("{} from {}", release.archive_name(), base_url),
    );

    match installers::install(
        &store,
        fetcher.as_ref(),
        &release,
        &base_url,
        &env::temp_dir(),
    ) {
        Ok(target) => {
            progress.success("Downloaded");
            ui::success(
                "Installed",
                format!("Go {} ({}) to {}", release.version, release.arch, target.display()),
            );
            Ok(())
        }
        Err(err) => {
            progress.fail();
            Err(err)
        }
    }
}
