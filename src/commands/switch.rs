use crate::config::Config;
use crate::store::VersionSelector;
use crate::ui;
use anyhow::{Context, Result};
use std::fs;

pub fn execute(config: &Config, target: &str, arch: &str) -> Result<()> {
    let store = config.store();
    let entry = store.resolve(&VersionSelector::parse(target), arch)?;
    let env = entry.environment();
    let profile = config.profile();
    profile.ensure_exists()?;

    ui::status("Switching", format!("to Go {entry}"));

    if !env.goroot.is_dir() {
        ui::warn(format!(
            "No Go toolchain found at {}; the exports will point at a missing GOROOT",
            env.goroot.display()
        ));
    }

    fs::create_dir_all(&env.gopath)
        .with_context(|| format!("Failed to create workspace directory {:?}", env.gopath))?;

    profile.apply(&env)?;

    ui::success("Switched", format!("to Go {entry}"));
    ui::info(format!(
        "PATH now includes: {}\nGOPATH is set to: {}\nGOROOT is set to: {}\nChanges have been written to {}",
        env.bin_path.display(),
        env.gopath.display(),
        env.goroot.display(),
        profile.path().display()
    ));
    ui::info("Log out and back in (or start a new login shell) for the changes to take effect");

    Ok(())
}
