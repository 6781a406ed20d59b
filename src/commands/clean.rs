use crate::config::Config;
use crate::ui;
use anyhow::Result;

pub fn execute(config: &Config) -> Result<()> {
    let store = config.store();
    ui::info(format!("Removing all Go versions from {}", store.root().display()));

    if !store.exists() {
        ui::info("No Go versions found. Directory does not exist.");
        return Ok(());
    }

    let report = store.clean()?;
    if report.removed.is_empty() && report.failed.is_empty() {
        ui::info("No Go versions found to clean");
        return Ok(());
    }

    for name in &report.removed {
        ui::status("Removed", format!("version {name}"));
    }
    for (name, error) in &report.failed {
        ui::warn(format!("Failed to remove version {name}: {error}"));
    }

    ui::success(
        "Cleaned",
        format!("{} version(s) removed", report.removed.len()),
    );
    Ok(())
}
