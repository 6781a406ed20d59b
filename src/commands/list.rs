use crate::config::Config;
use crate::ui;
use anyhow::Result;
use tracing::debug;

pub fn execute(config: &Config) -> Result<()> {
    let store = config.store();
    ui::info(format!("Go versions from {}", store.root().display()));

    if !store.exists() {
        ui::info("No Go versions found. Directory does not exist.");
        return Ok(());
    }

    let entries = store.scan()?;
    if entries.is_empty() {
        ui::info("No Go versions found");
        return Ok(());
    }

    // The active marker is cosmetic; an unreadable profile just omits it.
    let active = config.profile().active_goroot().unwrap_or_else(|err| {
        debug!(error = %err, "Could not read active GOROOT from profile");
        None
    });

    for (index, entry) in entries.iter().enumerate() {
        let marker = if active.as_deref() == Some(entry.environment().goroot.as_path()) {
            " *"
        } else {
            ""
        };
        println!("{}. {entry}{marker}", index + 1);
    }

    Ok(())
}
