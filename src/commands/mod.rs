use crate::cli::{Cli, Commands};
use crate::config::Config;
use anyhow::Result;

mod clean;
mod download;
mod list;
mod switch;

pub fn execute(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.root, cli.profile)?;

    match cli.command {
        Commands::List => list::execute(&config),

        Commands::Download {
            version,
            arch,
            base_url,
            fetcher,
        } => download::execute(&config, &version, &arch, &base_url, fetcher),

        Commands::Switch { target, arch } => switch::execute(&config, &target, &arch),

        Commands::Clean => clean::execute(&config),
    }
}
