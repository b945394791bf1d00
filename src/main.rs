use clap::Parser;

use notifiers::cli::{self, Cli};
use notifiers::external::client;
use notifiers::{providers, registry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;
    tracing::debug!(version = notifiers::pkg_version(), "starting notifiers");

    client::configure(&settings.http);
    registry::install(providers::builtin_registry())?;

    cli::execute_command(&cli, settings).await?;
    Ok(())
}
