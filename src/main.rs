use std::path::Path;

use anyhow::Context;
use clap::Parser;
use log::info;

use csvmerge::api::CombineApi;
use csvmerge::cli;
use csvmerge::conf::Config;
use csvmerge::core::{CliArgs, Command, setup_logging};
use csvmerge::service::CombineService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "csvmerge started.");

    let config = Config::load(args.config.as_deref().map(Path::new))
        .context("loading configuration")?;

    match args.command() {
        Command::Serve => {
            let addr = config.server.addr();
            let api = CombineApi::new(CombineService::new(config));
            api.serve(&addr).await?;
        }
        Command::Combine { files, output } => {
            let rows = cli::combine(files, output)?;
            info!("combined {} rows into {}", rows, output.display());
        }
        Command::Filter {
            mpan,
            files,
            output,
        } => {
            let rows = cli::filter(mpan, files, output.as_deref())?;
            info!("wrote {} rows for MPAN {}", rows, mpan);
        }
    }
    Ok(())
}
