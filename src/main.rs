use anyhow::Result;
use clap::Parser;

use gitglance::cli::handlers::{
    CommandContext, handle_all_projects, handle_dashboard, handle_open, handle_version,
};
use gitglance::cli::{Cli, Mode};
use gitglance::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.clone());

    // Version never touches the configuration
    let ctx = || CommandContext::from_cli(&cli);
    match cli.mode()? {
        Mode::Version => {
            handle_version();
            Ok(())
        }
        Mode::Dashboard { target } => handle_dashboard(&ctx()?, &target).await,
        Mode::Open { target, id } => handle_open(&ctx()?, &target, id).await,
        Mode::AllProjects { host } => handle_all_projects(&ctx()?, &host).await,
    }
}
