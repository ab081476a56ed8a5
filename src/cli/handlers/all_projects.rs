use anyhow::Result;
use chrono::Utc;

use super::CommandContext;
use crate::aggregate::{ProjectScan, aggregate_projects};
use crate::format::{Formatter, ansi::to_ansi};
use crate::vcs::guess_client;

/// Release report for every repository under a namespace on `host`
pub async fn handle_all_projects(ctx: &CommandContext, host: &str) -> Result<()> {
    let client = guess_client(host, &ctx.config)?;
    let scan = ProjectScan {
        namespace: ctx.namespace.clone(),
        max_commits: ctx.releases.max_commits,
        timeout: ctx.config.timeout(),
        concurrency: ctx.config.max_concurrent_fetches,
    };

    let repos = aggregate_projects(client, &scan).await?;
    let text = Formatter::new(&ctx.theme, Utc::now()).releases(&repos, &ctx.releases);
    println!("{}", to_ansi(&text));
    Ok(())
}
