use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use super::CommandContext;
use crate::aggregate::Pipeline;
use crate::vcs::{GitInspector, guess_client, resolve_target};

/// Open issue or pull request `id` in the browser, printing the URL if that fails
pub async fn handle_open(ctx: &CommandContext, target: &str, id: u64) -> Result<()> {
    let target = resolve_target(target).with_context(|| format!("Failed to resolve {}", target))?;
    let client = guess_client(&target.host, &ctx.config)?;
    let pipeline = Pipeline::new(
        client,
        Arc::new(GitInspector),
        ctx.limits,
        ctx.config.timeout(),
    );

    let url = pipeline.issue_url(&target, id).await?;
    if let Err(err) = open::that(&url) {
        debug!(error = %err, "browser launch failed");
        println!("URL: {}", url);
    }
    Ok(())
}
