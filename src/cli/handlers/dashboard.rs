use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use super::CommandContext;
use crate::aggregate::Pipeline;
use crate::format::{Formatter, ansi::to_ansi, render_dashboard};
use crate::tui::run_viewer;
use crate::vcs::{GitInspector, guess_client, resolve_target};

pub async fn handle_dashboard(ctx: &CommandContext, target: &str) -> Result<()> {
    let target = resolve_target(target).with_context(|| format!("Failed to resolve {}", target))?;
    let client = guess_client(&target.host, &ctx.config)?;
    let pipeline = Pipeline::new(
        client,
        Arc::new(GitInspector),
        ctx.limits,
        ctx.config.timeout(),
    );

    let now = Utc::now();
    let dashboard = pipeline.aggregate(&target, now).await?;
    let text = render_dashboard(&dashboard, pipeline.limits(), &Formatter::new(&ctx.theme, now));

    if ctx.interactive() {
        let title = format!("{}/{}", target.owner, target.name);
        run_viewer(&title, text, &ctx.theme).context("Viewer failed")?;
    } else {
        println!("{}", to_ansi(&text));
    }
    Ok(())
}
