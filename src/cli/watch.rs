//! `watch`: build once, then recompile content files on change.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::build::build_routes;
use crate::config::Config;
use crate::log;
use crate::watch::ContentWatcher;

pub async fn run(config: &Config) -> Result<()> {
    let pipeline = Arc::new(config.pipeline());
    let mut watcher = ContentWatcher::new();

    let (table, report) = build_routes(config, &pipeline).await?;
    crate::debug!("watch"; "initial build: {} routes", table.len());
    if !report.is_success() {
        log!("watch"; "{} content route(s) failed, fix them and save to retry", report.failures.len());
    }

    let target = config.watch_target(Arc::clone(&pipeline))?;
    let root = target.root.clone();
    watcher
        .open(target)
        .with_context(|| format!("failed to watch `{}`", root.display()))?;
    log!(
        "watch";
        "watching {} ({}), press ctrl-c to stop",
        config.root_relative(&root).display(),
        config.routes.mdx_files
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    watcher.close();
    log!("watch"; "stopped");
    Ok(())
}
