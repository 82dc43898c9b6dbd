//! `clean`: remove the cache directory.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::log;

pub async fn run(config: &Config) -> Result<()> {
    let store = config.cache_store();
    store
        .clear()
        .await
        .with_context(|| format!("failed to remove `{}`", store.root().display()))?;
    log!("cache"; "removed {}", config.root_relative(store.root()).display());
    Ok(())
}
