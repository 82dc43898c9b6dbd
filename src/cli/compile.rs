//! `compile`: compile one content file through the cache.

use anyhow::{Context, Result};

use super::CompileArgs;
use crate::config::Config;
use crate::pipeline::CompiledArtifact;
use crate::utils::path::resolve_path;

pub async fn run(config: &Config, args: &CompileArgs) -> Result<()> {
    let source = resolve_path(&args.file, &config.content_root());
    let artifact = config
        .pipeline()
        .compile(&source)
        .await
        .with_context(|| format!("failed to compile `{}`", args.file.display()))?;

    crate::debug!(
        "compile";
        "{} {} ({}, marker {})",
        if artifact.is_cached() { "cached" } else { "compiled" },
        config.root_relative(&artifact.source_path).display(),
        artifact.hash,
        config.root_relative(&artifact.marker_path).display()
    );

    if args.print {
        print!("{}", module_text(&artifact).await?);
    } else {
        println!("{}", artifact.cache_path.display());
    }
    Ok(())
}

/// Module text of `artifact`, read back from the cache on a hit.
async fn module_text(artifact: &CompiledArtifact) -> Result<String> {
    match &artifact.module_text {
        Some(text) => Ok(text.clone()),
        None => tokio::fs::read_to_string(&artifact.cache_path)
            .await
            .with_context(|| format!("failed to read `{}`", artifact.cache_path.display())),
    }
}
