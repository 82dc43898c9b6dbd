//! `build`: scan routes, compile content routes, print the route table.

use std::fs;

use anyhow::{Context, Result, bail};

use super::BuildArgs;
use crate::config::Config;
use crate::log;
use crate::pipeline::RoutePipeline;
use crate::route::{MergeReport, RouteTable, merge_content_routes, scan_routes};

pub async fn run(config: &Config, args: &BuildArgs) -> Result<()> {
    let pipeline = config.pipeline();
    let (table, report) = build_routes(config, &pipeline).await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&table)?
    } else {
        serde_json::to_string(&table)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            log!("routes"; "wrote {} routes to {}", table.len(), path.display());
        }
        None => println!("{json}"),
    }

    if !report.is_success() {
        bail!("{} content route(s) failed to compile", report.failures.len());
    }
    Ok(())
}

/// Scan the app directory and merge compiled content routes into the table.
///
/// Per-route failures are logged and returned in the report; only scan and
/// configuration problems are errors.
pub async fn build_routes(config: &Config, pipeline: &RoutePipeline) -> Result<(RouteTable, MergeReport)> {
    let app_dir = config.app_dir();
    let glob = config.content_glob()?;

    let mut table = scan_routes(&app_dir, &config.routes.ignored_route_files)
        .with_context(|| format!("failed to scan routes in `{}`", app_dir.display()))?;
    let report = merge_content_routes(&mut table, &app_dir, &glob, pipeline).await;

    log_report(config, &report);
    Ok((table, report))
}

fn log_report(config: &Config, report: &MergeReport) {
    for failure in &report.failures {
        log!(
            "error";
            "{} ({}): {}",
            failure.id,
            config.root_relative(&failure.source).display(),
            failure.error
        );
    }

    if report.replaced() > 0 || !report.failures.is_empty() {
        log!(
            "routes";
            "{} content routes ({} compiled, {} cached, {} failed)",
            report.replaced() + report.failures.len(),
            report.compiled,
            report.cached,
            report.failures.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::utils::path::normalize_path;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> (TempDir, Config) {
        let temp = TempDir::new().unwrap();
        let root = normalize_path(temp.path());
        for (file, content) in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let config = Config {
            root,
            ..Config::default()
        };
        (temp, config)
    }

    #[tokio::test]
    async fn test_build_writes_route_table() {
        let (temp, config) = project(&[
            ("app/root.tsx", ""),
            ("app/routes/index.mdx", "---\nmeta:\n  title: Home\n---\n# Home\n"),
        ]);
        let output = temp.path().join("routes.json");
        let args = BuildArgs {
            output: Some(output.clone()),
            pretty: true,
        };

        run(&config, &args).await.unwrap();

        let table: RouteTable =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let index = &table["routes/index"];
        assert!(index.file.is_absolute());
        assert!(index.file.starts_with(config.cache_store().root()));
        assert_eq!(index.parent_id.as_deref(), Some("root"));
    }

    #[tokio::test]
    async fn test_build_fails_when_a_route_fails() {
        let (temp, config) = project(&[("app/routes/bad.mdx", "---\ntitle: [\n---\n")]);
        let args = BuildArgs {
            output: Some(temp.path().join("routes.json")),
            pretty: false,
        };

        let err = run(&config, &args).await.unwrap_err();
        assert!(err.to_string().contains("1 content route(s) failed"));
        // The table is still written, with the failing route untouched
        let json = fs::read_to_string(temp.path().join("routes.json")).unwrap();
        assert!(json.contains("routes/bad.mdx"));
    }

    #[tokio::test]
    async fn test_missing_app_dir_is_error() {
        let (_temp, config) = project(&[]);
        let pipeline = config.pipeline();
        assert!(build_routes(&config, &pipeline).await.is_err());
    }
}
