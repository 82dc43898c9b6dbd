//! Content watcher.
//!
//! Recompiles content files when they change on disk, outside the initial
//! build. The route table is never touched: a changed file keeps its cache
//! path, only the module text and marker are replaced.
//!
//! ```text
//! notify thread ──(bounded channel)──► run loop ─► Debouncer ─► recompile_changes
//!                                                                  │
//!                                                                  ▼
//!                                                     RoutePipeline::compile (cached)
//! ```
//!
//! [`ContentWatcher`] owns the subscription. `open` replaces any previous one
//! and `close` aborts the run loop before dropping the notify watcher, so no
//! handler from an earlier build fires after re-initialization.

mod debouncer;


use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::content::ContentGlob;
use crate::logger::{status_error, status_success};
use crate::pipeline::{CompiledArtifact, PipelineError, RoutePipeline};
use crate::utils::path::normalize_path;

use debouncer::Debouncer;
pub use debouncer::{ChangeKind, DEFAULT_DEBOUNCE};

/// Events buffered between the notify thread and the run loop.
const EVENT_BUFFER: usize = 64;

/// What the watcher needs to recompile a file.
#[derive(Debug, Clone)]
pub struct WatchTarget {
    /// Content root (e.g. `app/routes`).
    pub root: PathBuf,
    pub glob: ContentGlob,
    pub pipeline: Arc<RoutePipeline>,
    pub debounce: Duration,
}

/// Filesystem subscription with an explicit open/close lifecycle.
#[derive(Default)]
pub struct ContentWatcher {
    active: Option<ActiveWatch>,
}

struct ActiveWatch {
    /// Notify handle (dropping it ends the subscription)
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
    root: PathBuf,
}

impl ContentWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to changes under `target.root`, closing any earlier subscription.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(&mut self, target: WatchTarget) -> notify::Result<()> {
        self.close();

        let (tx, rx) = mpsc::channel::<notify::Event>(EVENT_BUFFER);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                // Receiver gone means the watcher is closing
                Ok(event) => {
                    let _ = tx.blocking_send(event);
                }
                Err(e) => crate::log!("watch"; "notify error: {}", e),
            }
        })?;
        watcher.watch(&target.root, RecursiveMode::Recursive)?;

        let root = normalize_path(&target.root);
        crate::debug!("watch"; "watching {} ({})", root.display(), target.glob.as_str());

        let target = WatchTarget {
            root: root.clone(),
            ..target
        };
        let task = tokio::spawn(run(rx, target));

        self.active = Some(ActiveWatch {
            _watcher: watcher,
            task,
            root,
        });
        Ok(())
    }

    /// End the subscription. Closing a closed watcher is a no-op.
    pub fn close(&mut self) {
        if let Some(active) = self.active.take() {
            active.task.abort();
            crate::debug!("watch"; "closed {}", active.root.display());
        }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    #[cfg(test)]
    pub fn root(&self) -> Option<&Path> {
        self.active.as_ref().map(|active| active.root.as_path())
    }
}

impl Drop for ContentWatcher {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run(mut rx: mpsc::Receiver<notify::Event>, target: WatchTarget) {
    let mut debouncer = Debouncer::new(target.debounce);

    loop {
        tokio::select! {
            biased;
            event = rx.recv() => match event {
                Some(event) => debouncer.add_event(&event),
                None => break,
            },
            _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                if let Some(changes) = debouncer.take_if_ready() {
                    let outcomes = recompile_changes(changes, &target).await;
                    report(&target.root, &outcomes);
                }
            }
        }
    }
}

/// Outcome of recompiling one changed content file.
pub type Recompiled = (PathBuf, Result<CompiledArtifact, PipelineError>);

/// Recompile every created/modified content file in `changes`, in path order.
///
/// Removed files and paths outside the glob are skipped.
pub async fn recompile_changes(
    changes: FxHashMap<PathBuf, ChangeKind>,
    target: &WatchTarget,
) -> Vec<Recompiled> {
    let mut paths: Vec<PathBuf> = changes
        .into_iter()
        .filter(|(_, kind)| matches!(kind, ChangeKind::Created | ChangeKind::Modified))
        .map(|(path, _)| path)
        .filter(|path| target.glob.is_content_file(&target.root, path))
        .collect();
    paths.sort();

    let mut outcomes = Vec::with_capacity(paths.len());
    for path in paths {
        let result = target.pipeline.compile(&path).await;
        outcomes.push((path, result));
    }
    outcomes
}

fn report(root: &Path, outcomes: &[Recompiled]) {
    for (path, result) in outcomes {
        let rel = path.strip_prefix(root).unwrap_or(path).display();
        match result {
            Ok(artifact) if artifact.is_cached() => status_success(&format!("unchanged: {rel}")),
            Ok(_) => status_success(&format!("compiled: {rel}")),
            Err(e) => status_error(&format!("{} failed: {rel}", e.stage()), &e.to_string()),
        }
    }
}
