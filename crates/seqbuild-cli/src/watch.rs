use anyhow::{Context, Result};
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Quiet period used to coalesce bursts of events.
const SETTLE: Duration = Duration::from_millis(200);

fn is_source(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.trim_start_matches('.') == e))
}

/// Blocks forever, calling `on_change` with the last changed source file of
/// every burst of filesystem events under `dir`.
pub fn run<F>(dir: &Path, extensions: &[String], mut on_change: F) -> Result<()>
where
    F: FnMut(PathBuf) -> Result<()>,
{
    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher
        .watch(dir, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", dir.display()))?;

    log::info!("Watching {:?} for *.{} changes", dir, extensions.join(", *."));

    let mut pending: Option<PathBuf> = None;
    loop {
        let received = if pending.is_some() {
            rx.recv_timeout(SETTLE)
        } else {
            rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected)
        };

        match received {
            Ok(Ok(event)) => {
                if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    if let Some(path) = event
                        .paths
                        .into_iter()
                        .rev()
                        .find(|p| is_source(p, extensions))
                    {
                        pending = Some(path);
                    }
                }
            }
            Ok(Err(e)) => log::warn!("Watch error: {}", e),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if let Some(file) = pending.take() {
                    log::info!("{:?} changed, rebuilding", file);
                    if let Err(e) = on_change(file) {
                        log::error!("{:#}", e);
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}
