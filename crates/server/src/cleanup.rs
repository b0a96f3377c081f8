//! Periodic removal of stale uploads and processed files

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info};

fn age(path: &Path, now: SystemTime) -> io::Result<Duration> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(now.duration_since(modified).unwrap_or_default())
}

/// Delete the regular files in `dir` last modified more than `max_age` ago.
///
/// Returns how many files were deleted. Failures on individual files are
/// logged and skipped; only an unreadable directory is an error.
pub fn cleanup_old_files(dir: &Path, max_age: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut deleted = 0;

    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                error!(error = %err, "error during cleanup");
                continue;
            }
        };
        let path = entry.path();
        match entry.file_type() {
            Ok(kind) if kind.is_file() => {}
            _ => continue,
        }

        match age(&path, now) {
            Ok(age) if age > max_age => match std::fs::remove_file(&path) {
                Ok(()) => {
                    info!(path = %path.display(), "deleted old file");
                    deleted += 1;
                }
                Err(err) => error!(path = %path.display(), error = %err, "error during cleanup"),
            },
            Ok(_) => {}
            Err(err) => error!(path = %path.display(), error = %err, "error during cleanup"),
        }
    }

    Ok(deleted)
}

/// Shortest accepted sweep interval.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Background task sweeping the upload directory at a fixed interval.
#[derive(Debug)]
pub struct CleanupScheduler {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl CleanupScheduler {
    /// Spawn the sweep on the current runtime. The first sweep runs one
    /// `interval` after start; intervals below [`MIN_SWEEP_INTERVAL`] are
    /// raised to it.
    pub fn start(dir: PathBuf, interval: Duration, max_age: Duration) -> Self {
        let interval = interval.max(MIN_SWEEP_INTERVAL);
        let (tx, mut rx) = oneshot::channel();
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(dir = %dir.display(), ?interval, ?max_age, "cleanup scheduler started");

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut rx => break,
                    _ = ticker.tick() => {
                        let dir = dir.clone();
                        let sweep = tokio::task::spawn_blocking(move || {
                            cleanup_old_files(&dir, max_age)
                        });
                        match sweep.await {
                            Ok(Ok(0)) => {}
                            Ok(Ok(deleted)) => info!(deleted, "cleanup sweep finished"),
                            Ok(Err(err)) => error!(error = %err, "error during cleanup"),
                            Err(err) => error!(error = %err, "cleanup task failed"),
                        }
                    }
                }
            }
        });

        CleanupScheduler {
            shutdown: Some(tx),
            handle,
        }
    }

    /// Stop the sweep and wait for the task to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(err) = (&mut self.handle).await {
            error!(error = %err, "cleanup scheduler did not stop cleanly");
        }
        info!("cleanup scheduler stopped");
    }
}
