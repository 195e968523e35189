use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, TimeDelta, Utc};
use futures_util::StreamExt;
use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;

use crate::{info, types::SweepReport, warning};

/// How long files are kept and how often the sweeper looks for old ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub max_age: TimeDelta,
    pub interval: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_age: TimeDelta::days(5),
            interval: Duration::from_secs(60 * 60),
        }
    }
}

/// Deletes session files older than the retention age and prunes session
/// directories left empty.
///
/// There is no coordination with readers: a file can vanish while a listing or
/// archive request is looking at it.
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    root: PathBuf,
    policy: RetentionPolicy,
}

impl RetentionSweeper {
    pub fn new(root: impl Into<PathBuf>, policy: RetentionPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    pub async fn sweep(&self) -> SweepReport {
        self.sweep_at(Utc::now()).await
    }

    /// One sweep cycle, judging file age against `now`.
    ///
    /// Failures are collected in the report; they never stop the cycle.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();

        let mut sessions = match async_fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return report,
            Err(e) => {
                record(&mut report, &self.root, e);
                return report;
            }
        };

        while let Some(entry) = sessions.next().await {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    record(&mut report, &self.root, e);
                    continue;
                }
            };

            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => {}
                Ok(_) => continue,
                Err(e) => {
                    record(&mut report, &entry.path(), e);
                    continue;
                }
            }

            let dir = entry.path();
            if let Err(e) = self.sweep_dir(&dir, now, &mut report).await {
                record(&mut report, &dir, e);
            }
        }

        report
    }

    async fn sweep_dir(
        &self,
        dir: &Path,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) -> std::io::Result<()> {
        let mut entries = async_fs::read_dir(dir).await?;

        while let Some(entry) = entries.next().await {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    record(report, dir, e);
                    continue;
                }
            };

            if let Err(e) = self.sweep_file(&path, now, report).await {
                record(report, &path, e);
            }
        }

        let mut remaining = async_fs::read_dir(dir).await?;
        if remaining.next().await.is_none() {
            async_fs::remove_dir(dir).await?;
            info!("Removed empty session folder: {}", dir.display());
            report.removed_dirs.push(dir.to_path_buf());
        }

        Ok(())
    }

    async fn sweep_file(
        &self,
        path: &Path,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) -> std::io::Result<()> {
        let meta = async_fs::symlink_metadata(path).await?;
        if !meta.is_file() {
            return Ok(());
        }

        let modified: DateTime<Utc> = meta.modified()?.into();
        if now - modified > self.policy.max_age {
            async_fs::remove_file(path).await?;
            info!("Deleted old file: {}", path.display());
            report.deleted_files.push(path.to_path_buf());
        }

        Ok(())
    }

    /// Sweeps on every interval tick, starting immediately, until `cancel`
    /// fires.
    ///
    /// Each cycle runs in its own task, so even a panic inside a cycle is
    /// logged and the next tick is still scheduled.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = interval(self.policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let sweeper = self.clone();
                    match tokio::spawn(async move { sweeper.sweep().await }).await {
                        Ok(report) => {
                            if !report.deleted_files.is_empty() || !report.removed_dirs.is_empty() {
                                info!(
                                    "Cleanup removed {} files and {} folders.",
                                    report.deleted_files.len(),
                                    report.removed_dirs.len()
                                );
                            }
                        }
                        Err(e) => warning!("Cleanup cycle aborted: {}", e),
                    }
                }
            }
        }

        info!("Retention sweeper stopped.");
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}

fn record(report: &mut SweepReport, path: &Path, e: std::io::Error) {
    warning!("Cleanup failed for {}: {}", path.display(), e);
    report.failures.push(format!("{}: {}", path.display(), e));
}
