use crate::{config, error, management::RetentionSweeper, success, warning};

pub async fn sweep() {
    let policy = match config::retention() {
        Ok(policy) => policy,
        Err(e) => error!("{}", e),
    };

    let report = RetentionSweeper::new(config::download_root(), policy)
        .sweep()
        .await;

    if !report.failures.is_empty() {
        warning!("{} entries could not be cleaned up.", report.failures.len());
    }

    success!(
        "Removed {} files and {} empty folders older than {} days.",
        report.deleted_files.len(),
        report.removed_dirs.len(),
        policy.max_age.num_days()
    );
}
