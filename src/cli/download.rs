use std::time::Duration;

use indicatif::ProgressBar;
use tabled::Table;

use crate::{
    cli, error,
    pipeline::Progress,
    success,
    types::{TrackStatus, TrackTableRow},
    warning,
};

pub async fn download(playlist: String) {
    let orchestrator = match cli::build_orchestrator() {
        Ok(o) => o,
        Err(e) => error!("Cannot set up the download pipeline. Err: {}", e),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message("Resolving playlist...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(cli::spinner_style());

    let result = orchestrator
        .submit_observed(&playlist, |progress| match progress {
            Progress::Resolved(total) => {
                pb.disable_steady_tick();
                pb.set_style(cli::bar_style());
                pb.set_length(total as u64);
                pb.set_message("");
            }
            Progress::Track(_, outcome) => {
                pb.inc(1);
                pb.set_message(outcome.query.clone());
            }
        })
        .await;
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => error!("Cannot download playlist. Err: {}", e),
    };

    if report.outcomes.is_empty() {
        warning!("The playlist is empty.");
        return;
    }

    let rows: Vec<TrackTableRow> = report
        .outcomes
        .iter()
        .map(|o| match &o.status {
            TrackStatus::Downloaded { file } => TrackTableRow {
                track: o.query.clone(),
                status: "downloaded".to_string(),
                detail: file.clone(),
            },
            TrackStatus::Skipped { reason, detail } => TrackTableRow {
                track: o.query.clone(),
                status: format!("{:?}", reason),
                detail: detail.clone(),
            },
        })
        .collect();

    println!("{}", Table::new(rows));

    let dir = orchestrator.store().root().join(&report.session_id);
    success!(
        "{} of {} tracks saved to {}",
        report.downloaded(),
        report.outcomes.len(),
        dir.display()
    );
}
