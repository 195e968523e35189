use std::{collections::HashSet, path::Path};

use crate::{
    error::AcquireError,
    info,
    management::SessionStore,
    pipeline::{CatalogResolver, MediaAcquirer, SourceLocator},
    success,
    types::{AcquisitionReport, MediaSource, SkipReason, TrackOutcome, TrackStatus},
    utils, warning,
};

/// Progress notifications emitted while a playlist is processed.
#[derive(Debug)]
pub enum Progress<'a> {
    /// The playlist resolved to this many tracks.
    Resolved(usize),
    /// Track `index` (0-based) has been attempted.
    Track(usize, &'a TrackOutcome),
}

/// Drives one playlist request from reference to files on disk.
///
/// Tracks are processed one at a time in playlist order. A track that cannot
/// be found, downloaded or converted is recorded as skipped and the next one
/// is attempted; only a failure to resolve the playlist fails the request.
pub struct Orchestrator {
    resolver: CatalogResolver,
    locator: SourceLocator,
    acquirer: MediaAcquirer,
    store: SessionStore,
}

impl Orchestrator {
    pub fn new(
        resolver: CatalogResolver,
        locator: SourceLocator,
        acquirer: MediaAcquirer,
        store: SessionStore,
    ) -> Self {
        Self {
            resolver,
            locator,
            acquirer,
            store,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn submit(&self, reference: &str) -> Result<AcquisitionReport, AcquireError> {
        self.submit_observed(reference, |_| {}).await
    }

    pub async fn submit_observed<F>(
        &self,
        reference: &str,
        mut observe: F,
    ) -> Result<AcquisitionReport, AcquireError>
    where
        F: FnMut(Progress<'_>),
    {
        let playlist_id = utils::parse_playlist_reference(reference)?;

        let session = self.store.create().await?;
        info!("Session {} created for playlist {}", session.id, playlist_id);

        let tracks = match self.resolver.resolve(&playlist_id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warning!("Failed to resolve playlist {}: {}", playlist_id, e);
                return Err(e);
            }
        };
        observe(Progress::Resolved(tracks.len()));

        let mut stems: HashSet<String> = HashSet::new();
        let mut outcomes: Vec<TrackOutcome> = Vec::with_capacity(tracks.len());

        for (index, track) in tracks.into_iter().enumerate() {
            let query = utils::build_query(&track);
            let stem = utils::unique_stem(&utils::sanitize_stem(&query), &mut stems);

            let status = match self.acquire_track(&query, &stem, &session.dir).await {
                Ok(file) => TrackStatus::Downloaded { file },
                Err((reason, e)) => {
                    warning!("Failed to download {}: {}", query, e);
                    TrackStatus::Skipped {
                        reason,
                        detail: e.to_string(),
                    }
                }
            };

            outcomes.push(TrackOutcome {
                track,
                query,
                status,
            });
            if let Some(outcome) = outcomes.last() {
                observe(Progress::Track(index, outcome));
            }
        }

        let report = AcquisitionReport {
            session_id: session.id,
            outcomes,
        };
        success!(
            "Session {}: {} of {} tracks downloaded.",
            report.session_id,
            report.downloaded(),
            report.outcomes.len()
        );

        Ok(report)
    }

    async fn acquire_track(
        &self,
        query: &str,
        stem: &str,
        dir: &Path,
    ) -> Result<String, (SkipReason, AcquireError)> {
        let source = self
            .locate(query)
            .await
            .map_err(|e| (SkipReason::SourceNotFound, e))?;

        let path = self
            .acquirer
            .acquire(&source, stem, dir)
            .await
            .map_err(|e| match e {
                AcquireError::TranscodeFailed(_) => (SkipReason::TranscodeFailed, e),
                e => (SkipReason::DownloadFailed, e),
            })?;

        Ok(path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.mp3", stem)))
    }

    /// Primary tier first, fallback tier only if the primary fails.
    async fn locate(&self, query: &str) -> Result<MediaSource, AcquireError> {
        match self.locator.primary(query).await {
            Ok(source) => Ok(source),
            Err(primary) => {
                info!("Primary search failed for '{}': {}", query, primary);
                self.locator
                    .fallback(query)
                    .await
                    .map_err(|fallback| {
                        AcquireError::SourceNotFound(format!("{} ({})", query, fallback))
                    })
            }
        }
    }
}
