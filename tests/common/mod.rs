#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use tunegrab::{
    error::AcquireError,
    management::SessionStore,
    pipeline::{
        CatalogClient, CatalogResolver, MediaAcquirer, MediaExtractor, Orchestrator,
        SearchProvider, SourceLocator, Transcoder,
    },
    retry::RetryExecutor,
    types::{PlaylistId, PlaylistItem, PlaylistPage, PlaylistTrack, TrackArtist},
};

pub const PLAYLIST_URL: &str = "https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc";

// Fast retries: two attempts, millisecond delays, no jitter.
pub fn quick_retry() -> RetryExecutor {
    RetryExecutor::new(2, 2.0, false).with_delay_unit(Duration::from_millis(1))
}

pub fn item(title: &str, artists: &[&str]) -> PlaylistItem {
    PlaylistItem {
        track: Some(PlaylistTrack {
            name: title.to_string(),
            artists: artists
                .iter()
                .map(|name| TrackArtist {
                    name: name.to_string(),
                })
                .collect(),
        }),
    }
}

pub fn page(items: Vec<PlaylistItem>, next: Option<&str>) -> PlaylistPage {
    PlaylistPage {
        items,
        next: next.map(String::from),
    }
}

/// Serves `pages` in order; page `i > 0` is reachable through `next = "page-i"`.
#[derive(Default)]
pub struct FakeCatalog {
    pub pages: Vec<PlaylistPage>,
    pub fail: bool,
    pub calls: Mutex<Vec<Option<String>>>,
}

impl FakeCatalog {
    pub fn with_tracks(tracks: &[(&str, &str)]) -> Self {
        let items = tracks
            .iter()
            .map(|(title, artist)| item(title, &[*artist]))
            .collect();
        Self {
            pages: vec![page(items, None)],
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_page(
        &self,
        _playlist_id: &PlaylistId,
        next: Option<&str>,
    ) -> Result<PlaylistPage, AcquireError> {
        self.calls.lock().unwrap().push(next.map(String::from));

        if self.fail {
            return Err(AcquireError::Tool("catalog is down".to_string()));
        }

        let index = match next {
            None => 0,
            Some(cursor) => cursor
                .trim_start_matches("page-")
                .parse::<usize>()
                .map_err(|_| AcquireError::Tool(format!("bad cursor {}", cursor)))?,
        };

        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| AcquireError::Tool(format!("no page {}", index)))
    }
}

#[derive(Default)]
pub struct FakeSearch {
    pub ids: HashMap<String, Vec<String>>,
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeSearch {
    pub fn found(mut self, query: &str, ids: &[&str]) -> Self {
        self.ids
            .insert(query.to_string(), ids.iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn calls_for(&self, query: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(q, _)| q == query)
            .count()
    }
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str, api_key: &str) -> Result<Vec<String>, AcquireError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), api_key.to_string()));

        if self.failing.contains(query) {
            return Err(AcquireError::Tool("quota exceeded".to_string()));
        }

        Ok(self.ids.get(query).cloned().unwrap_or_default())
    }
}

pub struct FakeExtractor {
    pub urls: HashMap<String, Vec<String>>,
    pub failing_downloads: HashSet<String>,
    pub container: String,
    pub searches: Mutex<Vec<String>>,
    pub downloads: Mutex<Vec<String>>,
}

impl Default for FakeExtractor {
    fn default() -> Self {
        Self {
            urls: HashMap::new(),
            failing_downloads: HashSet::new(),
            container: "webm".to_string(),
            searches: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }
}

impl FakeExtractor {
    pub fn found(mut self, query: &str, urls: &[&str]) -> Self {
        self.urls
            .insert(query.to_string(), urls.iter().map(|url| url.to_string()).collect());
        self
    }

    pub fn failing_download(mut self, url: &str) -> Self {
        self.failing_downloads.insert(url.to_string());
        self
    }

    pub fn container(mut self, container: &str) -> Self {
        self.container = container.to_string();
        self
    }

    pub fn searches_for(&self, query: &str) -> usize {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.as_str() == query)
            .count()
    }

    pub fn download_count(&self) -> usize {
        self.downloads.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaExtractor for FakeExtractor {
    async fn search(&self, query: &str) -> Result<Vec<String>, AcquireError> {
        self.searches.lock().unwrap().push(query.to_string());
        Ok(self.urls.get(query).cloned().unwrap_or_default())
    }

    async fn download(&self, url: &str, dir: &Path, stem: &str) -> Result<PathBuf, AcquireError> {
        self.downloads.lock().unwrap().push(url.to_string());

        if self.failing_downloads.contains(url) {
            // an interrupted transfer leaves its partial behind
            std::fs::write(
                dir.join(format!("{}.{}.part", stem, self.container)),
                b"partial",
            )?;
            return Err(AcquireError::Tool(format!("HTTP 403 for {}", url)));
        }

        let path = dir.join(format!("{}.{}", stem, self.container));
        std::fs::write(&path, format!("raw audio from {}", url))?;
        Ok(path)
    }
}

#[derive(Default)]
pub struct FakeTranscoder {
    pub fail: bool,
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn to_mp3(&self, input: &Path, output: &Path) -> Result<(), AcquireError> {
        if self.fail {
            std::fs::write(output, b"partial")?;
            return Err(AcquireError::Tool("ffmpeg: invalid data".to_string()));
        }

        let raw = std::fs::read(input)?;
        std::fs::write(output, [b"ID3".as_slice(), raw.as_slice()].concat())?;
        Ok(())
    }
}

pub struct Fakes {
    pub catalog: Arc<FakeCatalog>,
    pub search: Arc<FakeSearch>,
    pub extractor: Arc<FakeExtractor>,
    pub transcoder: Arc<FakeTranscoder>,
    pub api_keys: Vec<String>,
}

impl Fakes {
    pub fn new(catalog: FakeCatalog, search: FakeSearch, extractor: FakeExtractor) -> Self {
        Self {
            catalog: Arc::new(catalog),
            search: Arc::new(search),
            extractor: Arc::new(extractor),
            transcoder: Arc::new(FakeTranscoder::default()),
            api_keys: vec!["key-1".to_string(), "key-2".to_string()],
        }
    }

    pub fn orchestrator(&self, root: &Path) -> Orchestrator {
        Orchestrator::new(
            CatalogResolver::new(self.catalog.clone(), quick_retry()),
            SourceLocator::new(
                self.search.clone(),
                self.extractor.clone(),
                self.api_keys.clone(),
                quick_retry(),
            ),
            MediaAcquirer::new(
                self.extractor.clone(),
                self.transcoder.clone(),
                quick_retry(),
            ),
            SessionStore::new(root),
        )
    }
}

/// The two-track playlist used by the end-to-end scenarios: "Song A" is found
/// by the primary tier, "Song B" by neither tier.
pub fn two_track_fakes() -> Fakes {
    Fakes::new(
        FakeCatalog::with_tracks(&[("Song A", "Artist X"), ("Song B", "Artist Y")]),
        FakeSearch::default().found("Song A Artist X", &["vidA"]),
        FakeExtractor::default(),
    )
}
