//! # Spotify Integration Module
//!
//! Catalog access for the download pipeline. The only thing the pipeline needs
//! from Spotify is playlist membership: for a playlist id, the ordered list of
//! track names and their artists.
//!
//! ## Overview
//!
//! ```text
//! CatalogResolver (pipeline)
//!          ↓  CatalogClient trait
//! SpotifyCatalog
//!     ├── Authentication (client-credentials grant, cached token)
//!     └── Playlist paging (GET /playlists/{id}/tracks, follows `next`)
//!          ↓
//! Spotify Web API
//! ```
//!
//! [`SpotifyCatalog`] is built once at startup from configuration and handed
//! to the resolver, so tests can swap in any other [`CatalogClient`].
//!
//! ## Error Handling
//!
//! Non-2xx responses are returned as errors and retried by the resolver's
//! retry executor. A 401 drops the cached token first, so the next attempt
//! authenticates again.
//!
//! [`CatalogClient`]: crate::pipeline::CatalogClient

pub mod auth;
pub mod playlist;

pub use auth::ClientCredentials;
pub use playlist::SpotifyCatalog;
