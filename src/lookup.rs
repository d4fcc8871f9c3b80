//!
//! src/lookup.rs  Andrew Belles  Oct 18th, 2026
//!
//! Capability set the pipeline consumes from a remote catalog provider.
//! The pipeline only ever sees this trait; the spotify client in fetch.rs
//! is one implementation, the in-memory mock below is another.
//!

use async_trait::async_trait;

use crate::errors::SbiError;
use crate::types::{
    AlbumCategory, AlbumId, AlbumRef, ArtistId, ArtistRef, AudioFeatures,
    TrackId, TrackMeta, TrackRef
};

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Candidates in provider ranking order, possibly empty
    async fn search_artist(&self, name: &str) -> Result<Vec<ArtistRef>, SbiError>;

    async fn list_albums(
        &self,
        artist: &ArtistId,
        category: AlbumCategory
    ) -> Result<Vec<AlbumRef>, SbiError>;

    async fn list_tracks(&self, album: &AlbumId) -> Result<Vec<TrackRef>, SbiError>;

    /// Fails with `SbiError::FeatureNotFound` when the provider has no descriptors
    async fn get_audio_features(&self, track: &TrackId) -> Result<AudioFeatures, SbiError>;

    /// Optional capability. `Ok(None)` leaves duration, album and preview unset.
    async fn get_track_meta(&self, _track: &TrackId) -> Result<Option<TrackMeta>, SbiError> {
        Ok(None)
    }
}
