//!
//! src/types.rs  Andrew Belles  Oct 18th, 2026
//!
//! Catalog references handed out by the lookup adapter and the
//! track record the scorer and reporter operate on
//!

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlbumId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub String);

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Provider release category used to filter artist albums at query time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumCategory {
    Album
}

impl AlbumCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AlbumCategory::Album => "album"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRef {
    pub id: ArtistId,
    pub name: String
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRef {
    pub id: AlbumId,
    pub title: String
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRef {
    pub id: TrackId,
    pub title: String
}

/// Acoustic descriptors for one track, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64
}

impl AudioFeatures {
    /// Rejects descriptors outside the unit interval (NaN included)
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("energy", self.energy),
            ("valence", self.valence),
            ("danceability", self.danceability)
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} out of range: {value}"));
            }
        }
        Ok(())
    }
}

/// Per-track details from the provider's track endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMeta {
    pub duration_ms: Option<u64>,
    pub album: Option<String>,
    pub preview_url: Option<String>
}

///
/// One fully joined track. `sbi` stays `None` until the scorer has run,
/// every other numeric field is populated at construction.
///
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub title: String,
    pub identifier: TrackId,
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
    pub duration_sec: Option<f64>,
    pub album: Option<String>,
    pub preview_url: Option<String>,
    pub sbi: Option<f64>
}

impl TrackRecord {
    pub fn new(title: String, identifier: TrackId, features: AudioFeatures) -> Self {
        Self {
            title,
            identifier,
            energy: features.energy,
            valence: features.valence,
            danceability: features.danceability,
            duration_sec: None,
            album: None,
            preview_url: None,
            sbi: None
        }
    }

    /// Copies duration, album and preview over; `None` clears them
    pub fn with_meta(mut self, meta: Option<TrackMeta>) -> Self {
        let meta = meta.unwrap_or_default();
        self.duration_sec = meta.duration_ms.map(|ms| ms as f64 / 1000.0);
        self.album = meta.album;
        self.preview_url = meta.preview_url;
        self
    }

    /// Score of a record that went through the scorer
    pub fn scored(&self) -> Result<f64, crate::errors::SbiError> {
        self.sbi.ok_or_else(|| crate::errors::SbiError::Unscored(self.identifier.0.clone()))
    }
}

/// Ordered, identifier unique, scored records of one artist
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub artist: String,
    pub records: Vec<TrackRecord>
}

/// Dedup key for album and track titles: unicode lowercase of the trimmed
/// title. `to_lowercase` does not consult the process locale and maps one
/// char to its lowercase form, so "Straße" and "STRASSE" stay distinct.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
