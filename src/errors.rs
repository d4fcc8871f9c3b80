//!
//! src/errors.rs  Andrew Belles  Oct 18th, 2026
//!
//! Defines enums and methods of error conversion
//! for errors the pipeline and the catalog adapter use
//!
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SbiError {
    #[error("artist not found: {0}")]
    ArtistNotFound(String),
    #[error("excluded album not in catalog: {0}")]
    UnknownAlbum(String),
    #[error("feature lookup failed for {identifier}: {reason}")]
    FeatureLookup { identifier: String, reason: String },
    #[error("audio features not available: {0}")]
    FeatureNotFound(String),
    #[error("empty catalog: {0}")]
    EmptyCatalog(String),
    #[error("record not scored: {0}")]
    Unscored(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("rate limited: retry {0:?}")]
    RateLimited(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("csv error: {0}")]
    Csv(String),
    #[error("worker failed: {0}")]
    Worker(String),
    #[error("cancelled: {0}")]
    Cancelled(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error)
}

impl From<reqwest::Error> for SbiError {
    fn from(e: reqwest::Error) -> Self { SbiError::Http(e.to_string()) }
}

impl From<serde_json::Error> for SbiError {
    fn from(e: serde_json::Error) -> Self { SbiError::Parse(e.to_string()) }
}

impl From<csv::Error> for SbiError {
    fn from(e: csv::Error) -> Self { SbiError::Csv(e.to_string()) }
}

impl From<tokio::task::JoinError> for SbiError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_cancelled() {
            SbiError::Cancelled(e.to_string())
        } else {
            SbiError::Worker(e.to_string())
        }
    }
}
