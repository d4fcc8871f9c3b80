//!
//! src/sink.rs  Andrew Belles  Oct 18th, 2026
//!
//! Writes scored catalogs as flat csv files. Column order is the only
//! compatibility contract of the output.
//!

use std::{fs, path::{Path, PathBuf}};

use serde::Serialize;
use tracing::info;

use crate::errors::SbiError;
use crate::types::{Catalog, TrackRecord};

pub const COLUMNS: [&str; 7] = [
    "title", "identifier", "energy", "valence", "danceability", "sbi", "duration_sec"
];

/// Row layout, field order must follow `COLUMNS`
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    identifier: &'a str,
    energy: f64,
    valence: f64,
    danceability: f64,
    sbi: f64,
    duration_sec: Option<f64>
}

impl<'a> CsvRow<'a> {
    fn from_record(record: &'a TrackRecord) -> Result<Self, SbiError> {
        Ok(Self {
            title: &record.title,
            identifier: &record.identifier.0,
            energy: record.energy,
            valence: record.valence,
            danceability: record.danceability,
            sbi: record.scored()?,
            duration_sec: record.duration_sec
        })
    }
}

pub struct CsvSink {
    root: PathBuf
}

impl CsvSink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// `<root>/<artist slug>.csv`
    pub fn path_for(&self, artist: &str) -> PathBuf {
        self.root.join(format!("{}.csv", Self::sanitize_key(artist)))
    }

    /// Writes the catalog through a temp file so readers never see a
    /// partial table
    pub fn write_catalog(&self, catalog: &Catalog) -> Result<PathBuf, SbiError> {
        let path = self.path_for(&catalog.artist);
        fs::create_dir_all(&self.root).map_err(|e| SbiError::Csv(
            format!("create dir {}: {e}", self.root.display())
        ))?;

        let temp = tempfile::NamedTempFile::new_in(&self.root).map_err(|e| SbiError::Csv(
            format!("tempfile in {}: {e}", self.root.display())
        ))?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(temp.as_file());
            writer.write_record(COLUMNS)?;
            for record in &catalog.records {
                writer.serialize(CsvRow::from_record(record)?)?;
            }
            writer.flush()?;
        }

        temp.persist(&path).map_err(|e|
            SbiError::Csv(format!("persist {}: {e}", path.display())))?;

        info!(artist = %catalog.artist, rows = catalog.records.len(),
            path = %path.display(), "sink.csv.written");
        Ok(path)
    }

    fn sanitize_key(key: &str) -> String {
        let slug: String = key.trim()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        if slug.is_empty() { "catalog".to_string() } else { slug }
    }
}
