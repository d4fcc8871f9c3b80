//!
//! src/cli.rs  Andrew Belles  Oct 18th, 2026
//!
//! Command line surface: which artists to score, which of their albums
//! to curate away, and how the run is shaped
//!

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::errors::SbiError;
use crate::pipeline::ArtistRequest;
use crate::scorer::{BrutalityFormula, WeightedBrutality};

#[derive(Parser, Debug)]
#[command(name = "sbi-crawler", version, about = "Sonic brutality index of an artist's studio albums")]
pub struct Args {
    /// Artist display name to score
    pub artist: String,

    /// Album title to drop from the artist's studio albums (repeatable)
    #[arg(long = "exclude", value_name = "TITLE")]
    pub exclude: Vec<String>,

    /// Second artist to score and compare against
    #[arg(long)]
    pub compare: Option<String>,

    /// Album title to drop from the comparison artist (repeatable)
    #[arg(long = "compare-exclude", value_name = "TITLE", requires = "compare")]
    pub compare_exclude: Vec<String>,

    /// Number of tracks in each ranking
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Directory for the csv output, overrides SBI_OUTPUT_DIR
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Parallel feature lookups, overrides SBI_FEATURE_CONCURRENCY (1 = sequential)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Track title to show in detail, looked up in every scored catalog (repeatable)
    #[arg(long = "track", value_name = "TITLE")]
    pub tracks: Vec<String>,

    /// Skip the per-track detail lookup (duration, album, preview)
    #[arg(long)]
    pub no_duration: bool,

    /// Score with weights for (1 - valence) and energy instead of an even split
    #[arg(long, num_args = 2, value_names = ["VALENCE", "ENERGY"], allow_negative_numbers = true)]
    pub weights: Option<Vec<f64>>
}

impl Args {
    /// Primary artist first, comparison artist second
    pub fn requests(&self) -> Vec<ArtistRequest> {
        let mut requests = vec![ArtistRequest::new(&self.artist, self.exclude.clone())];
        if let Some(other) = &self.compare {
            requests.push(ArtistRequest::new(other, self.compare_exclude.clone()));
        }
        requests
    }

    pub fn formula(&self) -> Result<Option<Arc<dyn BrutalityFormula>>, SbiError> {
        match self.weights.as_deref() {
            None => Ok(None),
            Some(&[valence, energy]) => {
                Ok(Some(Arc::new(WeightedBrutality::new(valence, energy)?)))
            }
            Some(other) => Err(SbiError::InvalidArgument(
                format!("expected two weights, got {}", other.len())
            ))
        }
    }
}
