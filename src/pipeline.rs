//!
//! src/pipeline.rs  Andrew Belles  Oct 18th, 2026
//!
//! Composes assembler -> joiner -> scorer for one artist at a time. Each
//! stage hands a freshly built value to the next; the pipeline keeps no
//! state between runs beyond the adapter handle it was built with.
//!

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::assembler;
use crate::errors::SbiError;
use crate::joiner::{self, JoinOptions};
use crate::lookup::CatalogLookup;
use crate::scorer::{self, BrutalityFormula, SonicBrutality};
use crate::types::{Catalog, TrackRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRequest {
    pub name: String,
    pub excluded: Vec<String>
}

impl ArtistRequest {
    pub fn new(name: impl Into<String>, excluded: Vec<String>) -> Self {
        Self { name: name.into(), excluded }
    }
}

pub struct Pipeline<L: ?Sized> {
    lookup: Arc<L>,
    join: JoinOptions,
    formula: Arc<dyn BrutalityFormula>,
    shutdown: CancellationToken
}

impl<L> Pipeline<L>
where
    L: CatalogLookup + ?Sized + 'static
{
    pub fn new(lookup: Arc<L>, join: JoinOptions) -> Self {
        Self {
            lookup,
            join,
            formula: Arc::new(SonicBrutality),
            shutdown: CancellationToken::new()
        }
    }

    pub fn with_formula(mut self, formula: Arc<dyn BrutalityFormula>) -> Self {
        self.formula = formula;
        self
    }

    /// Cancelling this token aborts any in-flight run
    pub fn shutdown(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn run(&self, request: &ArtistRequest) -> Result<Catalog, SbiError> {
        tokio::select! {
            () = self.shutdown.cancelled() => {
                warn!(artist = %request.name, "pipeline.cancelled");
                Err(SbiError::Cancelled(format!("run for {}", request.name)))
            }
            r = self.run_stages(request) => r
        }
    }

    /// Runs requests one after another, failing on the first error
    pub async fn run_all(&self, requests: &[ArtistRequest]) -> Result<Vec<Catalog>, SbiError> {
        let mut catalogs = Vec::with_capacity(requests.len());
        for request in requests {
            catalogs.push(self.run(request).await?);
        }
        Ok(catalogs)
    }

    async fn run_stages(&self, request: &ArtistRequest) -> Result<Catalog, SbiError> {
        info!(artist = %request.name, formula = self.formula.name(), "pipeline.start");

        let artist = assembler::resolve_artist(self.lookup.as_ref(), &request.name).await?;
        let tracks = assembler::assemble_for(
            self.lookup.as_ref(), &artist, &request.excluded).await?;
        let joined = joiner::join(self.lookup.clone(), &tracks, &self.join).await?;
        let records = scorer::score_all(unique_identifiers(joined), self.formula.as_ref());

        info!(artist = %artist.name, records = records.len(), "pipeline.done");
        Ok(Catalog { artist: artist.name, records })
    }
}

/// Keeps the first record per identifier
fn unique_identifiers(records: Vec<TrackRecord>) -> Vec<TrackRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let fresh = seen.insert(record.identifier.clone());
            if !fresh {
                warn!(track = %record.identifier, title = %record.title,
                    "pipeline.duplicate_identifier");
            }
            fresh
        })
        .collect()
}
