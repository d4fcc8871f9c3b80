//!
//! src/joiner.rs  Andrew Belles  Oct 18th, 2026
//!
//! Fetches acoustic descriptors (and optionally track details) for every track
//! of an assembled mapping and builds unscored track records from them.
//! Lookups may run on a bounded worker pool; output order is always the
//! mapping's order and the first failure aborts the whole join.
//!

use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, info, warn};

use crate::config::ConcurrencyConfig;
use crate::errors::SbiError;
use crate::lookup::CatalogLookup;
use crate::title_map::TitleMap;
use crate::types::{TrackId, TrackRecord};

#[derive(Debug, Clone)]
pub struct JoinOptions {
    pub concurrency: usize,
    pub fetch_duration: bool
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self::from(&ConcurrencyConfig::default())
    }
}

impl From<&ConcurrencyConfig> for JoinOptions {
    fn from(cfg: &ConcurrencyConfig) -> Self {
        Self {
            concurrency: cfg.feature_concurrency.max(1),
            fetch_duration: cfg.fetch_duration
        }
    }
}

/// Builds one fully populated record or fails with the track's identifier
async fn fetch_record<L>(
    lookup: &L,
    title: String,
    id: TrackId,
    fetch_duration: bool
) -> Result<TrackRecord, SbiError>
where
    L: CatalogLookup + ?Sized
{
    let features = match lookup.get_audio_features(&id).await {
        Ok(f) => f,
        Err(SbiError::FeatureNotFound(_)) => {
            return Err(SbiError::FeatureLookup {
                identifier: id.0,
                reason: "provider has no audio features".into()
            });
        }
        Err(e) => return Err(e)
    };
    features.validate().map_err(|reason| SbiError::FeatureLookup {
        identifier: id.0.clone(),
        reason
    })?;

    let meta = if fetch_duration {
        lookup.get_track_meta(&id).await?
    } else {
        None
    };

    debug!(track = %id, energy = features.energy, valence = features.valence, "join.track");
    Ok(TrackRecord::new(title, id, features).with_meta(meta))
}

/// `join(trackMapping)`: one record per mapping entry, in mapping order
pub async fn join<L>(
    lookup: Arc<L>,
    tracks: &TitleMap<TrackId>,
    opts: &JoinOptions
) -> Result<Vec<TrackRecord>, SbiError>
where
    L: CatalogLookup + ?Sized + 'static
{
    info!(tracks = tracks.len(), concurrency = opts.concurrency, "join.start");

    let records = if opts.concurrency <= 1 {
        join_sequential(lookup.as_ref(), tracks, opts).await?
    } else {
        join_pooled(lookup, tracks, opts).await?
    };

    info!(records = records.len(), "join.done");
    Ok(records)
}

async fn join_sequential<L>(
    lookup: &L,
    tracks: &TitleMap<TrackId>,
    opts: &JoinOptions
) -> Result<Vec<TrackRecord>, SbiError>
where
    L: CatalogLookup + ?Sized
{
    let mut records = Vec::with_capacity(tracks.len());
    for entry in tracks {
        records.push(
            fetch_record(lookup, entry.title.clone(), entry.value.clone(), opts.fetch_duration)
                .await?
        );
    }
    Ok(records)
}

async fn join_pooled<L>(
    lookup: Arc<L>,
    tracks: &TitleMap<TrackId>,
    opts: &JoinOptions
) -> Result<Vec<TrackRecord>, SbiError>
where
    L: CatalogLookup + ?Sized + 'static
{
    let permits = Arc::new(Semaphore::new(opts.concurrency));
    let mut workers = JoinSet::new();

    for (index, entry) in tracks.iter().enumerate() {
        let lookup = lookup.clone();
        let permits = permits.clone();
        let title = entry.title.clone();
        let id = entry.value.clone();
        let fetch_duration = opts.fetch_duration;

        workers.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| SbiError::Cancelled(format!("worker pool closed: {e}")))?;
            fetch_record(lookup.as_ref(), title, id, fetch_duration)
                .await
                .map(|record| (index, record))
        });
    }

    // completion order is arbitrary, slot results back into mapping order
    let mut slots: Vec<Option<TrackRecord>> = vec![None; tracks.len()];
    while let Some(joined) = workers.join_next().await {
        match joined? {
            Ok((index, record)) => slots[index] = Some(record),
            Err(e) => {
                warn!(error = %e, outstanding = workers.len(), "join.abort");
                workers.abort_all();
                return Err(e);
            }
        }
    }

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| SbiError::Worker("feature worker finished without a record".into()))
}
