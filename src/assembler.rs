//!
//! src/assembler.rs  Andrew Belles  Oct 18th, 2026
//!
//! Resolves an artist to a curated, deduplicated and ordered mapping of
//! track titles to track ids. Albums and tracks are both keyed by their
//! normalized title, so reissues and cross album duplicates collapse
//! (last write wins, see title_map.rs).
//!

use std::collections::HashSet;

use tracing::{debug, info};

use crate::errors::SbiError;
use crate::lookup::CatalogLookup;
use crate::title_map::TitleMap;
use crate::types::{AlbumCategory, AlbumId, ArtistRef, TrackId, normalize_title};

/// First candidate in provider ranking. The ranking is never re-sorted.
pub async fn resolve_artist<L>(lookup: &L, name: &str) -> Result<ArtistRef, SbiError>
where
    L: CatalogLookup + ?Sized
{
    let candidates = lookup.search_artist(name).await?;
    debug!(query = %name, candidates = candidates.len(), "assemble.search");
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| SbiError::ArtistNotFound(name.to_string()))
}

/// Studio albums of the artist minus the exclusion list.
///
/// Every excluded title must be present in the fetched set, otherwise the
/// whole curation fails with `UnknownAlbum`. Repeated exclusions are
/// collapsed before checking.
pub async fn curated_albums<L>(
    lookup: &L,
    artist: &ArtistRef,
    excluded: &[String]
) -> Result<TitleMap<AlbumId>, SbiError>
where
    L: CatalogLookup + ?Sized
{
    let mut albums: TitleMap<AlbumId> = lookup
        .list_albums(&artist.id, AlbumCategory::Album)
        .await?
        .into_iter()
        .map(|album| (album.title, album.id))
        .collect();
    debug!(artist = %artist.name, albums = albums.len(), "assemble.albums");

    // normalized keys in caller order, repeats dropped
    let mut seen = HashSet::new();
    let mut exclusions = Vec::with_capacity(excluded.len());
    for title in excluded {
        let key = normalize_title(title);
        if !seen.insert(key.clone()) {
            continue;
        }
        if !albums.contains(&key) {
            return Err(SbiError::UnknownAlbum(title.clone()));
        }
        exclusions.push(key);
    }
    for key in &exclusions {
        albums.remove(key);
    }
    Ok(albums)
}

/// Builds the track mapping for an already resolved artist
pub async fn assemble_for<L>(
    lookup: &L,
    artist: &ArtistRef,
    excluded: &[String]
) -> Result<TitleMap<TrackId>, SbiError>
where
    L: CatalogLookup + ?Sized
{
    let albums = curated_albums(lookup, artist, excluded).await?;
    info!(artist = %artist.name, albums = albums.len(), excluded = excluded.len(),
        "assemble.curated");

    let mut tracks: TitleMap<TrackId> = TitleMap::new();
    for album in &albums {
        let listing: TitleMap<TrackId> = lookup
            .list_tracks(&album.value)
            .await?
            .into_iter()
            .map(|track| (track.title, track.id))
            .collect();
        debug!(album = %album.title, tracks = listing.len(), "assemble.tracks");
        tracks.merge(listing);
    }

    info!(artist = %artist.name, tracks = tracks.len(), "assemble.done");
    Ok(tracks)
}

/// `assemble(artist_name, excluded)`: resolve then build the track mapping
pub async fn assemble<L>(
    lookup: &L,
    artist_name: &str,
    excluded: &[String]
) -> Result<TitleMap<TrackId>, SbiError>
where
    L: CatalogLookup + ?Sized
{
    let artist = resolve_artist(lookup, artist_name).await?;
    assemble_for(lookup, &artist, excluded).await
}
