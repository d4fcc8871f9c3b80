//!
//! src/reporter.rs  Andrew Belles  Oct 18th, 2026
//!
//! Descriptive statistics over scored catalogs: means, extrema with a
//! first-in-order tie break, stable top-n rankings and a plain text
//! comparison across artists. Means are exposed raw, no winner is declared.
//!

use std::fmt;

use crate::errors::SbiError;
use crate::types::{Catalog, TrackRecord, normalize_title};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max
}

/// Per-track value a statistic can be taken over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    Sbi,
    Energy,
    Valence,
    Danceability
}

impl Descriptor {
    pub fn value(self, record: &TrackRecord) -> Result<f64, SbiError> {
        match self {
            Descriptor::Sbi          => record.scored(),
            Descriptor::Energy       => Ok(record.energy),
            Descriptor::Valence      => Ok(record.valence),
            Descriptor::Danceability => Ok(record.danceability)
        }
    }
}

fn empty() -> SbiError {
    SbiError::EmptyCatalog("statistic over zero records".into())
}

/// Arithmetic mean of `descriptor`
pub fn mean_of(records: &[TrackRecord], descriptor: Descriptor) -> Result<f64, SbiError> {
    if records.is_empty() {
        return Err(empty());
    }
    let mut total = 0.0;
    for record in records {
        total += descriptor.value(record)?;
    }
    Ok(total / records.len() as f64)
}

/// `meanScore(sequence)`
pub fn mean_score(records: &[TrackRecord]) -> Result<f64, SbiError> {
    mean_of(records, Descriptor::Sbi)
}

/// Record achieving the extremum of `descriptor`; on ties the earliest wins
pub fn extremal_by(
    records: &[TrackRecord],
    descriptor: Descriptor,
    which: Extremum
) -> Result<&TrackRecord, SbiError> {
    let mut best: Option<(f64, &TrackRecord)> = None;
    for record in records {
        let value = descriptor.value(record)?;
        let better = match best {
            None => true,
            Some((current, _)) => match which {
                Extremum::Min => value < current,
                Extremum::Max => value > current
            }
        };
        if better {
            best = Some((value, record));
        }
    }
    best.map(|(_, record)| record).ok_or_else(empty)
}

/// `extremal(sequence, which)` over sbi
pub fn extremal(records: &[TrackRecord], which: Extremum) -> Result<&TrackRecord, SbiError> {
    extremal_by(records, Descriptor::Sbi, which)
}

/// `topN(sequence, n)`: largest sbi first, ties in sequence order.
/// Shorter sequences are returned whole.
pub fn top_n(records: &[TrackRecord], n: usize) -> Result<Vec<TrackRecord>, SbiError> {
    let mut ranked = records
        .iter()
        .map(|record| record.scored().map(|sbi| (sbi, record)))
        .collect::<Result<Vec<_>, _>>()?;

    // sort_by is stable
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    Ok(ranked.into_iter().take(n).map(|(_, record)| record.clone()).collect())
}

/// Record whose title matches under title normalization, first in order
pub fn find_by_title<'a>(records: &'a [TrackRecord], title: &str) -> Option<&'a TrackRecord> {
    let key = normalize_title(title);
    records.iter().find(|record| normalize_title(&record.title) == key)
}

/// Single-track view: descriptors, score and where the track comes from
pub struct TrackDetail<'a>(pub &'a TrackRecord);

impl fmt::Display for TrackDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        write!(f, "{} [{}] sbi {}  energy {:.3}  valence {:.3}  danceability {:.3}",
            record.title, record.identifier, sbi_cell(record),
            record.energy, record.valence, record.danceability)?;
        if let Some(origin) = origin(record) {
            write!(f, "\n  {origin}")?;
        }
        Ok(())
    }
}

fn origin(record: &TrackRecord) -> Option<String> {
    match (&record.album, &record.preview_url) {
        (None, None) => None,
        (album, preview) => Some(format!(
            "album: {}  preview: {}",
            album.as_deref().unwrap_or("-"),
            preview.as_deref().unwrap_or("-")
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistSummary {
    pub artist: String,
    pub tracks: usize,
    pub mean_sbi: f64,
    pub mean_energy: f64,
    pub mean_valence: f64,
    pub mean_danceability: f64,
    pub total_minutes: Option<f64>,
    pub most_brutal: TrackRecord,
    pub least_brutal: TrackRecord,
    pub lowest_energy: TrackRecord,
    pub top: Vec<TrackRecord>
}

/// Summary of one catalog; fails with `EmptyCatalog` naming the artist
pub fn summarize(catalog: &Catalog, n: usize) -> Result<ArtistSummary, SbiError> {
    let records = &catalog.records;
    if records.is_empty() {
        return Err(SbiError::EmptyCatalog(catalog.artist.clone()));
    }

    // only meaningful when every record carries a duration
    let total_minutes = records
        .iter()
        .map(|r| r.duration_sec)
        .sum::<Option<f64>>()
        .map(|secs| secs / 60.0);

    Ok(ArtistSummary {
        artist: catalog.artist.clone(),
        tracks: records.len(),
        mean_sbi: mean_score(records)?,
        mean_energy: mean_of(records, Descriptor::Energy)?,
        mean_valence: mean_of(records, Descriptor::Valence)?,
        mean_danceability: mean_of(records, Descriptor::Danceability)?,
        total_minutes,
        most_brutal: extremal(records, Extremum::Max)?.clone(),
        least_brutal: extremal(records, Extremum::Min)?.clone(),
        lowest_energy: extremal_by(records, Descriptor::Energy, Extremum::Min)?.clone(),
        top: top_n(records, n)?
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub summaries: Vec<ArtistSummary>
}

impl ComparisonReport {
    /// Raw mean sbi per artist, in input order
    pub fn means(&self) -> Vec<(&str, f64)> {
        self.summaries
            .iter()
            .map(|s| (s.artist.as_str(), s.mean_sbi))
            .collect()
    }
}

/// One summary per catalog, in the order given
pub fn compare(catalogs: &[Catalog], n: usize) -> Result<ComparisonReport, SbiError> {
    if catalogs.is_empty() {
        return Err(SbiError::InvalidArgument("nothing to compare".into()));
    }
    let summaries = catalogs
        .iter()
        .map(|catalog| summarize(catalog, n))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ComparisonReport { summaries })
}

fn sbi_cell(record: &TrackRecord) -> String {
    record.sbi.map(|s| format!("{s:.3}")).unwrap_or_else(|| "-".into())
}

impl fmt::Display for ArtistSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} tracks)", self.artist, self.tracks)?;
        writeln!(f, "  mean sbi      : {:.3}", self.mean_sbi)?;
        write!(f, "  energy {:.3}  valence {:.3}  danceability {:.3}",
            self.mean_energy, self.mean_valence, self.mean_danceability)?;
        if let Some(minutes) = self.total_minutes {
            write!(f, "  runtime {minutes:.1} min")?;
        }
        writeln!(f)?;
        writeln!(f, "  most brutal   : {} ({})", self.most_brutal.title, sbi_cell(&self.most_brutal))?;
        if let Some(origin) = origin(&self.most_brutal) {
            writeln!(f, "                  {origin}")?;
        }
        writeln!(f, "  least brutal  : {} ({})", self.least_brutal.title, sbi_cell(&self.least_brutal))?;
        writeln!(f, "  lowest energy : {} ({:.3})", self.lowest_energy.title, self.lowest_energy.energy)?;
        if let Some(origin) = origin(&self.lowest_energy) {
            writeln!(f, "                  {origin}")?;
        }
        writeln!(f, "  top {}:", self.top.len())?;
        for (rank, record) in self.top.iter().enumerate() {
            writeln!(f, "    {:>2}. {}  {}", rank + 1, sbi_cell(record), record.title)?;
        }
        Ok(())
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for summary in &self.summaries {
            writeln!(f, "{summary}")?;
        }
        for (artist, mean) in self.means() {
            writeln!(f, "Mean Brutality Score for {artist}: {mean:.2}")?;
        }
        Ok(())
    }
}
