//!
//! src/scorer.rs  Andrew Belles  Oct 18th, 2026
//!
//! Sonic brutality index: the mean of energy and inverted valence, so the
//! loudest and darkest tracks land near 1.0. Alternate weightings plug in
//! through `BrutalityFormula`.
//!

use tracing::debug;

use crate::errors::SbiError;
use crate::types::TrackRecord;

/// `sbi = ((1 - valence) + energy) / 2`
pub fn sonic_brutality(valence: f64, energy: f64) -> f64 {
    ((1.0 - valence) + energy) / 2.0
}

pub trait BrutalityFormula: Send + Sync {
    fn name(&self) -> &'static str;

    /// Must map valence, energy in [0, 1] into [0, 1]
    fn score(&self, valence: f64, energy: f64) -> f64;
}

/// Equal weighting of energy and (1 - valence)
#[derive(Debug, Clone, Copy, Default)]
pub struct SonicBrutality;

impl BrutalityFormula for SonicBrutality {
    fn name(&self) -> &'static str { "sbi" }

    fn score(&self, valence: f64, energy: f64) -> f64 {
        sonic_brutality(valence, energy)
    }
}

/// Weighted mean of (1 - valence) and energy
#[derive(Debug, Clone, Copy)]
pub struct WeightedBrutality {
    valence_weight: f64,
    energy_weight: f64
}

impl WeightedBrutality {
    pub fn new(valence_weight: f64, energy_weight: f64) -> Result<Self, SbiError> {
        let finite = valence_weight.is_finite() && energy_weight.is_finite();
        if !finite || valence_weight < 0.0 || energy_weight < 0.0 {
            return Err(SbiError::InvalidArgument(format!(
                "weights must be finite and non-negative (valence {valence_weight}, energy {energy_weight})"
            )));
        }
        let total = valence_weight + energy_weight;
        if total == 0.0 {
            return Err(SbiError::InvalidArgument("weights sum to zero".into()));
        }
        if !total.is_finite() {
            return Err(SbiError::InvalidArgument(format!(
                "weight sum overflows (valence {valence_weight}, energy {energy_weight})"
            )));
        }
        Ok(Self { valence_weight, energy_weight })
    }
}

impl BrutalityFormula for WeightedBrutality {
    fn name(&self) -> &'static str { "weighted-sbi" }

    fn score(&self, valence: f64, energy: f64) -> f64 {
        let total = self.valence_weight + self.energy_weight;
        (self.valence_weight * (1.0 - valence) + self.energy_weight * energy) / total
    }
}

/// `score(record)` under the default formula
pub fn score(record: &TrackRecord) -> f64 {
    SonicBrutality.score(record.valence, record.energy)
}

/// Returns new records with `sbi` populated by `formula`
pub fn score_all<F>(records: Vec<TrackRecord>, formula: &F) -> Vec<TrackRecord>
where
    F: BrutalityFormula + ?Sized
{
    debug!(formula = formula.name(), records = records.len(), "score.start");
    records
        .into_iter()
        .map(|record| {
            let sbi = formula.score(record.valence, record.energy);
            TrackRecord { sbi: Some(sbi), ..record }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AudioFeatures, TrackId};

    fn record(id: &str, energy: f64, valence: f64) -> TrackRecord {
        TrackRecord::new(
            id.to_string(),
            TrackId(id.to_string()),
            AudioFeatures { energy, valence, danceability: 0.3 }
        )
    }

    #[test]
    fn reference_points() {
        assert_eq!(sonic_brutality(0.0, 1.0), 1.0);
        assert_eq!(sonic_brutality(1.0, 0.0), 0.0);
        assert_eq!(sonic_brutality(0.5, 0.5), 0.5);
    }

    #[test]
    fn stays_inside_unit_interval() {
        let steps: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        for &v in &steps {
            for &e in &steps {
                let s = sonic_brutality(v, e);
                assert!((0.0..=1.0).contains(&s), "v={v} e={e} -> {s}");
            }
        }
    }

    #[test]
    fn score_reads_record_fields() {
        let r = record("t1", 0.9, 0.1);
        assert!((score(&r) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn score_all_populates_every_record() {
        let scored = score_all(vec![record("t1", 0.9, 0.1), record("t2", 0.2, 0.8)],
            &SonicBrutality);
        let values: Vec<f64> = scored.iter().filter_map(|r| r.sbi).collect();
        assert_eq!(values.len(), 2);
        assert!((values[0] - 0.9).abs() < 1e-12);
        assert!((values[1] - 0.2).abs() < 1e-12);
        assert_eq!(scored[1].identifier.0, "t2");
    }

    #[test]
    fn equal_weights_match_default_formula() -> Result<(), SbiError> {
        let weighted = WeightedBrutality::new(2.0, 2.0)?;
        assert!((weighted.score(0.3, 0.8) - sonic_brutality(0.3, 0.8)).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn energy_only_weighting() -> Result<(), SbiError> {
        let weighted = WeightedBrutality::new(0.0, 1.0)?;
        assert_eq!(weighted.score(0.9, 0.4), 0.4);
        Ok(())
    }

    #[test]
    fn bad_weights_are_rejected() {
        assert!(WeightedBrutality::new(-1.0, 1.0).is_err());
        assert!(WeightedBrutality::new(0.0, 0.0).is_err());
        assert!(WeightedBrutality::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn overflowing_weight_sum_is_rejected() -> Result<(), SbiError> {
        assert!(matches!(WeightedBrutality::new(f64::MAX, f64::MAX),
            Err(SbiError::InvalidArgument(_))));

        let huge = WeightedBrutality::new(f64::MAX / 4.0, f64::MAX / 4.0)?;
        let steps: Vec<f64> = (0..=10).map(|i| i as f64 / 10.0).collect();
        for &v in &steps {
            for &e in &steps {
                let s = huge.score(v, e);
                assert!((0.0..=1.0).contains(&s), "v={v} e={e} -> {s}");
            }
        }
        Ok(())
    }
}
