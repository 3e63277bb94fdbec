use std::collections::BTreeMap;

use crate::{
    data::tally::TitleTally,
    foundation::error::{PodiumError, PodiumResult},
};

/// A real (non-interpolated) yearly aggregate.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub year: i32,
    pub counts: BTreeMap<String, f64>,
}

impl Snapshot {
    pub fn new(year: i32, counts: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            year,
            counts: counts.into_iter().collect(),
        }
    }

    /// Count for `name`; categories missing from this snapshot read as 0.
    pub fn value(&self, name: &str) -> f64 {
        self.counts.get(name).copied().unwrap_or(0.0)
    }
}

/// Snapshots in year order plus the category order used to break ranking ties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapshotSeries {
    categories: Vec<String>,
    snapshots: Vec<Snapshot>,
}

impl SnapshotSeries {
    /// Build a series from hand-made snapshots.
    ///
    /// Categories are the given list followed by any name found in the snapshots but
    /// not listed, in snapshot order. Snapshots must have strictly increasing years.
    pub fn new(categories: Vec<String>, snapshots: Vec<Snapshot>) -> PodiumResult<Self> {
        if !snapshots.windows(2).all(|w| w[0].year < w[1].year) {
            return Err(PodiumError::animation(
                "snapshots must be sorted by strictly increasing year",
            ));
        }

        let mut categories = categories;
        for snapshot in &snapshots {
            for name in snapshot.counts.keys() {
                if !categories.iter().any(|c| c == name) {
                    categories.push(name.clone());
                }
            }
        }

        Ok(Self {
            categories,
            snapshots,
        })
    }

    /// Sample `tally` every `stride` years from its first year, plus the last year
    /// when it does not land on the stride.
    #[tracing::instrument(skip(tally))]
    pub fn sample(tally: &TitleTally, stride: u32) -> PodiumResult<Self> {
        if stride == 0 {
            return Err(PodiumError::validation("snapshot stride must be > 0"));
        }

        let (Some(first), Some(last)) = (tally.first_year(), tally.last_year()) else {
            return Ok(Self::default());
        };

        let mut years: Vec<i32> = (first..=last).step_by(stride as usize).collect();
        if years.last() != Some(&last) {
            years.push(last);
        }

        let snapshots = years
            .into_iter()
            .map(|year| {
                let counts = tally.counts_at(year).unwrap_or(&[]);
                Snapshot::new(
                    year,
                    tally
                        .categories()
                        .iter()
                        .zip(counts)
                        .map(|(name, &count)| (name.clone(), f64::from(count))),
                )
            })
            .collect::<Vec<_>>();

        tracing::debug!(snapshots = snapshots.len(), "sampled snapshots");

        Ok(Self {
            categories: tally.categories().to_vec(),
            snapshots,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn years(&self) -> Vec<i32> {
        self.snapshots.iter().map(|s| s.year).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/race/snapshot.rs"]
mod tests;
