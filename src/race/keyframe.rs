use crate::{
    animation::lerp::Lerp,
    foundation::error::{PodiumError, PodiumResult},
    race::snapshot::SnapshotSeries,
};

/// One category's place in a keyframe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub value: f64,
    pub rank: usize,
}

/// A ranked animation frame, interpolated or exact.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Fractional year.
    pub time: f64,
    /// Every category, sorted by value descending; `ranking[i].rank == i`.
    pub ranking: Vec<RankedEntry>,
    /// `true` when the frame is a real snapshot rather than an interpolation.
    pub exact: bool,
}

impl Keyframe {
    /// Year shown by the ticker: the fractional time truncated toward zero.
    pub fn year(&self) -> i32 {
        self.time.trunc() as i32
    }

    pub fn entry(&self, name: &str) -> Option<&RankedEntry> {
        self.ranking.iter().find(|e| e.name == name)
    }

    /// Displayed entries: the first `max_bars` ranks.
    pub fn top(&self, max_bars: usize) -> &[RankedEntry] {
        &self.ranking[..self.ranking.len().min(max_bars)]
    }
}

/// Rank `categories` by `value_of`, descending.
///
/// The sort is stable, so equal values keep the order of `categories`.
pub fn rank<F>(categories: &[String], mut value_of: F) -> Vec<RankedEntry>
where
    F: FnMut(&str) -> f64,
{
    let mut entries: Vec<RankedEntry> = categories
        .iter()
        .map(|name| RankedEntry {
            value: value_of(name),
            name: name.clone(),
            rank: 0,
        })
        .collect();

    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i;
    }
    entries
}

/// Interpolate `substeps` keyframes per snapshot interval and close with one exact
/// keyframe for the last snapshot.
///
/// Produces `substeps * intervals + 1` keyframes, or none for an empty series.
#[tracing::instrument(skip(series), fields(snapshots = series.snapshots().len()))]
pub fn build_keyframes(series: &SnapshotSeries, substeps: u32) -> PodiumResult<Vec<Keyframe>> {
    if substeps == 0 {
        return Err(PodiumError::validation("keyframe substeps must be > 0"));
    }

    let snapshots = series.snapshots();
    let Some(last) = snapshots.last() else {
        return Ok(Vec::new());
    };

    let categories = series.categories();
    let intervals = snapshots.len() - 1;
    let mut keyframes = Vec::with_capacity(intervals * substeps as usize + 1);

    for pair in snapshots.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let span = f64::from(to.year - from.year);
        for i in 0..substeps {
            let t = f64::from(i) / f64::from(substeps);
            keyframes.push(Keyframe {
                time: f64::from(from.year) + span * t,
                ranking: rank(categories, |name| {
                    f64::lerp(&from.value(name), &to.value(name), t)
                }),
                exact: i == 0,
            });
        }
    }

    keyframes.push(Keyframe {
        time: f64::from(last.year),
        ranking: rank(categories, |name| last.value(name)),
        exact: true,
    });

    tracing::debug!(keyframes = keyframes.len(), "built keyframes");
    Ok(keyframes)
}

#[cfg(test)]
#[path = "../../tests/unit/race/keyframe.rs"]
mod tests;
