//! The bar-chart race: sampling, ranking, layout and scene transitions.

/// Ranking and keyframe interpolation.
pub mod keyframe;
/// Scales, ticks and chart geometry.
pub mod layout;
/// Enter/update/exit state between two keyframes.
pub mod scene;
/// Stride sampling of yearly totals.
pub mod snapshot;

use crate::{
    config::RaceConfig,
    data::{
        ingest::{ChampionRow, DatasetSource},
        tally::TitleTally,
    },
    foundation::error::PodiumResult,
    race::{
        keyframe::{Keyframe, build_keyframes},
        layout::RaceLayout,
        snapshot::SnapshotSeries,
    },
};

/// A loaded race: its keyframes and the chart geometry they are drawn with.
#[derive(Clone, Debug)]
pub struct Race {
    categories: Vec<String>,
    keyframes: Vec<Keyframe>,
    layout: RaceLayout,
}

impl Race {
    /// Fetch the dataset and build the race.
    pub fn load(source: &DatasetSource, config: &RaceConfig) -> PodiumResult<Self> {
        let rows = source.load()?;
        Self::from_rows(&rows, config)
    }

    #[tracing::instrument(skip(rows, config), fields(rows = rows.len()))]
    pub fn from_rows(rows: &[ChampionRow], config: &RaceConfig) -> PodiumResult<Self> {
        config.validate()?;
        let tally = TitleTally::from_rows(rows)?;
        let series = SnapshotSeries::sample(&tally, config.stride)?;
        let keyframes = build_keyframes(&series, config.substeps)?;
        let categories = series.categories().to_vec();
        let layout = RaceLayout::new(config.layout, config.displayed_bars(categories.len()))?;

        tracing::info!(
            categories = categories.len(),
            keyframes = keyframes.len(),
            bars = layout.bars,
            "race ready"
        );
        Ok(Self {
            categories,
            keyframes,
            layout,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn layout(&self) -> &RaceLayout {
        &self.layout
    }

    /// `true` for an empty dataset; nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}
