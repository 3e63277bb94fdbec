use std::collections::HashSet;

use crate::{
    config::{RaceConfig, Theme},
    encode::sink::FrameSink,
    foundation::error::{PodiumError, PodiumResult},
    playback::{FrameTiming, PlaybackStats, Player},
    race::Race,
};

/// Default visible fraction a chart needs before it is drawn.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Identity of a chart on a stage.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartId(String);

impl ChartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chart that is drawn once it becomes visible.
pub trait Chart {
    fn id(&self) -> &ChartId;
    fn render(&mut self) -> PodiumResult<()>;
}

/// Remembers which charts have been drawn.
#[derive(Debug, Default)]
pub struct RenderOnce {
    done: HashSet<ChartId>,
}

impl RenderOnce {
    pub fn is_rendered(&self, id: &ChartId) -> bool {
        self.done.contains(id)
    }

    /// Record `id` as drawn. Returns `false` if it already was.
    pub fn mark(&mut self, id: &ChartId) -> bool {
        self.done.insert(id.clone())
    }
}

/// Outcome of a visibility report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// The chart was drawn by this report.
    Rendered,
    /// The chart had already been drawn; nothing happened.
    AlreadyRendered,
    /// Not enough of the chart is visible yet.
    BelowThreshold,
    /// No chart is registered under the reported id.
    UnknownChart,
}

/// Owns visibility detection for a set of charts and draws each one at most once.
pub struct Stage {
    threshold: f64,
    charts: Vec<Box<dyn Chart>>,
    guard: RenderOnce,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            charts: Vec::new(),
            guard: RenderOnce::default(),
        }
    }
}

impl Stage {
    pub fn new(threshold: f64) -> PodiumResult<Self> {
        if threshold.is_nan() || threshold <= 0.0 || threshold > 1.0 {
            return Err(PodiumError::validation(format!(
                "visibility threshold must be in (0, 1], got {threshold}"
            )));
        }
        Ok(Self {
            threshold,
            ..Self::default()
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn register(&mut self, chart: Box<dyn Chart>) -> PodiumResult<()> {
        if self.charts.iter().any(|c| c.id() == chart.id()) {
            return Err(PodiumError::validation(format!(
                "chart '{}' is already registered",
                chart.id()
            )));
        }
        self.charts.push(chart);
        Ok(())
    }

    pub fn is_rendered(&self, id: &ChartId) -> bool {
        self.guard.is_rendered(id)
    }

    /// Report that `ratio` of chart `id` is visible.
    ///
    /// The chart is drawn the first time `ratio` reaches the threshold. A chart
    /// whose render fails is not marked and may be drawn by a later report.
    pub fn on_visibility(&mut self, id: &ChartId, ratio: f64) -> PodiumResult<Visibility> {
        let Some(chart) = self.charts.iter_mut().find(|c| c.id() == id) else {
            tracing::warn!(chart = %id, "visibility reported for unknown chart");
            return Ok(Visibility::UnknownChart);
        };
        if self.guard.is_rendered(id) {
            return Ok(Visibility::AlreadyRendered);
        }
        if ratio < self.threshold {
            return Ok(Visibility::BelowThreshold);
        }

        chart.render()?;
        self.guard.mark(id);
        tracing::debug!(chart = %id, ratio, "chart rendered");
        Ok(Visibility::Rendered)
    }
}

/// A race chart that plays into its sink when first shown.
pub struct RaceChart<S> {
    id: ChartId,
    race: Race,
    config: RaceConfig,
    theme: Theme,
    timing: FrameTiming,
    sink: S,
    stats: Option<PlaybackStats>,
}

impl<S: FrameSink> RaceChart<S> {
    pub fn new(
        id: ChartId,
        race: Race,
        config: RaceConfig,
        theme: Theme,
        timing: FrameTiming,
        sink: S,
    ) -> Self {
        Self {
            id,
            race,
            config,
            theme,
            timing,
            sink,
            stats: None,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Stats of the completed playback, once rendered.
    pub fn stats(&self) -> Option<PlaybackStats> {
        self.stats
    }
}

impl<S: FrameSink> Chart for RaceChart<S> {
    fn id(&self) -> &ChartId {
        &self.id
    }

    fn render(&mut self) -> PodiumResult<()> {
        let player = Player::new(&self.race, &self.config, &self.theme, self.timing)?;
        self.stats = Some(player.run(&mut self.sink)?);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/stage.rs"]
mod tests;
