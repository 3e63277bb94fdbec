//! Podium turns a table of yearly Formula 1 constructor champions into an animated
//! bar-chart race.
//!
//! - Load a dataset into a [`Race`] (cumulative titles, stride snapshots, keyframes)
//! - Create a [`Player`] and stream its frames into a [`FrameSink`]
//! - Or drive charts from a [`Stage`], which draws each one the first time it is seen
#![forbid(unsafe_code)]

pub mod animation;
pub mod config;
pub mod data;
pub mod encode;
pub mod foundation;
pub mod playback;
pub mod race;
pub mod render;
pub mod stage;

pub use crate::animation::ease::Ease;
pub use crate::animation::transition::{Transition, TransitionClock};
pub use crate::config::{RaceConfig, Theme};
pub use crate::data::ingest::{ChampionRow, DatasetSource};
pub use crate::data::tally::TitleTally;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{
    FrameSink, InMemorySink, PngSequenceSink, SinkConfig, SvgSequenceSink,
};
pub use crate::foundation::core::{Fps, FrameIndex, Point, Rect, Rgb8};
pub use crate::foundation::error::{PodiumError, PodiumResult};
pub use crate::playback::{FrameTiming, PlaybackStats, Player};
pub use crate::race::Race;
pub use crate::race::keyframe::{Keyframe, RankedEntry, build_keyframes};
pub use crate::race::layout::{LayoutConfig, RaceLayout};
pub use crate::race::scene::{SceneBuilder, SceneFrame, SceneTransition};
pub use crate::race::snapshot::{Snapshot, SnapshotSeries};
pub use crate::render::raster::{FrameRGBA, Rasterizer};
pub use crate::render::svg::{SvgDocument, SvgWriter};
pub use crate::stage::{Chart, ChartId, RaceChart, Stage, Visibility};
