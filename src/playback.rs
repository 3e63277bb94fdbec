use crate::{
    animation::transition::TransitionClock,
    config::{RaceConfig, Theme},
    encode::sink::{FrameSink, SinkConfig},
    foundation::core::FrameIndex,
    foundation::error::PodiumResult,
    race::{Race, keyframe::Keyframe, scene::SceneBuilder},
    render::svg::SvgWriter,
};

/// How keyframes are laid out on the output timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameTiming {
    /// Sample every transition at the configured frame rate.
    #[default]
    Fps,
    /// One settled frame per keyframe, no in-between frames.
    PerKeyframe,
}

/// Counters reported after a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    pub frames: u64,
    pub transitions: u64,
}

/// Plays a race into a [`FrameSink`].
///
/// Keyframes are played strictly in order. Each transition starts from the
/// keyframe the previous one ended on; nothing is shared between runs, and a
/// player runs exactly once.
pub struct Player<'a> {
    keyframes: &'a [Keyframe],
    scene: SceneBuilder<'a>,
    writer: SvgWriter<'a>,
    clock: TransitionClock,
    timing: FrameTiming,
}

impl<'a> Player<'a> {
    pub fn new(
        race: &'a Race,
        config: &RaceConfig,
        theme: &'a Theme,
        timing: FrameTiming,
    ) -> PodiumResult<Self> {
        let layout = race.layout();
        Ok(Self {
            keyframes: race.keyframes(),
            scene: SceneBuilder::new(layout, theme, config.min_visible, config.transition.ease),
            writer: SvgWriter::new(layout, theme)?,
            clock: TransitionClock::new(config.fps, config.transition)?,
            timing,
        })
    }

    /// Frames this player will push.
    pub fn frame_count(&self) -> u64 {
        let n = self.keyframes.len() as u64;
        match self.timing {
            FrameTiming::Fps => self.clock.total_frames(n),
            FrameTiming::PerKeyframe => n,
        }
    }

    #[tracing::instrument(skip_all, fields(keyframes = self.keyframes.len(), timing = ?self.timing))]
    pub fn run(self, sink: &mut dyn FrameSink) -> PodiumResult<PlaybackStats> {
        if self.keyframes.is_empty() {
            tracing::info!("no keyframes; nothing to play");
            return Ok(PlaybackStats::default());
        }

        let (width, height) = self.writer.size();
        sink.begin(SinkConfig {
            width,
            height,
            fps: self.clock.fps(),
        })?;

        let played = match self.timing {
            FrameTiming::Fps => self.play_transitions(sink),
            FrameTiming::PerKeyframe => self.play_keyframes(sink),
        };
        let stats = match played {
            Ok(stats) => stats,
            Err(err) => {
                // Close the sink anyway; the frame error is the one reported.
                if let Err(end_err) = sink.end() {
                    tracing::warn!(%end_err, "closing sink after failed frame");
                }
                return Err(err);
            }
        };

        sink.end()?;
        tracing::info!(
            frames = stats.frames,
            transitions = stats.transitions,
            secs = self.clock.fps().frames_to_secs(stats.frames),
            "playback finished"
        );
        Ok(stats)
    }

    fn play_transitions(&self, sink: &mut dyn FrameSink) -> PodiumResult<PlaybackStats> {
        let mut stats = PlaybackStats::default();
        let mut prev: Option<&Keyframe> = None;

        for (i, keyframe) in self.keyframes.iter().enumerate() {
            let index = i as u64;
            let transition = self.scene.between(prev, keyframe);
            for frame in self.clock.window(index) {
                let idx = FrameIndex(frame);
                let t = self.clock.progress(index, idx)?;
                let doc = self.writer.write(&transition.sample(t))?;
                sink.push_frame(idx, &doc)?;
                stats.frames += 1;
            }
            stats.transitions += 1;
            prev = Some(keyframe);
        }

        if let Some(last) = prev {
            let idx = self.clock.settled_frame(stats.transitions);
            let doc = self.writer.write(&self.scene.settled(last))?;
            sink.push_frame(idx, &doc)?;
            stats.frames += 1;
        }
        Ok(stats)
    }

    fn play_keyframes(&self, sink: &mut dyn FrameSink) -> PodiumResult<PlaybackStats> {
        let mut stats = PlaybackStats::default();
        for (i, keyframe) in self.keyframes.iter().enumerate() {
            let doc = self.writer.write(&self.scene.settled(keyframe))?;
            sink.push_frame(FrameIndex(i as u64), &doc)?;
            stats.frames += 1;
            stats.transitions += 1;
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../tests/unit/playback.rs"]
mod tests;
