use std::ops::Range;

use crate::{
    animation::ease::Ease,
    foundation::core::{Fps, FrameIndex},
    foundation::error::{PodiumError, PodiumResult},
};

/// A fixed-duration visual transition between two keyframes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Transition {
    pub duration_ms: u64,
    pub ease: Ease,
}

impl Transition {
    pub fn new(duration_ms: u64, ease: Ease) -> PodiumResult<Self> {
        if duration_ms == 0 {
            return Err(PodiumError::validation("transition duration must be > 0ms"));
        }
        Ok(Self { duration_ms, ease })
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: 50,
            ease: Ease::Linear,
        }
    }
}

/// Maps back-to-back transitions onto video frames.
///
/// Transition `i` occupies `[i * d, (i + 1) * d)` on the output timeline. A video
/// frame belongs to the transition whose window contains its timestamp, so no two
/// transitions ever share a frame.
#[derive(Clone, Copy, Debug)]
pub struct TransitionClock {
    fps: Fps,
    duration_ms: u64,
}

impl TransitionClock {
    pub fn new(fps: Fps, transition: Transition) -> PodiumResult<Self> {
        fps.validate()?;
        if transition.duration_ms == 0 {
            return Err(PodiumError::animation("transition clock needs a non-zero duration"));
        }
        Ok(Self {
            fps,
            duration_ms: transition.duration_ms,
        })
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Video frames whose timestamps fall inside transition `index`.
    ///
    /// May be empty when a transition is shorter than one frame interval.
    pub fn window(&self, index: u64) -> Range<u64> {
        let start = self
            .fps
            .first_frame_at_or_after_ms(index.saturating_mul(self.duration_ms));
        let end = self
            .fps
            .first_frame_at_or_after_ms((index + 1).saturating_mul(self.duration_ms));
        start..end
    }

    /// Raw progress in `[0, 1)` of `frame` within transition `index`.
    pub fn progress(&self, index: u64, frame: FrameIndex) -> PodiumResult<f64> {
        if !self.window(index).contains(&frame.0) {
            return Err(PodiumError::animation(format!(
                "frame {} is outside transition {index}",
                frame.0
            )));
        }

        let (time_num, time_den) = self.fps.frame_time_ms_ratio(frame);
        let start_num = u128::from(index) * u128::from(self.duration_ms) * time_den;
        let elapsed_num = time_num.saturating_sub(start_num);
        let span = u128::from(self.duration_ms) * time_den;
        Ok(elapsed_num as f64 / span as f64)
    }

    /// Index of the settled frame emitted after `transitions` back-to-back transitions.
    pub fn settled_frame(&self, transitions: u64) -> FrameIndex {
        FrameIndex(
            self.fps
                .first_frame_at_or_after_ms(transitions.saturating_mul(self.duration_ms)),
        )
    }

    /// Total frames for a race of `transitions` keyframes, including the settled frame.
    pub fn total_frames(&self, transitions: u64) -> u64 {
        if transitions == 0 {
            return 0;
        }
        self.settled_frame(transitions).0 + 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/transition.rs"]
mod tests;
