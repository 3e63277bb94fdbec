use crate::{
    animation::{ease::Ease, lerp::Lerp},
    config::Theme,
    foundation::core::{Point, Rect, Rgb8},
    race::{
        keyframe::{Keyframe, RankedEntry},
        layout::RaceLayout,
    },
};

/// How an element takes part in a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Appears in this transition.
    Enter,
    /// Was shown before and is shown after.
    Update,
    /// Slides out and is removed when the transition ends.
    Exit,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BarTrack {
    pub name: String,
    pub color: Rgb8,
    pub from: Rect,
    pub to: Rect,
    pub phase: Phase,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextTrack {
    pub name: String,
    /// Set when the transition starts; text never interpolates.
    pub text: String,
    pub from: Point,
    pub to: Point,
    pub phase: Phase,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct IconTrack {
    pub name: String,
    pub from: Point,
    pub to: Point,
    pub phase: Phase,
}

/// Start and end state of every element for one keyframe transition.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneTransition {
    pub bars: Vec<BarTrack>,
    pub labels: Vec<TextTrack>,
    pub icons: Vec<IconTrack>,
    pub values: Vec<TextTrack>,
    pub year: i32,
    pub ease: Ease,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BarShape {
    pub name: String,
    pub color: Rgb8,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextShape {
    pub name: String,
    pub text: String,
    pub anchor: Point,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct IconShape {
    pub name: String,
    pub center: Point,
}

/// Everything drawn in one video frame, besides static chart chrome.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneFrame {
    pub bars: Vec<BarShape>,
    pub labels: Vec<TextShape>,
    pub icons: Vec<IconShape>,
    pub values: Vec<TextShape>,
    pub year: i32,
}

/// Computes scene transitions for one chart.
#[derive(Clone, Copy, Debug)]
pub struct SceneBuilder<'a> {
    layout: &'a RaceLayout,
    theme: &'a Theme,
    min_visible: f64,
    ease: Ease,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(layout: &'a RaceLayout, theme: &'a Theme, min_visible: f64, ease: Ease) -> Self {
        Self {
            layout,
            theme,
            min_visible,
            ease,
        }
    }

    pub fn layout(&self) -> &'a RaceLayout {
        self.layout
    }

    fn shown<'k>(&self, frame: &'k Keyframe) -> &'k [RankedEntry] {
        frame.top(self.layout.bars)
    }

    fn labelled<'k>(&self, frame: &'k Keyframe) -> Vec<&'k RankedEntry> {
        self.shown(frame)
            .iter()
            .filter(|e| e.value >= self.min_visible)
            .collect()
    }

    /// Transition from `prev` (the keyframe shown last, if any) to `next`.
    pub fn between(&self, prev: Option<&Keyframe>, next: &Keyframe) -> SceneTransition {
        SceneTransition {
            bars: self.bar_tracks(prev, next),
            labels: self.text_tracks(prev, next, |l, e| l.label_anchor(e.rank, e.value), |e| {
                e.name.clone()
            }),
            icons: self.icon_tracks(prev, next),
            values: self.text_tracks(prev, next, |l, e| l.value_anchor(e.rank, e.value), |e| {
                format_value(e.value)
            }),
            year: next.year(),
            ease: self.ease,
        }
    }

    /// The fully settled look of `frame`, with nothing entering or leaving.
    pub fn settled(&self, frame: &Keyframe) -> SceneFrame {
        self.between(None, frame).sample(1.0)
    }

    fn bar_tracks(&self, prev: Option<&Keyframe>, next: &Keyframe) -> Vec<BarTrack> {
        let layout = self.layout;
        let prev_shown: &[RankedEntry] = prev.map(|p| self.shown(p)).unwrap_or(&[]);

        let mut tracks: Vec<BarTrack> = self
            .shown(next)
            .iter()
            .map(|entry| {
                let to = layout.bar_rect(entry.rank, entry.value);
                let (from, phase) = match prev_shown.iter().find(|e| e.name == entry.name) {
                    Some(old) => (layout.bar_rect(old.rank, old.value), Phase::Update),
                    // Entering bars grow out of the slot they held in the full ranking.
                    None => match prev.and_then(|p| p.entry(&entry.name)) {
                        Some(old) => (layout.bar_rect(old.rank, old.value), Phase::Enter),
                        None => (to, Phase::Enter),
                    },
                };
                BarTrack {
                    name: entry.name.clone(),
                    color: self.theme.color_for(&entry.name),
                    from,
                    to,
                    phase,
                }
            })
            .collect();

        let next_shown = self.shown(next);
        for old in prev_shown {
            if next_shown.iter().any(|e| e.name == old.name) {
                continue;
            }
            let from = layout.bar_rect(old.rank, old.value);
            tracks.push(BarTrack {
                name: old.name.clone(),
                color: self.theme.color_for(&old.name),
                from,
                to: layout.bar_at_y(from, layout.exit_y()),
                phase: Phase::Exit,
            });
        }
        tracks
    }

    fn text_tracks<A, T>(
        &self,
        prev: Option<&Keyframe>,
        next: &Keyframe,
        anchor: A,
        text: T,
    ) -> Vec<TextTrack>
    where
        A: Fn(&RaceLayout, &RankedEntry) -> Point,
        T: Fn(&RankedEntry) -> String,
    {
        let layout = self.layout;
        let before = prev.map(|p| self.labelled(p)).unwrap_or_default();
        let after = self.labelled(next);

        let mut tracks: Vec<TextTrack> = after
            .iter()
            .map(|&entry| {
                let to = anchor(layout, entry);
                let (from, phase) = match before.iter().copied().find(|e| e.name == entry.name) {
                    Some(old) => (anchor(layout, old), Phase::Update),
                    None => (to, Phase::Enter),
                };
                TextTrack {
                    name: entry.name.clone(),
                    text: text(entry),
                    from,
                    to,
                    phase,
                }
            })
            .collect();

        for &old in &before {
            if after.iter().any(|e| e.name == old.name) {
                continue;
            }
            let from = anchor(layout, old);
            tracks.push(TextTrack {
                name: old.name.clone(),
                text: text(old),
                from,
                to: Point::new(from.x, layout.exit_y()),
                phase: Phase::Exit,
            });
        }
        tracks
    }

    fn icon_tracks(&self, prev: Option<&Keyframe>, next: &Keyframe) -> Vec<IconTrack> {
        let layout = self.layout;
        let before = prev.map(|p| self.labelled(p)).unwrap_or_default();

        // Icons that leave are dropped at once instead of sliding out.
        self.labelled(next)
            .into_iter()
            .map(|entry| {
                let to = layout.icon_center(entry.rank, entry.value);
                let (from, phase) = match before.iter().find(|e| e.name == entry.name) {
                    Some(old) => (layout.icon_center(old.rank, old.value), Phase::Update),
                    None => (to, Phase::Enter),
                };
                IconTrack {
                    name: entry.name.clone(),
                    from,
                    to,
                    phase,
                }
            })
            .collect()
    }
}

impl SceneTransition {
    /// Sample the transition at raw progress `t` in `[0, 1]`.
    ///
    /// Exiting elements are still drawn while `t < 1` and gone once it reaches 1.
    pub fn sample(&self, t: f64) -> SceneFrame {
        let t = t.clamp(0.0, 1.0);
        let done = t >= 1.0;
        let e = self.ease.apply(t);
        let live = |phase: Phase| !(done && phase == Phase::Exit);

        let texts = |tracks: &[TextTrack]| -> Vec<TextShape> {
            tracks
                .iter()
                .filter(|tr| live(tr.phase))
                .map(|tr| TextShape {
                    name: tr.name.clone(),
                    text: tr.text.clone(),
                    anchor: <Point as Lerp>::lerp(&tr.from, &tr.to, e),
                })
                .collect()
        };

        SceneFrame {
            bars: self
                .bars
                .iter()
                .filter(|b| live(b.phase))
                .map(|b| BarShape {
                    name: b.name.clone(),
                    color: b.color,
                    rect: Rect::lerp(&b.from, &b.to, e),
                })
                .collect(),
            labels: texts(&self.labels),
            icons: self
                .icons
                .iter()
                .map(|i| IconShape {
                    name: i.name.clone(),
                    center: <Point as Lerp>::lerp(&i.from, &i.to, e),
                })
                .collect(),
            values: texts(&self.values),
            year: self.year,
        }
    }
}

/// Value text: nearest integer, halves rounded up.
pub fn format_value(v: f64) -> String {
    format!("{}", (v + 0.5).floor() as i64)
}

#[cfg(test)]
#[path = "../../tests/unit/race/scene.rs"]
mod tests;
