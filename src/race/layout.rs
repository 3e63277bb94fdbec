use crate::{
    foundation::core::{Point, Rect},
    foundation::error::{PodiumError, PodiumResult},
};

/// Chart margins in SVG user units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 60.0,
            right: 130.0,
            bottom: 40.0,
            left: 140.0,
        }
    }
}

/// Geometry knobs of the race chart. Every field has a default.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f64,
    pub bar_height: f64,
    pub margin: Margin,
    /// Upper end of the value axis; the finish line sits here.
    pub x_max: f64,
    pub ticks: u32,
    pub tick_size: f64,
    pub tick_padding: f64,
    /// Inner and outer band padding, as a fraction of the step.
    pub band_padding: f64,
    /// Icon height relative to the band width.
    pub icon_scale: f64,
    /// Icon width / height.
    pub icon_aspect: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            bar_height: 50.0,
            margin: Margin::default(),
            x_max: 20.0,
            ticks: 5,
            tick_size: 8.0,
            tick_padding: 4.0,
            band_padding: 0.1,
            icon_scale: 1.2,
            icon_aspect: 202.0 / 414.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> PodiumResult<()> {
        let finite = [
            self.width,
            self.bar_height,
            self.margin.top,
            self.margin.right,
            self.margin.bottom,
            self.margin.left,
            self.x_max,
            self.tick_size,
            self.tick_padding,
            self.band_padding,
            self.icon_scale,
            self.icon_aspect,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(PodiumError::validation("layout values must be finite"));
        }
        if self.x_max <= 0.0 {
            return Err(PodiumError::validation("layout.x_max must be > 0"));
        }
        if self.bar_height <= 0.0 {
            return Err(PodiumError::validation("layout.bar_height must be > 0"));
        }
        if self.width <= self.margin.left + self.margin.right {
            return Err(PodiumError::validation(
                "layout.width must exceed the left and right margins",
            ));
        }
        if !(0.0..1.0).contains(&self.band_padding) {
            return Err(PodiumError::validation("layout.band_padding must be in [0, 1)"));
        }
        Ok(())
    }
}

/// Continuous linear mapping from a value domain to a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map `v`; values outside the domain extrapolate.
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Roughly `count` round tick values covering the domain.
    pub fn ticks(&self, count: u32) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, f64::from(count))
    }
}

/// Discrete band mapping over ordinal positions `0..len`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandScale {
    len: usize,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Bands over `range` with equal inner/outer `padding`, centered (align 0.5).
    pub fn new(len: usize, range: (f64, f64), padding: f64) -> Self {
        let (r0, r1) = range;
        let n = len as f64;
        let step = (r1 - r0) / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        Self {
            len,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Top edge of band `index`. Indices past the domain continue at the same step.
    pub fn position(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }
}

/// Tick values using 1/2/5 x 10^k steps, matching the usual charting convention.
pub fn nice_ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if count.is_nan() || count <= 0.0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let (lo, hi, reverse) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };

    let Some((i1, i2, inc)) = tick_spec(lo, hi, count) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let mut out: Vec<f64> = (0..=(i2 - i1))
        .map(|i| {
            let k = (i1 + i) as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    const E10: f64 = 7.0710678118654755; // sqrt(50)
    const E5: f64 = 3.1622776601683795; // sqrt(10)
    const E2: f64 = std::f64::consts::SQRT_2;

    let step = (stop - start) / count;
    if step.is_nan() || step <= 0.0 || !step.is_finite() {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, inc) = if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        let mut i1 = (start * scale).round() as i64;
        let mut i2 = (stop * scale).round() as i64;
        if (i1 as f64) / scale < start {
            i1 += 1;
        }
        if (i2 as f64) / scale > stop {
            i2 -= 1;
        }
        (i1, i2, -scale)
    } else {
        let step = 10f64.powf(power) * factor;
        let mut i1 = (start / step).round() as i64;
        let mut i2 = (stop / step).round() as i64;
        if (i1 as f64) * step < start {
            i1 += 1;
        }
        if (i2 as f64) * step > stop {
            i2 -= 1;
        }
        (i1, i2, step)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

/// Format a tick value without trailing zeros.
pub fn format_tick(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Resolved geometry of one race chart.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceLayout {
    pub config: LayoutConfig,
    /// Number of displayed bars.
    pub bars: usize,
    pub height: f64,
    pub x: LinearScale,
    pub y: BandScale,
    pub icon_width: f64,
    pub icon_height: f64,
}

impl RaceLayout {
    pub fn new(config: LayoutConfig, bars: usize) -> PodiumResult<Self> {
        config.validate()?;
        let m = config.margin;
        let bands_bottom = m.top + config.bar_height * bars as f64;
        let height = bands_bottom + m.bottom;

        let x = LinearScale::new((0.0, config.x_max), (m.left, config.width - m.right));
        let y = BandScale::new(bars, (m.top, bands_bottom), config.band_padding);
        let icon_height = config.icon_scale * y.bandwidth();

        Ok(Self {
            config,
            bars,
            height,
            x,
            y,
            icon_width: icon_height * config.icon_aspect,
            icon_height,
        })
    }

    pub fn width(&self) -> f64 {
        self.config.width
    }

    fn band_center(&self, rank: usize) -> f64 {
        self.y.position(rank) + self.y.bandwidth() / 2.0
    }

    pub fn bar_rect(&self, rank: usize, value: f64) -> Rect {
        let x0 = self.x.map(0.0);
        let y0 = self.y.position(rank);
        Rect::new(x0, y0, self.x.map(value), y0 + self.y.bandwidth())
    }

    /// Bar rect that keeps `from`'s width but sits at `y`.
    pub fn bar_at_y(&self, from: Rect, y: f64) -> Rect {
        Rect::new(from.x0, y, from.x1, y + from.height())
    }

    /// Anchor (text end) of the name label.
    pub fn label_anchor(&self, rank: usize, value: f64) -> Point {
        Point::new(
            self.x.map(value) - self.icon_width - 8.0,
            self.band_center(rank),
        )
    }

    pub fn icon_center(&self, rank: usize, value: f64) -> Point {
        Point::new(self.x.map(value), self.band_center(rank))
    }

    /// Anchor (text start) of the numeric value.
    pub fn value_anchor(&self, rank: usize, value: f64) -> Point {
        Point::new(
            self.x.map(value) + self.icon_width + 5.0,
            self.band_center(rank),
        )
    }

    /// Where exiting elements slide to before removal.
    pub fn exit_y(&self) -> f64 {
        self.height - self.config.margin.bottom
    }

    pub fn axis_y(&self) -> f64 {
        self.config.margin.top - 5.0
    }

    pub fn ticker_anchor(&self) -> Point {
        Point::new(self.config.width - 12.0, self.height - 12.0)
    }

    /// Dotted line at the end of the value axis.
    pub fn finish_line(&self) -> Rect {
        let m = self.config.margin;
        let x0 = self.x.map(self.config.x_max) - 1.0;
        let y0 = m.top - 5.0;
        Rect::new(x0, y0, x0 + 2.0, y0 + self.height - m.top - m.bottom + 10.0)
    }

    /// `(value, x)` of every axis tick.
    pub fn x_ticks(&self) -> Vec<(f64, f64)> {
        self.x
            .ticks(self.config.ticks)
            .into_iter()
            .map(|v| (v, self.x.map(v)))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/race/layout.rs"]
mod tests;
