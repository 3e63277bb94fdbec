use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use serde::de::DeserializeOwned;

use crate::{
    animation::transition::Transition,
    foundation::core::{Fps, Rgb8},
    foundation::error::{PodiumError, PodiumResult},
    race::layout::LayoutConfig,
};

/// Sampling, truncation and playback settings for a race.
///
/// Every field has a default, so `{}` is a valid
/// configuration file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Years between sampled snapshots.
    pub stride: u32,
    /// Interpolated keyframes per snapshot interval.
    pub substeps: u32,
    /// Most bars shown at once.
    pub max_bars: usize,
    /// Entries below this value get no label, icon or value text.
    pub min_visible: f64,
    pub transition: Transition,
    pub fps: Fps,
    pub layout: LayoutConfig,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            stride: 5,
            substeps: 10,
            max_bars: 8,
            min_visible: 1.0,
            transition: Transition::default(),
            fps: Fps::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl RaceConfig {
    pub fn from_json_file(path: &Path) -> PodiumResult<Self> {
        let config: Self = read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PodiumResult<()> {
        if self.stride == 0 {
            return Err(PodiumError::validation("stride must be > 0"));
        }
        if self.substeps == 0 {
            return Err(PodiumError::validation("substeps must be > 0"));
        }
        if self.max_bars == 0 {
            return Err(PodiumError::validation("max_bars must be > 0"));
        }
        if !self.min_visible.is_finite() {
            return Err(PodiumError::validation("min_visible must be finite"));
        }
        if self.transition.duration_ms == 0 {
            return Err(PodiumError::validation("transition.duration_ms must be > 0"));
        }
        self.fps.validate()?;
        self.layout.validate()
    }

    /// Bars drawn for a race over `categories` categories.
    pub fn displayed_bars(&self, categories: usize) -> usize {
        categories.min(self.max_bars)
    }
}

/// Colors and text injected into rendering.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Bar fill per category name.
    pub colors: BTreeMap<String, Rgb8>,
    /// Fill for categories without an entry in `colors`.
    pub default_color: Rgb8,
    pub background: Option<Rgb8>,
    pub text: Rgb8,
    pub ticker: Rgb8,
    /// Image drawn as the bar-end icon. A built-in car glyph is used when unset.
    pub icon_href: Option<String>,
    pub value_axis_title: String,
    pub category_axis_title: String,
}

impl Default for Theme {
    fn default() -> Self {
        let colors = [
            ("Ferrari", Rgb8::new(0xdc, 0x00, 0x00)),
            ("McLaren", Rgb8::new(0xff, 0x87, 0x00)),
            ("Mercedes", Rgb8::new(0x00, 0xd2, 0xbe)),
            ("Red Bull", Rgb8::new(0x1e, 0x41, 0xff)),
            ("Williams", Rgb8::new(0x00, 0x5a, 0xff)),
            ("Lotus", Rgb8::new(0x00, 0x42, 0x25)),
            ("Renault", Rgb8::new(0xff, 0xf5, 0x00)),
            ("Brabham", Rgb8::new(0xff, 0x98, 0x00)),
            ("Cooper", Rgb8::new(0x99, 0xcc, 0xff)),
            ("BrawnGP", Rgb8::new(0xff, 0xff, 0xff)),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color))
        .collect();

        Self {
            colors,
            default_color: Rgb8::new(0x88, 0x88, 0x88),
            background: Some(Rgb8::new(0x15, 0x15, 0x1e)),
            text: Rgb8::WHITE,
            ticker: Rgb8::new(0xff, 0x44, 0x44),
            icon_href: None,
            value_axis_title: "Title Wins".to_string(),
            category_axis_title: "Constructor".to_string(),
        }
    }
}

impl Theme {
    pub fn from_json_file(path: &Path) -> PodiumResult<Self> {
        read_json(path)
    }

    pub fn color_for(&self, name: &str) -> Rgb8 {
        self.colors.get(name).copied().unwrap_or(self.default_color)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> PodiumResult<T> {
    let file = File::open(path).map_err(|e| {
        PodiumError::validation(format!("open config '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PodiumError::serde(format!("parse '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
