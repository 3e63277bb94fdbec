use crate::foundation::error::{PodiumError, PodiumResult};

pub use kurbo::{Point, Rect, Vec2};

/// 0-based index of an emitted video frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frames-per-second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> PodiumResult<Self> {
        if den == 0 {
            return Err(PodiumError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(PodiumError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn validate(self) -> PodiumResult<()> {
        Self::new(self.num, self.den).map(|_| ())
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// First frame whose timestamp is at or after `millis`.
    ///
    /// Exact integer arithmetic: `ceil(millis * num / (1000 * den))`.
    pub fn first_frame_at_or_after_ms(self, millis: u64) -> u64 {
        let n = u128::from(millis) * u128::from(self.num);
        let d = 1000u128 * u128::from(self.den);
        n.div_ceil(d) as u64
    }

    /// Timestamp of `frame`, as a rational `(numerator, denominator)` in milliseconds.
    pub fn frame_time_ms_ratio(self, frame: FrameIndex) -> (u128, u128) {
        (
            u128::from(frame.0) * 1000 * u128::from(self.den),
            u128::from(self.num),
        )
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 60, den: 1 }
    }
}

/// Straight (non-premultiplied) 8-bit RGB color, written as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn parse_hex(s: &str) -> PodiumResult<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PodiumError::validation(format!("invalid color '{s}'")));
        }

        let channel = |h: &str| {
            u8::from_str_radix(h, 16)
                .map_err(|_| PodiumError::validation(format!("invalid color '{s}'")))
        };

        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string())?;
                    out[i] = v * 17;
                }
                Ok(Self::new(out[0], out[1], out[2]))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(PodiumError::validation(format!(
                "color '{s}' must have 3 or 6 hex digits"
            ))),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = PodiumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_hex()
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
