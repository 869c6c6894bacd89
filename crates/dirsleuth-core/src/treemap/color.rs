/// Display colours for treemap cells.
use serde::{Deserialize, Serialize};

/// Darkening applied per level of nesting.
const DEPTH_STEP: f32 = 0.08;

/// Brightness never drops below this fraction of the base colour.
const MIN_BRIGHTNESS: f32 = 0.5;

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Darken by scaling towards black; `amount` is clamped to 0..=1.
    pub fn darken(self, amount: f32) -> Self {
        let f = 1.0 - amount.clamp(0.0, 1.0);
        Self::new(
            (self.r as f32 * f) as u8,
            (self.g as f32 * f) as u8,
            (self.b as f32 * f) as u8,
        )
    }

    /// `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Shade `base` for a cell at `depth`: deeper cells are darker, down to
/// half brightness.
pub fn depth_shade(base: Rgb, depth: usize) -> Rgb {
    let brightness = (1.0 - depth as f32 * DEPTH_STEP).max(MIN_BRIGHTNESS);
    base.darken(1.0 - brightness)
}
