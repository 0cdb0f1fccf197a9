use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Categorical mapping: country → Color32
// ---------------------------------------------------------------------------

/// Maps each country to a stable, distinct colour.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(keys: &BTreeSet<String>) -> Self {
        let mapping = keys
            .iter()
            .cloned()
            .zip(generate_palette(keys.len()))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, key: &str) -> Color32 {
        self.mapping.get(key).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale for the choropleth
// ---------------------------------------------------------------------------

/// Plasma control points, dark purple → yellow.
const PLASMA: [(u8, u8, u8); 5] = [
    (13, 8, 135),
    (126, 3, 168),
    (204, 71, 120),
    (248, 149, 64),
    (240, 249, 33),
];

/// Linear colour scale mapping `[min, max]` onto the Plasma ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousScale {
    pub min: f64,
    pub max: f64,
}

impl ContinuousScale {
    /// Scale spanning the finite values in `values`. `None` if there are none.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        (min <= max).then_some(ContinuousScale { min, max })
    }

    /// Position of `value` on the scale, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let t = self.normalize(value) * (PLASMA.len() - 1) as f32;
        let i = (t.floor() as usize).min(PLASMA.len() - 2);
        let local = t - i as f32;

        let stop = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
            Srgb::new(r, g, b).into_format::<f32>().into_linear()
        };
        let mixed = stop(PLASMA[i]).mix(stop(PLASMA[i + 1]), local);
        to_color32(Srgb::from_linear(mixed))
    }
}
