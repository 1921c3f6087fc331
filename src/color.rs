use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use summary_lab::Value;

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Group colours: group key value → Color32
// ---------------------------------------------------------------------------

/// Assigns a stable colour to every distinct value of the group-by field.
#[derive(Debug, Clone)]
pub struct GroupColors {
    mapping: BTreeMap<Value, Color32>,
    default_color: Color32,
}

impl GroupColors {
    pub fn new(values: &BTreeSet<Value>) -> Self {
        let mapping = values
            .iter()
            .cloned()
            .zip(generate_palette(values.len()))
            .collect();

        GroupColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Colour for a group key; the total group (no key) gets the default.
    pub fn color_for(&self, key: Option<&Value>) -> Color32 {
        key.and_then(|k| self.mapping.get(k))
            .copied()
            .unwrap_or(self.default_color)
    }
}
