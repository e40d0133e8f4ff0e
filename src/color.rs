use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels (age brackets, industry names) to stable colours.
/// Hues follow the order of the label slice, so a label keeps its colour
/// across animation frames as long as the underlying list is stable.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping: BTreeMap<String, Color32> = labels
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label; unknown labels fall back to gray.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Heatmap gradient
// ---------------------------------------------------------------------------

/// Intensity gradient for the wage heatmap: cold blue at 0.0 through the
/// hue wheel to hot red at 1.0. Input outside [0, 1] is clamped.
pub fn heat_color(weight: f64) -> Color32 {
    let t = weight.clamp(0.0, 1.0) as f32;
    let hsl = Hsl::new(240.0 * (1.0 - t), 0.85, 0.5);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_yields_distinct_colors() {
        let palette = generate_palette(12);
        assert_eq!(palette.len(), 12);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn color_map_is_stable_and_falls_back_to_gray() {
        let labels = vec!["19歳以下".to_string(), "20～24歳".to_string()];
        let map = ColorMap::new(&labels);
        assert_eq!(map.color_for("19歳以下"), map.color_for("19歳以下"));
        assert_ne!(map.color_for("19歳以下"), map.color_for("20～24歳"));
        assert_eq!(map.color_for("年齢計"), Color32::GRAY);
    }

    #[test]
    fn heat_gradient_runs_cold_to_hot() {
        let cold = heat_color(0.0);
        let hot = heat_color(1.0);
        assert!(cold.b() > cold.r());
        assert!(hot.r() > hot.b());
        // Out-of-range weights clamp to the endpoints.
        assert_eq!(heat_color(-0.5), cold);
        assert_eq!(heat_color(1.5), hot);
    }
}
