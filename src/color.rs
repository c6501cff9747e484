use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use sahie_dash::data::codes::{Category, Race};
use sahie_dash::data::view::ComparisonBand;

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
// Race → series colour for the grouped demographic chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RaceColors {
    mapping: BTreeMap<Race, Color32>,
}

impl Default for RaceColors {
    fn default() -> Self {
        let mapping = Race::ALL
            .iter()
            .copied()
            .zip(generate_palette(Race::ALL.len()))
            .collect();
        RaceColors { mapping }
    }
}

impl RaceColors {
    pub fn color_for(&self, race: Race) -> Color32 {
        self.mapping.get(&race).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Comparison-to-state cell backgrounds
// ---------------------------------------------------------------------------

/// Red shades above the state rate, green shades below.
pub fn band_color(band: ComparisonBand) -> Option<Color32> {
    match band {
        ComparisonBand::FarAbove => Some(Color32::from_rgb(0xff, 0xb3, 0xb3)),
        ComparisonBand::Above => Some(Color32::from_rgb(0xff, 0xe6, 0xe6)),
        ComparisonBand::Below => Some(Color32::from_rgb(0xe6, 0xff, 0xe6)),
        ComparisonBand::FarBelow => Some(Color32::from_rgb(0xb3, 0xff, 0xb3)),
        ComparisonBand::Neutral => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct_per_race() {
        let colors = RaceColors::default();
        let mut seen: Vec<Color32> = Race::ALL.iter().map(|r| colors.color_for(*r)).collect();
        seen.sort_by_key(|c| c.to_array());
        seen.dedup();
        assert_eq!(seen.len(), Race::ALL.len());
    }

    #[test]
    fn neutral_band_has_no_fill() {
        assert_eq!(band_color(ComparisonBand::Neutral), None);
        assert!(band_color(ComparisonBand::FarAbove).is_some());
    }
}
