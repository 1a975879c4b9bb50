use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Category;

// ---------------------------------------------------------------------------
// Category colours
// ---------------------------------------------------------------------------

/// Hue (degrees) for each category, indexed like [`Category::ALL`].
const CATEGORY_HUES: [f32; 8] = [
    28.0,  // sidewalk: orange
    210.0, // crossing: blue
    280.0, // blind: purple
    0.0,   // speed: red
    55.0,  // signal: yellow
    230.0, // dark: indigo
    330.0, // nearmiss: pink
    0.0,   // other: grey (saturation 0)
];

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

fn category_saturation(category: Category) -> f32 {
    match category {
        Category::Other => 0.0,
        _ => 0.75,
    }
}

/// Base colour used in legends and the stats panel (tier 2).
pub fn category_color(category: Category) -> Color32 {
    tier_color(category, SeverityTier::Medium)
}

// ---------------------------------------------------------------------------
// Severity tiers
// ---------------------------------------------------------------------------

/// Visual intensity for severity 1, 2 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl SeverityTier {
    /// Severity values outside `[1, 3]` land on the nearest tier.
    pub fn from_severity(severity: u8) -> Self {
        match severity {
            0 | 1 => SeverityTier::Low,
            2 => SeverityTier::Medium,
            _ => SeverityTier::High,
        }
    }

    fn lightness(self) -> f32 {
        match self {
            SeverityTier::Low => 0.72,
            SeverityTier::Medium => 0.55,
            SeverityTier::High => 0.40,
        }
    }

    /// Marker radius in points.
    pub fn radius(self) -> f32 {
        match self {
            SeverityTier::Low => 4.0,
            SeverityTier::Medium => 5.5,
            SeverityTier::High => 7.0,
        }
    }
}

/// Colour for a category at a severity tier; higher tiers are darker.
pub fn tier_color(category: Category, tier: SeverityTier) -> Color32 {
    hsl_to_color32(
        CATEGORY_HUES[category.index()],
        category_saturation(category),
        tier.lightness(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_have_distinct_colors() {
        let colors: std::collections::HashSet<Color32> =
            Category::ALL.iter().map(|&c| category_color(c)).collect();
        assert_eq!(colors.len(), Category::ALL.len());
    }

    #[test]
    fn test_other_is_grey() {
        let c = category_color(Category::Other);
        assert_eq!(c.r(), c.g());
        assert_eq!(c.g(), c.b());
    }

    #[test]
    fn test_higher_tier_is_darker() {
        let low = tier_color(Category::Speed, SeverityTier::Low);
        let high = tier_color(Category::Speed, SeverityTier::High);
        let sum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(sum(high) < sum(low));
    }

    #[test]
    fn test_tier_from_severity() {
        assert_eq!(SeverityTier::from_severity(1), SeverityTier::Low);
        assert_eq!(SeverityTier::from_severity(2), SeverityTier::Medium);
        assert_eq!(SeverityTier::from_severity(3), SeverityTier::High);
        assert_eq!(SeverityTier::from_severity(0), SeverityTier::Low);
        assert_eq!(SeverityTier::from_severity(7), SeverityTier::High);
    }
}
