use eframe::egui::Color32;

use crate::color::{SeverityTier, tier_color};
use crate::data::model::{Category, Point};

// ---------------------------------------------------------------------------
// Marker styling
// ---------------------------------------------------------------------------

/// How a marker is drawn. Pure function of category and severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub class_key: &'static str,
    pub color: Color32,
    pub tier: SeverityTier,
    pub radius: f32,
}

pub fn marker_style(category: Category, severity: u8) -> MarkerStyle {
    let tier = SeverityTier::from_severity(severity);
    MarkerStyle {
        class_key: category.class_key(),
        color: tier_color(category, tier),
        tier,
        radius: tier.radius(),
    }
}

/// Style lookup by raw category code; unknown codes get the catch-all style.
pub fn style_for_code(code: &str, severity: u8) -> MarkerStyle {
    marker_style(Category::from_code_or_other(code), severity)
}

/// One drawable marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Position of the point in the store.
    pub point_index: usize,
    pub point_id: String,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,
    pub severity: u8,
    pub style: MarkerStyle,
}

impl Marker {
    pub fn for_point(point_index: usize, point: &Point) -> Self {
        Marker {
            point_index,
            point_id: point.id.clone(),
            lat: point.lat,
            lng: point.lng,
            category: point.category,
            severity: point.severity,
            style: marker_style(point.category, point.severity),
        }
    }
}

// ---------------------------------------------------------------------------
// Marker layer seam
// ---------------------------------------------------------------------------

/// A layer that holds markers for the map surface.
pub trait MarkerLayer {
    /// Drop every marker.
    fn clear_layers(&mut self);
    fn add_marker(&mut self, marker: Marker);
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Count per category over the full enumeration, zeros included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryStats {
    counts: [usize; 8],
}

impl CategoryStats {
    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    /// All eight categories in display order with their counts.
    pub fn rows(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.count(c)))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// Synchronization
// ---------------------------------------------------------------------------

/// Make `layer` show exactly `subset` and return the matching stats.
///
/// `subset` yields each point with its store index. The layer is cleared
/// first, then one marker per point is added in subset order.
pub fn synchronize<'a, I>(subset: I, layer: &mut dyn MarkerLayer) -> CategoryStats
where
    I: IntoIterator<Item = (usize, &'a Point)>,
{
    layer.clear_layers();

    let mut stats = CategoryStats::default();
    for (index, point) in subset {
        layer.add_marker(Marker::for_point(index, point));
        stats.counts[point.category.index()] += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingLayer {
        markers: Vec<Marker>,
        clears: usize,
    }

    impl MarkerLayer for RecordingLayer {
        fn clear_layers(&mut self) {
            self.clears += 1;
            self.markers.clear();
        }

        fn add_marker(&mut self, marker: Marker) {
            self.markers.push(marker);
        }
    }

    fn point(id: &str, category: Category, severity: u8) -> Point {
        Point {
            id: id.to_string(),
            timestamp: String::new(),
            lat: 36.0,
            lng: 139.0,
            block: String::new(),
            school: String::new(),
            category,
            severity,
            description: String::new(),
            photo_url: String::new(),
            reporter_type: String::new(),
            status: String::new(),
        }
    }

    #[test]
    fn test_rebuild_replaces_previous_markers() {
        let mut layer = RecordingLayer::default();
        let first = vec![
            point("a", Category::Blind, 1),
            point("b", Category::Speed, 3),
            point("c", Category::Dark, 2),
        ];
        synchronize(first.iter().enumerate(), &mut layer);
        assert_eq!(layer.markers.len(), 3);

        synchronize([(1, &first[1])], &mut layer);
        assert_eq!(layer.clears, 2);
        let ids: Vec<&str> = layer.markers.iter().map(|m| m.point_id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(layer.markers[0].point_index, 1);
    }

    #[test]
    fn test_empty_subset_clears_layer() {
        let mut layer = RecordingLayer::default();
        synchronize([(0, &point("a", Category::Blind, 1))], &mut layer);
        let stats = synchronize(std::iter::empty::<(usize, &Point)>(), &mut layer);
        assert!(layer.markers.is_empty());
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.rows().count(), 8);
    }

    #[test]
    fn test_stats_list_all_categories_and_sum_to_subset() {
        let subset = vec![
            point("a", Category::Speed, 1),
            point("b", Category::Speed, 2),
            point("c", Category::Other, 3),
        ];
        let mut layer = RecordingLayer::default();
        let stats = synchronize(subset.iter().enumerate(), &mut layer);

        let rows: Vec<(Category, usize)> = stats.rows().collect();
        assert_eq!(rows.len(), 8);
        assert_eq!(stats.count(Category::Speed), 2);
        assert_eq!(stats.count(Category::Other), 1);
        assert_eq!(stats.count(Category::Sidewalk), 0);
        assert_eq!(rows.iter().map(|(_, n)| n).sum::<usize>(), subset.len());
    }

    #[test]
    fn test_style_depends_on_category_and_severity() {
        let a = marker_style(Category::Speed, 1);
        let b = marker_style(Category::Speed, 3);
        let c = marker_style(Category::Dark, 1);
        assert_eq!(a.class_key, "cat-speed");
        assert_eq!(a.tier, SeverityTier::Low);
        assert_eq!(b.tier, SeverityTier::High);
        assert_ne!(a.color, b.color);
        assert_ne!(a.color, c.color);
        assert!(b.radius > a.radius);
    }

    #[test]
    fn test_unknown_code_gets_catch_all_style() {
        let style = style_for_code("pothole", 2);
        assert_eq!(style, marker_style(Category::Other, 2));
        assert_eq!(style.class_key, "cat-other");
    }
}
