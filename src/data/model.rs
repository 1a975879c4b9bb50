use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Category – the fixed hazard classification
// ---------------------------------------------------------------------------

/// Hazard category. The set is closed: unknown input codes become
/// [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sidewalk,
    Crossing,
    Blind,
    Speed,
    Signal,
    Dark,
    NearMiss,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 8] = [
        Category::Sidewalk,
        Category::Crossing,
        Category::Blind,
        Category::Speed,
        Category::Signal,
        Category::Dark,
        Category::NearMiss,
        Category::Other,
    ];

    /// The catch-all code.
    pub const CATCH_ALL: Category = Category::Other;

    /// Code as it appears in input and exported files.
    pub fn code(self) -> &'static str {
        match self {
            Category::Sidewalk => "sidewalk",
            Category::Crossing => "crossing",
            Category::Blind => "blind",
            Category::Speed => "speed",
            Category::Signal => "signal",
            Category::Dark => "dark",
            Category::NearMiss => "nearmiss",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Sidewalk => "No or narrow sidewalk",
            Category::Crossing => "Hard to cross / long signal wait",
            Category::Blind => "Poor visibility / blind spot",
            Category::Speed => "Speeding / cut-through traffic",
            Category::Signal => "Missing signals or signs",
            Category::Dark => "Dark at night / poor lighting",
            Category::NearMiss => "Frequent near-misses",
            Category::Other => "Other",
        }
    }

    /// Visual class key used by the marker styling.
    pub fn class_key(self) -> &'static str {
        match self {
            Category::Sidewalk => "cat-sidewalk",
            Category::Crossing => "cat-crossing",
            Category::Blind => "cat-blind",
            Category::Speed => "cat-speed",
            Category::Signal => "cat-signal",
            Category::Dark => "cat-dark",
            Category::NearMiss => "cat-nearmiss",
            Category::Other => "cat-other",
        }
    }

    /// Exact lookup of a known code.
    pub fn from_code(code: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Lookup that never fails: unknown codes map to the catch-all.
    pub fn from_code_or_other(code: &str) -> Category {
        Category::from_code(code).unwrap_or(Category::CATCH_ALL)
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Point – one normalized hazard report
// ---------------------------------------------------------------------------

pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 3;
pub const DEFAULT_SEVERITY: u8 = 2;

/// A single hazard report. Only the normalizer constructs these from input,
/// so every instance has a non-empty `id`, finite coordinates and a
/// severity in `[1, 3]`.
///
/// The serialized form is the export property set; coordinates travel in
/// the feature geometry instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub id: String,
    pub timestamp: String,
    #[serde(skip_serializing)]
    pub lat: f64,
    #[serde(skip_serializing)]
    pub lng: f64,
    pub block: String,
    pub school: String,
    pub category: Category,
    pub severity: u8,
    pub description: String,
    pub photo_url: String,
    pub reporter_type: String,
    pub status: String,
}

// ---------------------------------------------------------------------------
// PointStore – the full loaded collection
// ---------------------------------------------------------------------------

/// The full normalized collection. Filled once at load, read-only after.
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    pub fn from_points(points: Vec<Point>) -> Self {
        PointStore { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes_round_trip_through_lookup() {
        for cat in Category::ALL {
            assert_eq!(Category::from_code(cat.code()), Some(cat));
            assert_eq!(cat.class_key(), format!("cat-{}", cat.code()));
        }
    }

    #[test]
    fn test_unknown_code_falls_back_to_other() {
        assert_eq!(Category::from_code("pothole"), None);
        assert_eq!(Category::from_code_or_other("pothole"), Category::Other);
        assert_eq!(Category::from_code_or_other(""), Category::Other);
    }

    #[test]
    fn test_index_matches_display_order() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
        }
    }

    #[test]
    fn test_category_serializes_as_code() {
        let json = serde_json::to_string(&Category::NearMiss).unwrap();
        assert_eq!(json, "\"nearmiss\"");
    }
}
