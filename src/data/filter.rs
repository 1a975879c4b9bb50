use std::collections::BTreeSet;

use super::model::{Category, MIN_SEVERITY, Point, PointStore};

// ---------------------------------------------------------------------------
// Filter criteria chosen in the side panel
// ---------------------------------------------------------------------------

/// The user's current predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Categories left checked. Empty means nothing matches.
    pub active: BTreeSet<Category>,
    /// Inclusive lower bound on severity.
    pub min_severity: u8,
    /// Case-insensitive substring matched against description + status.
    pub search: String,
}

impl Default for FilterCriteria {
    /// Everything checked, severity 1, no search text.
    fn default() -> Self {
        Self {
            active: Category::ALL.into_iter().collect(),
            min_severity: MIN_SEVERITY,
            search: String::new(),
        }
    }
}

impl FilterCriteria {
    /// Whether a single point passes all predicates.
    ///
    /// A point matches when:
    /// * its category is in `active`
    /// * its severity is at least `min_severity`
    /// * `search` is empty, or `description + " " + status` contains it
    ///   (both lowercased)
    pub fn matches(&self, point: &Point) -> bool {
        if !self.active.contains(&point.category) {
            return false;
        }
        if point.severity < self.min_severity {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let haystack = format!("{} {}", point.description, point.status).to_lowercase();
        haystack.contains(&self.search.to_lowercase())
    }
}

/// Return the points that pass `criteria`, in input order.
pub fn filter_points<'a, I>(points: I, criteria: &FilterCriteria) -> Vec<&'a Point>
where
    I: IntoIterator<Item = &'a Point>,
{
    points.into_iter().filter(|p| criteria.matches(p)).collect()
}

/// Return indices into the store of points passing `criteria`.
pub fn filtered_indices(store: &PointStore, criteria: &FilterCriteria) -> Vec<usize> {
    store
        .points()
        .iter()
        .enumerate()
        .filter(|(_, p)| criteria.matches(p))
        .map(|(i, _)| i)
        .collect()
}
