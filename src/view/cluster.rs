use std::collections::BTreeMap;

use super::sync::{Marker, MarkerLayer};

/// Markers closer than this on screen are drawn as one cluster.
pub const DEFAULT_CLUSTER_RADIUS: f32 = 48.0;

/// A group of markers drawn together.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Indices into [`ClusterLayer::markers`].
    pub members: Vec<usize>,
    /// Mean position of the members.
    pub lat: f64,
    pub lng: f64,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

/// Marker layer that groups markers by screen proximity when drawn.
///
/// Grouping is purely visual; the marker list itself is exactly what the
/// synchronizer put in.
#[derive(Debug, Clone)]
pub struct ClusterLayer {
    markers: Vec<Marker>,
    radius: f32,
}

impl Default for ClusterLayer {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTER_RADIUS)
    }
}

impl MarkerLayer for ClusterLayer {
    fn clear_layers(&mut self) {
        self.markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }
}

impl ClusterLayer {
    pub fn new(radius: f32) -> Self {
        Self {
            markers: Vec::new(),
            radius: radius.max(1.0),
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Group markers into square screen cells of the cluster radius.
    ///
    /// `to_screen` maps `(lng, lat)` to screen pixels. Clusters come out in
    /// the order their first member appears in the layer.
    pub fn clusters<F>(&self, to_screen: F) -> Vec<Cluster>
    where
        F: Fn(f64, f64) -> [f32; 2],
    {
        let mut cells: BTreeMap<(i64, i64), usize> = BTreeMap::new();
        let mut clusters: Vec<Cluster> = Vec::new();

        for (i, m) in self.markers.iter().enumerate() {
            let [x, y] = to_screen(m.lng, m.lat);
            let key = (
                (x / self.radius).floor() as i64,
                (y / self.radius).floor() as i64,
            );
            match cells.get(&key) {
                Some(&c) => clusters[c].members.push(i),
                None => {
                    cells.insert(key, clusters.len());
                    clusters.push(Cluster {
                        members: vec![i],
                        lat: 0.0,
                        lng: 0.0,
                    });
                }
            }
        }

        for cluster in &mut clusters {
            let n = cluster.members.len() as f64;
            cluster.lat = cluster.members.iter().map(|&i| self.markers[i].lat).sum::<f64>() / n;
            cluster.lng = cluster.members.iter().map(|&i| self.markers[i].lng).sum::<f64>() / n;
        }
        clusters
    }

    /// Index of the marker nearest to `target` on screen, if within
    /// `max_distance` pixels.
    pub fn nearest<F>(&self, target: [f32; 2], max_distance: f32, to_screen: F) -> Option<usize>
    where
        F: Fn(f64, f64) -> [f32; 2],
    {
        self.markers
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let [x, y] = to_screen(m.lng, m.lat);
                let d = ((x - target[0]).powi(2) + (y - target[1]).powi(2)).sqrt();
                (i, d)
            })
            .filter(|&(_, d)| d <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Category;
    use crate::view::sync::marker_style;

    fn marker(id: &str, lng: f64, lat: f64) -> Marker {
        Marker {
            point_index: 0,
            point_id: id.to_string(),
            lat,
            lng,
            category: Category::Blind,
            severity: 2,
            style: marker_style(Category::Blind, 2),
        }
    }

    /// 1 degree = 1000 px, y grows downward.
    fn to_screen(lng: f64, lat: f64) -> [f32; 2] {
        [(lng * 1000.0) as f32, (-lat * 1000.0) as f32]
    }

    fn layer(markers: Vec<Marker>) -> ClusterLayer {
        let mut layer = ClusterLayer::new(48.0);
        for m in markers {
            layer.add_marker(m);
        }
        layer
    }

    #[test]
    fn test_close_markers_share_a_cluster() {
        let layer = layer(vec![
            marker("a", 0.001, 0.001),
            marker("b", 0.002, 0.002),
            marker("c", 0.500, 0.500),
        ]);
        let clusters = layer.clusters(to_screen);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![0, 1]);
        assert!((clusters[0].lng - 0.0015).abs() < 1e-9);
        assert!(clusters[1].is_single());
    }

    #[test]
    fn test_clustering_keeps_every_marker() {
        let layer = layer((0..50).map(|i| marker("m", i as f64 * 0.01, 0.0)).collect());
        let clusters = layer.clusters(to_screen);
        assert_eq!(clusters.iter().map(Cluster::len).sum::<usize>(), 50);
    }

    #[test]
    fn test_clear_empties_layer() {
        let mut layer = layer(vec![marker("a", 0.0, 0.0)]);
        layer.clear_layers();
        assert!(layer.is_empty());
        assert!(layer.clusters(to_screen).is_empty());
    }

    #[test]
    fn test_nearest_within_distance() {
        let layer = layer(vec![marker("a", 0.0, 0.0), marker("b", 0.1, 0.0)]);
        assert_eq!(layer.nearest([98.0, 0.0], 10.0, to_screen), Some(1));
        assert_eq!(layer.nearest([50.0, 0.0], 10.0, to_screen), None);
    }
}
