use std::collections::BTreeMap;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotBounds, PlotPoint, Points, Text};

use crate::data::model::Category;
use crate::state::AppState;
use crate::view::sync::MarkerStyle;

/// Click distance in pixels within which a marker counts as hit.
const PICK_RADIUS: f32 = 12.0;
const CLUSTER_COLOR: Color32 = Color32::from_rgb(30, 90, 170);

// ---------------------------------------------------------------------------
// Hazard map (central panel)
// ---------------------------------------------------------------------------

/// Render the marker map in the central panel. Longitude runs along x,
/// latitude along y.
pub fn hazard_map(ui: &mut Ui, state: &mut AppState) {
    let size = ui.available_size();
    let aspect = if size.x > 0.0 {
        (size.y / size.x) as f64
    } else {
        0.75
    };

    let reset_bounds = state.viewport.take_pending();
    if reset_bounds {
        // Marker clusters use the previous frame's transform.
        ui.ctx().request_repaint();
    }
    let (min, max) = state.viewport.bounds(aspect);
    let lat_scale = 1.0 / state.viewport.center.lat.to_radians().cos().max(0.01);

    let layer = &state.markers;

    let response = Plot::new("hazard_map")
        .data_aspect(lat_scale as f32)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(|_, p| format!("{:.5}, {:.5}", p.y, p.x))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if reset_bounds {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
            }

            let clusters = layer.clusters(|lng, lat| {
                let p = plot_ui.screen_from_plot(PlotPoint::new(lng, lat));
                [p.x, p.y]
            });

            // Single markers are batched per style so each style is one item.
            let mut singles: BTreeMap<(Category, u8), (MarkerStyle, Vec<[f64; 2]>)> =
                BTreeMap::new();
            let mut groups = Vec::new();

            for cluster in &clusters {
                if cluster.is_single() {
                    let m = &layer.markers()[cluster.members[0]];
                    singles
                        .entry((m.category, m.severity))
                        .or_insert_with(|| (m.style, Vec::new()))
                        .1
                        .push([m.lng, m.lat]);
                } else {
                    groups.push(cluster);
                }
            }

            for ((cat, severity), (style, positions)) in singles {
                plot_ui.points(
                    Points::new(positions)
                        .name(format!("{} · {}", cat.label(), severity))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(style.radius)
                        .color(style.color),
                );
            }

            for cluster in groups {
                let n = cluster.len();
                plot_ui.points(
                    Points::new(vec![[cluster.lng, cluster.lat]])
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(10.0 + 2.0 * (n as f32).ln())
                        .color(CLUSTER_COLOR.gamma_multiply(0.85)),
                );
                plot_ui.text(Text::new(
                    PlotPoint::new(cluster.lng, cluster.lat),
                    RichText::new(n.to_string()).color(Color32::WHITE).strong(),
                ));
            }
        });

    if response.response.clicked() {
        if let Some(pos) = response.response.interact_pointer_pos() {
            let transform = &response.transform;
            let hit = state.markers.nearest([pos.x, pos.y], PICK_RADIUS, |lng, lat| {
                let p = transform.position_from_point(&PlotPoint::new(lng, lat));
                [p.x, p.y]
            });
            if let Some(index) = hit {
                state.select_marker(index);
            }
        }
    }
}
