use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::category_color;
use crate::data::export::EXPORT_FILENAME;
use crate::data::model::{Category, MAX_SEVERITY, MIN_SEVERITY};
use crate::state::{AppState, Command, StatusKind};

/// Small filled circle in the category colour.
fn swatch(ui: &mut Ui, color: Color32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
    ui.painter().circle_filled(rect.center(), 5.0, color);
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets and stats
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Filters");
            ui.separator();

            // ---- Category checkboxes ----
            ui.strong("Categories");
            for cat in Category::ALL {
                let mut checked = state.criteria.active.contains(&cat);
                let changed = ui
                    .horizontal(|ui: &mut Ui| {
                        let response = ui.checkbox(&mut checked, "");
                        swatch(ui, category_color(cat));
                        ui.label(cat.label());
                        response.changed()
                    })
                    .inner;
                if changed {
                    state.toggle_category(cat, checked);
                }
            }
            ui.add_space(6.0);

            // ---- Severity ----
            ui.strong("Minimum severity");
            ui.add(egui::Slider::new(
                &mut state.criteria.min_severity,
                MIN_SEVERITY..=MAX_SEVERITY,
            ));
            ui.add_space(6.0);

            // ---- Search ----
            ui.strong("Search");
            let search = ui.add(
                egui::TextEdit::singleline(&mut state.criteria.search)
                    .hint_text("description or status"),
            );
            if search.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                state.dispatch(Command::ApplyFilters);
            }
            ui.add_space(6.0);

            // ---- Actions ----
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Apply").clicked() {
                    state.dispatch(Command::ApplyFilters);
                }
                if ui.button("Reset").clicked() {
                    state.dispatch(Command::ResetFilters);
                }
            });
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Export GeoJSON").clicked() {
                    if let Some(path) = save_file_dialog() {
                        state.dispatch(Command::Export(path));
                    }
                }
                if ui.button("Locate me").clicked() {
                    state.dispatch(Command::Locate);
                }
            });

            ui.separator();
            stats_table(ui, state);
        });
}

/// One row per category, zeros included.
fn stats_table(ui: &mut Ui, state: &AppState) {
    ui.strong(format!("Visible reports: {}", state.stats.total()));

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::exact(16.0))
        .column(Column::remainder())
        .column(Column::auto().at_least(32.0))
        .body(|mut body| {
            for (cat, n) in state.stats.rows() {
                body.row(20.0, |mut row| {
                    row.col(|ui: &mut Ui| swatch(ui, category_color(cat)));
                    row.col(|ui: &mut Ui| {
                        ui.label(cat.label());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(n.to_string());
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. Returns a file to load if one was picked.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) -> Option<PathBuf> {
    let mut picked = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                picked = open_file_dialog();
                ui.close_menu();
            }
            if ui.button("Export GeoJSON…").clicked() {
                if let Some(path) = save_file_dialog() {
                    state.dispatch(Command::Export(path));
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
        } else {
            ui.label(format!(
                "{} reports loaded, {} visible",
                state.store.len(),
                state.visible_indices.len()
            ));
        }

        if let Some((kind, msg)) = &state.status_message {
            ui.separator();
            let color = match kind {
                StatusKind::Info => ui.visuals().text_color(),
                StatusKind::Error => Color32::RED,
            };
            ui.label(RichText::new(msg).color(color));
        }
    });

    picked
}

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Details of the clicked marker.
pub fn details_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(point) = state.selected_point().cloned() else {
        return;
    };

    let mut open = true;
    egui::Window::new("Hazard report")
        .open(&mut open)
        .resizable(false)
        .default_width(320.0)
        .show(ctx, |ui: &mut Ui| {
            let place: Vec<&str> = [point.block.as_str(), point.school.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect();
            if !place.is_empty() {
                ui.label(RichText::new(place.join(" / ")).small().weak());
            }

            ui.horizontal(|ui: &mut Ui| {
                swatch(ui, category_color(point.category));
                ui.strong(format!(
                    "{} (severity {})",
                    point.category.label(),
                    point.severity
                ));
            });

            if !point.description.is_empty() {
                ui.add(egui::Label::new(&point.description).wrap());
            }
            if !point.photo_url.is_empty() {
                if point.photo_url.starts_with("file://") {
                    ui.add(egui::Image::new(point.photo_url.as_str()).max_width(300.0));
                }
                ui.hyperlink_to("View photo", &point.photo_url);
            }
            if !point.status.is_empty() {
                ui.label(RichText::new(format!("Status: {}", point.status)).small());
            }
            if !point.timestamp.is_empty() {
                ui.label(RichText::new(format!("Reported: {}", point.timestamp)).small().weak());
            }
        });

    if !open {
        state.selected = None;
    }
}

/// Modal-style notice for a failed load.
pub fn load_error_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.load_error.clone() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Could not load hazard data")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui: &mut Ui| {
            ui.label(RichText::new(message).color(Color32::RED));
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        state.load_error = None;
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open hazard reports")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

pub fn save_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export filtered reports")
        .set_file_name(EXPORT_FILENAME)
        .add_filter("GeoJSON", &["geojson", "json"])
        .save_file()
}
