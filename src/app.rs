use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use eframe::egui;

use crate::config::MapConfig;
use crate::data::loader::{self, LoadedDataset};
use crate::state::AppState;
use crate::ui::{map_view, panels};

type LoadResult = anyhow::Result<LoadedDataset>;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RouteSafetyApp {
    pub state: AppState,
    /// Result channel of the load running in the background, if any.
    pending_load: Option<Receiver<LoadResult>>,
}

impl RouteSafetyApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &MapConfig) -> Self {
        let mut app = Self {
            state: AppState::new(config),
            pending_load: None,
        };
        app.start_load(&cc.egui_ctx, config.data_path.clone());
        app
    }

    /// Read `path` on a worker thread; the result is picked up in `update`.
    fn start_load(&mut self, ctx: &egui::Context, path: PathBuf) {
        self.state.begin_load(&path);

        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = loader::load_file(&path);
            if tx.send(result).is_err() {
                log::warn!("Load finished after the window closed");
            }
            ctx.request_repaint();
        });
        self.pending_load = Some(rx);
    }

    fn poll_load(&mut self) {
        let Some(rx) = &self.pending_load else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending_load = None;
                self.state.finish_load(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending_load = None;
                self.state
                    .finish_load(Err(anyhow::anyhow!("loader thread stopped unexpectedly")));
            }
        }
    }
}

impl eframe::App for RouteSafetyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            if let Some(path) = panels::top_bar(ui, &mut self.state) {
                self.start_load(ctx, path);
            }
        });

        // ---- Left side panel: filters + stats ----
        egui::SidePanel::left("filter_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map_view::hazard_map(ui, &mut self.state);
        });

        panels::details_window(ctx, &mut self.state);
        panels::load_error_window(ctx, &mut self.state);
    }
}
