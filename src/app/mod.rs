mod animation;
mod annotate;
mod filter;
mod geometry;
mod interaction;
mod layout;
mod prefs;
mod propagation;
mod store;
mod ui;
mod view;
mod visuals;

use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use eframe::egui;

use crate::project::{ProjectGraph, ProjectSource, collect_project_graph};

use animation::AnimationScheduler;
use filter::TypeVisibility;
use interaction::GestureState;
use prefs::Preferences;
use propagation::PropagationConfig;
use store::{GraphStore, SyncStatus};

const AUTO_REFRESH_INTERVAL_SECS: f64 = 20.0;

enum AppState {
    Loading {
        rx: mpsc::Receiver<Result<ProjectGraph>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

pub struct CodeVisualApp {
    source: ProjectSource,
    state: AppState,
    prefs: Preferences,
    refresh_rx: Option<mpsc::Receiver<Result<ProjectGraph>>>,
}

fn spawn_load(source: ProjectSource) -> mpsc::Receiver<Result<ProjectGraph>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(collect_project_graph(&source));
    });
    rx
}

impl CodeVisualApp {
    pub fn new(cc: &eframe::CreationContext<'_>, source: ProjectSource) -> Self {
        Self {
            state: AppState::Loading {
                rx: spawn_load(source.clone()),
            },
            source,
            prefs: Preferences::load(cc.storage),
            refresh_rx: None,
        }
    }
}

impl eframe::App for CodeVisualApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(graph)) => {
                        self.state = AppState::Ready(Box::new(ViewModel::new(
                            graph,
                            self.prefs.clone(),
                            self.source.is_mock(),
                        )));
                    }
                    Ok(Err(err)) => {
                        self.state = AppState::Error(format!("{err:#}"));
                    }
                    Err(mpsc::TryRecvError::Empty) => {
                        egui::CentralPanel::default().show(ctx, |ui| {
                            ui.centered_and_justified(|ui| {
                                ui.spinner();
                            });
                        });
                        ctx.request_repaint();
                    }
                    Err(mpsc::TryRecvError::Disconnected) => {
                        self.state = AppState::Error("project loader stopped".to_string());
                    }
                }
            }
            AppState::Error(message) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.3);
                        ui.colored_label(egui::Color32::from_rgb(240, 120, 110), message.as_str());
                        ui.add_space(12.0);
                        retry = ui.button("Retry").clicked();
                    });
                });
                if retry {
                    self.state = AppState::Loading {
                        rx: spawn_load(self.source.clone()),
                    };
                }
            }
            AppState::Ready(model) => {
                // apply a finished background refresh before drawing
                if let Some(rx) = &self.refresh_rx {
                    match rx.try_recv() {
                        Ok(Ok(graph)) => {
                            model.apply_refresh(graph, ctx.input(|input| input.time));
                            self.refresh_rx = None;
                        }
                        Ok(Err(_)) | Err(mpsc::TryRecvError::Disconnected) => {
                            model.store.set_sync_status(SyncStatus::Error);
                            self.refresh_rx = None;
                        }
                        Err(mpsc::TryRecvError::Empty) => {}
                    }
                }

                let mut reload_requested = false;
                model.show(ctx, &mut reload_requested, self.refresh_rx.is_some());

                let now = ctx.input(|input| input.time);
                let auto_due = model.auto_refresh_enabled
                    && !model.source_is_mock
                    && now - model.last_refresh_time >= AUTO_REFRESH_INTERVAL_SECS;
                if (reload_requested || auto_due) && self.refresh_rx.is_none() {
                    model.store.set_sync_status(SyncStatus::Syncing);
                    model.last_refresh_time = now;
                    self.refresh_rx = Some(spawn_load(self.source.clone()));
                }

                // keep polling the refresh channel / timer without input events
                if self.refresh_rx.is_some() {
                    ctx.request_repaint_after(Duration::from_millis(150));
                } else if model.auto_refresh_enabled && !model.source_is_mock {
                    ctx.request_repaint_after(Duration::from_secs(1));
                }
            }
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let AppState::Ready(model) = &self.state {
            model.preferences().store(storage);
        }
    }
}

/// All per-project UI state behind the Ready arm: the graph store, filter
/// flags, the animation scheduler and in-flight gesture bookkeeping.
pub(in crate::app) struct ViewModel {
    store: GraphStore,
    type_filters: TypeVisibility,
    motion_speed_factor: f32,
    scheduler: AnimationScheduler,
    gestures: GestureState,
    propagation: PropagationConfig,
    auto_refresh_enabled: bool,
    source_is_mock: bool,
    last_layout_revision: Option<u64>,
    frame_dirty: bool,
    last_focused_node_id: Option<String>,
    visible_node_count: usize,
    visible_edge_count: usize,
    last_refresh_time: f64,
}

impl ViewModel {
    fn new(graph: ProjectGraph, prefs: Preferences, source_is_mock: bool) -> Self {
        Self {
            store: GraphStore::new(graph, prefs.connection_depth),
            type_filters: TypeVisibility::from_hidden(prefs.hidden_types),
            motion_speed_factor: prefs.motion_speed_factor,
            scheduler: AnimationScheduler::new(),
            gestures: GestureState::default(),
            propagation: PropagationConfig::default(),
            auto_refresh_enabled: false,
            source_is_mock,
            last_layout_revision: None,
            frame_dirty: true,
            last_focused_node_id: None,
            visible_node_count: 0,
            visible_edge_count: 0,
            last_refresh_time: 0.0,
        }
    }

    fn apply_refresh(&mut self, graph: ProjectGraph, now: f64) {
        self.store.apply_project(graph);
        self.store.set_sync_status(SyncStatus::Connected);
        self.last_refresh_time = now;
    }

    fn preferences(&self) -> Preferences {
        Preferences {
            motion_speed_factor: self.motion_speed_factor,
            connection_depth: self.store.connection_depth(),
            hidden_types: self.type_filters.hidden_types(),
        }
    }

    fn show(&mut self, ctx: &egui::Context, reload_requested: &mut bool, is_syncing: bool) {
        egui::SidePanel::right("controls")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                self.draw_controls(ui, reload_requested, is_syncing);
            });

        egui::TopBottomPanel::bottom("footer")
            .exact_height(46.0)
            .show(ctx, |ui| {
                self.draw_footer(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_graph(ui);
            });
    }
}
