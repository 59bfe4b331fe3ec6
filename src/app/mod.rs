use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::graph::{GraphData, GraphFilter, load_graph_file};

mod canvas;
mod highlight;
mod physics;
mod picking;
mod render_utils;
mod schedule;
mod selection;
mod ui;
mod viewport;

use self::canvas::GraphCanvas;
use self::selection::Selection;

/// Startup choices taken from the command line.
#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub graph_path: PathBuf,
    pub seed: Option<u64>,
    pub dim_mode: bool,
    pub highlight_minutes: Option<u32>,
}

type LoadResult = Result<GraphData, String>;

pub struct GraphLensApp {
    options: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    canvas: GraphCanvas,
    full_data: GraphData,
    filter: GraphFilter,
    search: String,
    highlight_minutes: Option<u32>,
    dim_mode: bool,
    selection_rx: Receiver<Selection>,
    selection: Selection,
}

impl GraphLensApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::start_load(options.graph_path.clone());
        Self {
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(graph_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph_file(&graph_path).map_err(|error| {
                let message = format!("{error:#}");
                tracing::error!(error = %message, "graph load failed");
                message
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(graph_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(graph_path),
        }
    }
}

impl eframe::App for GraphLensApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(match result {
                            Ok(data) => {
                                AppState::Ready(Box::new(ViewModel::new(ctx, data, &self.options)))
                            }
                            Err(error) => AppState::Error(error),
                        });
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load graph");
                    ui.add_space(6.0);
                    ui.label(self.options.graph_path.display().to_string());
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.options.graph_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.options, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.options.graph_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(data)) => model.replace_data(data),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            if let AppState::Ready(model) = &mut self.state {
                model.canvas.destroy();
            }
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
