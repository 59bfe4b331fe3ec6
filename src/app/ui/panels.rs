use std::sync::mpsc;

use eframe::egui::{self, Align, Context, Layout};

use crate::graph::{GraphData, GraphFilter};
use crate::util::minutes_ago;

use super::super::canvas::GraphCanvas;
use super::super::schedule::EguiScheduler;
use super::super::selection::Selection;
use super::super::{LaunchOptions, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(ctx: &Context, data: GraphData, options: &LaunchOptions) -> Self {
        let mut canvas = GraphCanvas::new(Box::new(EguiScheduler::new(ctx.clone())), options.seed);

        let (selection_tx, selection_rx) = mpsc::channel();
        canvas.set_selection_change_handler(Some(Box::new(move |selection: &Selection| {
            let _ = selection_tx.send(selection.clone());
        })));

        let mut model = Self {
            canvas,
            full_data: data,
            filter: GraphFilter::default(),
            search: String::new(),
            highlight_minutes: None,
            dim_mode: false,
            selection_rx,
            selection: Selection::None,
        };
        model.set_dim_mode(options.dim_mode);
        model.set_highlight_minutes(options.highlight_minutes);
        model.apply_filter();
        model
    }

    /// Pushes the filtered working set to the canvas.
    pub(in crate::app) fn apply_filter(&mut self) {
        self.canvas.set_data(self.filter.apply(&self.full_data));
    }

    pub(in crate::app) fn replace_data(&mut self, data: GraphData) {
        self.full_data = data;
        self.apply_filter();
    }

    pub(in crate::app) fn set_highlight_minutes(&mut self, minutes: Option<u32>) {
        self.highlight_minutes = minutes;
        self.canvas.set_highlight_since(minutes.map(minutes_ago));
    }

    pub(in crate::app) fn set_dim_mode(&mut self, dim_mode: bool) {
        self.dim_mode = dim_mode;
        self.canvas.set_dim_mode(dim_mode);
    }

    fn drain_selection_events(&mut self) {
        while let Ok(selection) = self.selection_rx.try_recv() {
            self.selection = selection;
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        options: &LaunchOptions,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.drain_selection_events();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("graph-lens");
                    ui.separator();
                    ui.label(format!("file: {}", options.graph_path.display()));
                    ui.label(format!("nodes: {}", self.full_data.nodes.len()));
                    ui.label(format!("edges: {}", self.full_data.edges.len()));
                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if is_loading {
                        ui.spinner();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.canvas.show(ui));

        // The click handler may have fired during this frame's canvas pass.
        self.drain_selection_events();
    }

    fn visible_graph_text(&self) -> String {
        let layout = if self.canvas.is_settled() {
            "settled"
        } else {
            "settling"
        };
        format!(
            "showing {} nodes, {} edges ({layout})",
            self.canvas.nodes().len(),
            self.canvas.link_count()
        )
    }
}
