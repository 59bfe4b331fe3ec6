use eframe::egui::{self, Sense, Ui, vec2};

use crate::graph::{MAX_NODE_PRESETS, NodeKind};

use super::super::ViewModel;
use super::super::highlight::{kind_color, kind_shape};
use super::super::render_utils::fill_shape;

const HIGHLIGHT_WINDOWS: [Option<u32>; 5] = [None, Some(1), Some(5), Some(30), Some(120)];

fn highlight_window_label(minutes: Option<u32>) -> String {
    match minutes {
        None => "off".to_owned(),
        Some(1) => "last minute".to_owned(),
        Some(minutes) if minutes % 60 == 0 => format!("last {} hours", minutes / 60),
        Some(minutes) => format!("last {minutes} minutes"),
    }
}

fn max_nodes_label(max_nodes: usize) -> String {
    if max_nodes == 0 {
        "all".to_owned()
    } else {
        max_nodes.to_string()
    }
}

fn kind_swatch(ui: &mut Ui, kind: NodeKind) {
    let (rect, _) = ui.allocate_exact_size(vec2(16.0, 16.0), Sense::hover());
    fill_shape(ui.painter(), kind_shape(kind), rect.center(), 5.5, kind_color(kind));
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (id or label)")
            .on_hover_text("Highlight nodes whose id or label contains this text.");
        if ui.text_edit_singleline(&mut self.search).changed() {
            self.canvas.set_search_term(&self.search);
        }

        ui.add_space(4.0);
        let mut highlight_minutes = self.highlight_minutes;
        egui::ComboBox::from_id_salt("highlight_window")
            .selected_text(highlight_window_label(highlight_minutes))
            .show_ui(ui, |ui| {
                for window in HIGHLIGHT_WINDOWS {
                    ui.selectable_value(&mut highlight_minutes, window, highlight_window_label(window));
                }
            })
            .response
            .on_hover_text("Pulse nodes created or updated within this window.");
        if highlight_minutes != self.highlight_minutes {
            self.set_highlight_minutes(highlight_minutes);
        }

        let mut dim_mode = self.dim_mode;
        if ui
            .checkbox(&mut dim_mode, "Dim mode")
            .on_hover_text("Paint every node that is not highlighted in flat gray.")
            .changed()
        {
            self.set_dim_mode(dim_mode);
        }

        ui.separator();

        let mut filter_changed = false;
        egui::ComboBox::from_id_salt("max_nodes")
            .selected_text(format!("Max nodes: {}", max_nodes_label(self.filter.max_nodes)))
            .show_ui(ui, |ui| {
                for preset in MAX_NODE_PRESETS {
                    filter_changed |= ui
                        .selectable_value(&mut self.filter.max_nodes, preset, max_nodes_label(preset))
                        .changed();
                }
            })
            .response
            .on_hover_text("Keep only the most connected nodes.");

        filter_changed |= ui
            .checkbox(&mut self.filter.hide_isolated, "Hide isolated nodes")
            .changed();

        ui.add_space(4.0);
        ui.label("Kinds");
        for kind in NodeKind::ALL {
            ui.horizontal(|ui| {
                kind_swatch(ui, kind);
                let mut enabled = self.filter.enabled_kinds.contains(&kind);
                if ui
                    .checkbox(&mut enabled, kind.label())
                    .on_hover_text(kind.tag())
                    .changed()
                {
                    if enabled {
                        self.filter.enabled_kinds.insert(kind);
                    } else {
                        self.filter.enabled_kinds.remove(&kind);
                    }
                    filter_changed = true;
                }
            });
        }

        if filter_changed {
            self.apply_filter();
        }

        ui.separator();

        let mut show_quadtree = self.canvas.show_quadtree();
        if ui
            .checkbox(&mut show_quadtree, "Show quadtree overlay")
            .on_hover_text("Draw the spatial index cells used by the layout.")
            .changed()
        {
            self.canvas.set_show_quadtree(show_quadtree);
        }

        ui.horizontal(|ui| {
            if ui.button("Reset view").clicked() {
                self.canvas.reset_view();
            }
            let has_selection = self.canvas.selection().is_active();
            if ui
                .add_enabled(has_selection, egui::Button::new("Clear selection"))
                .clicked()
            {
                self.canvas.clear_selection();
            }
        });

        ui.add_space(8.0);
        ui.small("Wheel to zoom, drag to pan, click to select.");
    }
}
