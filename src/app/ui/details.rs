use eframe::egui::{self, RichText, Ui};
use serde::Serialize;

use super::super::ViewModel;
use super::super::selection::Selection;

fn pretty_json(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| format!("<unserializable: {error}>"))
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let (title, body) = match &self.selection {
            Selection::None => {
                ui.label("Click a node or an edge in the graph.");
                return;
            }
            Selection::Node(id) => match self.canvas.node(id) {
                Some(node) => (format!("Node {}", node.id), pretty_json(node)),
                None => {
                    ui.label("The selected node is no longer on the canvas.");
                    return;
                }
            },
            Selection::Edge(key) => match self.canvas.edge(key) {
                Some(edge) => (
                    format!("Edge {} → {}", edge.source, edge.target),
                    pretty_json(edge),
                ),
                None => {
                    ui.label("The selected edge is no longer on the canvas.");
                    return;
                }
            },
        };

        ui.label(RichText::new(title).strong());
        ui.separator();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(body).monospace());
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeRecord, NodeKind, NodeRecord};

    #[test]
    fn records_render_with_their_wire_names() {
        let node = pretty_json(&NodeRecord::new("n1", NodeKind::RelationalCalc, "Ratio"));
        assert!(node.contains("\"kind\": \"relational_calc\""));

        let edge = pretty_json(&EdgeRecord::new("a", "b", "feeds"));
        assert!(edge.contains("\"type\": \"feeds\""));
    }
}
