use std::time::Duration;

use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, vec2};

use crate::graph::{EdgeRecord, NodeRecord};
use crate::util::format_timestamp;

use super::super::highlight::{ACCENT, edge_appearance, node_appearance};
use super::super::physics::quadtree_cells;
use super::super::picking::Pick;
use super::super::render_utils::{
    circle_visible, draw_background, edge_visible, fill_shape, line_glow, stroke_shape,
    stroke_shape_glow, with_alpha,
};
use super::GraphCanvas;

const PULSE_FRAME: Duration = Duration::from_millis(33);
const TOOLTIP_MAX_PROPS: usize = 8;

fn node_tooltip(node: &NodeRecord) -> String {
    format!(
        "{}\n{}\n{}\ncreated: {}\nupdated: {}",
        node.kind.tag(),
        node.id,
        if node.label.is_empty() { "-" } else { &node.label },
        format_timestamp(node.created),
        format_timestamp(node.updated),
    )
}

fn edge_tooltip(edge: &EdgeRecord) -> String {
    let mut text = format!("{}\n{} → {}", edge.edge_type, edge.source, edge.target);
    let props = edge
        .props
        .iter()
        .take(TOOLTIP_MAX_PROPS)
        .map(|(key, value)| match value {
            serde_json::Value::String(value) => format!("{key}={value}"),
            other => format!("{key}={other}"),
        })
        .collect::<Vec<_>>();
    if !props.is_empty() {
        text.push('\n');
        text.push_str(&props.join(", "));
    }
    text
}

fn paint_empty_hint(painter: &Painter, at: Pos2) {
    painter.text(
        at,
        Align2::CENTER_CENTER,
        "No nodes match the current filters.",
        FontId::proportional(14.0),
        Color32::from_gray(170),
    );
}

impl GraphCanvas {
    /// Allocates the canvas, feeds it this frame's input, steps the layout if a
    /// frame is due and paints.
    pub(in crate::app) fn show(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.observe_surface(rect, ui.ctx().pixels_per_point());
        self.handle_input(ui, &response);
        self.advance_frame();

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);
        if self.nodes.is_empty() {
            paint_empty_hint(&painter, rect.center());
            return;
        }

        if self.show_quadtree {
            self.paint_quadtree(&painter);
        }

        self.update_screen_positions();
        self.paint_edges(&painter, rect);
        let time_ms = ui.input(|input| input.time) * 1000.0;
        let pulsing = self.paint_nodes(&painter, rect, time_ms);
        self.paint_tooltip(&painter, rect);

        if pulsing {
            ui.ctx().request_repaint_after(PULSE_FRAME);
        }
    }

    fn update_screen_positions(&mut self) {
        let positions = &mut self.scratch.screen_positions;
        positions.clear();
        positions.extend(
            self.bodies
                .iter()
                .map(|body| self.viewport.world_to_points(body.position)),
        );
    }

    fn paint_quadtree(&mut self, painter: &Painter) {
        quadtree_cells(&self.bodies, &self.simulation, &mut self.scratch.quadtree_cells);
        for cell in &self.scratch.quadtree_cells {
            let min = self.viewport.world_to_points(cell.min);
            let max = self.viewport.world_to_points(cell.max);
            let alpha = if cell.is_leaf { 0.4 } else { 0.2 };
            let width = (1.4 - cell.depth as f32 * 0.09).clamp(0.45, 1.4);
            painter.rect_stroke(
                Rect::from_two_pos(min, max),
                0.0,
                Stroke::new(width, with_alpha(Color32::from_rgb(106, 198, 255), alpha)),
                egui::StrokeKind::Middle,
            );
        }
    }

    fn paint_edges(&self, painter: &Painter, rect: Rect) {
        let pixels_per_point = self.viewport.pixels_per_point();
        let selection = self.selection.state();
        let positions = &self.scratch.screen_positions;

        for link in &self.links {
            let (Some(&start), Some(&end)) = (positions.get(link.source), positions.get(link.target))
            else {
                continue;
            };
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }
            let Some(edge) = self.edges.get(link.edge) else {
                continue;
            };

            let look = edge_appearance(edge, selection);
            if let Some(glow) = look.glow_px {
                line_glow(painter, start, end, ACCENT, glow / pixels_per_point);
            }
            painter.line_segment(
                [start, end],
                Stroke::new(look.width_px / pixels_per_point, look.color),
            );
        }
    }

    /// Returns whether any visible node is pulsing.
    fn paint_nodes(&self, painter: &Painter, rect: Rect, time_ms: f64) -> bool {
        let pixels_per_point = self.viewport.pixels_per_point();
        let world_to_points = self.viewport.scale() / pixels_per_point;
        let selection = self.selection.state();
        let mut pulsing = false;

        for (node, &center) in self.nodes.iter().zip(&self.scratch.screen_positions) {
            let look = node_appearance(node, &self.highlight, selection, time_ms);
            let radius = look.radius * world_to_points;
            if !circle_visible(rect, center, radius * 1.5 + 24.0) {
                continue;
            }
            pulsing |= look.pulsing;

            fill_shape(painter, look.shape, center, radius, look.fill);

            if let Some(ring) = look.ring {
                let ring_radius = (look.radius + ring.gap) * world_to_points;
                stroke_shape_glow(
                    painter,
                    look.shape,
                    center,
                    ring_radius,
                    ACCENT,
                    ring.glow_px / pixels_per_point,
                );
                stroke_shape(
                    painter,
                    look.shape,
                    center,
                    ring_radius,
                    Stroke::new(ring.width_px / pixels_per_point, with_alpha(ACCENT, ring.alpha)),
                );
            }
        }

        pulsing
    }

    fn paint_tooltip(&self, painter: &Painter, rect: Rect) {
        let Some((pick, pointer)) = self.hover else {
            return;
        };
        let text = match pick {
            Pick::Node(index) => self.nodes.get(index).map(node_tooltip),
            Pick::Edge(index) => self.edges.get(index).map(edge_tooltip),
            Pick::Nothing => None,
        };
        let Some(text) = text else {
            return;
        };

        let galley = painter.layout_no_wrap(
            text,
            FontId::monospace(12.0),
            Color32::from_rgb(220, 236, 255),
        );
        let padding = vec2(8.0, 6.0);
        let size = galley.size() + padding * 2.0;

        let mut origin = pointer + vec2(14.0, 14.0);
        if origin.x + size.x > rect.right() {
            origin.x = (pointer.x - 14.0 - size.x).max(rect.left());
        }
        if origin.y + size.y > rect.bottom() {
            origin.y = (pointer.y - 14.0 - size.y).max(rect.top());
        }

        let frame = Rect::from_min_size(origin, size);
        painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(8, 16, 28, 235));
        painter.rect_stroke(
            frame,
            4.0,
            Stroke::new(1.0, with_alpha(ACCENT, 0.35)),
            egui::StrokeKind::Inside,
        );
        painter.galley(origin + padding, galley, Color32::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;
    use crate::graph::NodeKind;

    #[test]
    fn node_tooltip_lists_kind_id_label_and_times() {
        let mut node = NodeRecord::new("agent-7", NodeKind::ZntIii, "");
        node.created = Some(0);
        let text = node_tooltip(&node);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "znt-iii");
        assert_eq!(lines[1], "agent-7");
        assert_eq!(lines[2], "-");
        assert_eq!(lines[3], "created: 1970-01-01T00:00:00.000Z");
        assert_eq!(lines[4], "updated: -");
    }

    #[test]
    fn edge_tooltip_caps_property_count() {
        let mut edge = EdgeRecord::new("a", "b", "feeds");
        edge.props = (0..12)
            .map(|i| (format!("k{i:02}"), json!(i)))
            .collect::<BTreeMap<_, _>>();
        edge.props.insert("name".to_owned(), json!("plain"));

        let text = edge_tooltip(&edge);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "feeds");
        assert_eq!(lines[1], "a → b");
        assert_eq!(lines[2].split(", ").count(), TOOLTIP_MAX_PROPS);
        assert!(lines[2].starts_with("k00=0, k01=1"));
    }
}
