use eframe::egui::{self, Ui, Vec2};

use super::super::picking::Pick;
use super::GraphCanvas;

impl GraphCanvas {
    /// Wheel zooms about the cursor, primary drag pans, primary click picks.
    pub(in crate::app) fn handle_input(&mut self, ui: &Ui, response: &egui::Response) {
        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON
                && let Some(pointer) = ui.input(|input| input.pointer.hover_pos())
            {
                // egui reports wheel-up as positive; zoom treats positive as "out".
                self.zoom(-scroll, pointer);
            }
        }

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(origin) = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos())
        {
            self.viewport.begin_drag(origin);
        }

        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
            && let Some(delta) = self.viewport.drag_to(pointer)
            && delta != Vec2::ZERO
        {
            self.pan(delta);
        }

        if response.drag_stopped() {
            self.viewport.end_drag();
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.click_at(pointer);
        }

        if self.viewport.is_dragging() {
            self.hover_at(None);
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else {
            self.hover_at(response.hover_pos());
            if self.hover.is_some_and(|(pick, _)| pick != Pick::Nothing) {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
        }
    }
}
