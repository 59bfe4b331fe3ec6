use std::collections::HashMap;

use eframe::egui::{Pos2, Rect, Vec2, vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::graph::{EdgeRecord, NodeRecord};

use super::highlight::HighlightRules;
use super::physics::{self, Body, Link, QuadtreeCell, SimulationConfig};
use super::picking::{self, Pick};
use super::schedule::{FrameScheduler, RenderLoop};
use super::selection::{EdgeKey, Selection, SelectionController, SelectionHandler};
use super::viewport::ViewportController;

mod build;
mod interaction;
mod view;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Surface {
    rect: Rect,
    pixels_per_point: f32,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    quadtree_cells: Vec<QuadtreeCell>,
}

/// The interactive graph surface: owns the working node/edge set, the layout
/// arena, the view transform and the selection, and decides when a frame is
/// due.
pub(in crate::app) struct GraphCanvas {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    index_by_id: HashMap<String, usize>,
    bodies: Vec<Body>,
    links: Vec<Link>,
    simulation: SimulationConfig,
    viewport: ViewportController,
    highlight: HighlightRules,
    selection: SelectionController,
    render_loop: RenderLoop,
    rng: StdRng,
    surface: Option<Surface>,
    observing_resize: bool,
    hover: Option<(Pick, Pos2)>,
    show_quadtree: bool,
    scratch: ViewScratch,
}

impl GraphCanvas {
    pub(in crate::app) fn new(scheduler: Box<dyn FrameScheduler>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index_by_id: HashMap::new(),
            bodies: Vec::new(),
            links: Vec::new(),
            simulation: SimulationConfig::default(),
            viewport: ViewportController::default(),
            highlight: HighlightRules::default(),
            selection: SelectionController::default(),
            render_loop: RenderLoop::new(scheduler),
            rng,
            surface: None,
            observing_resize: true,
            hover: None,
            show_quadtree: false,
            scratch: ViewScratch::default(),
        }
    }

    pub(in crate::app) fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    #[cfg(test)]
    pub(in crate::app) fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub(in crate::app) fn link_count(&self) -> usize {
        self.links.len()
    }

    pub(in crate::app) fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub(in crate::app) fn edge(&self, key: &EdgeKey) -> Option<&EdgeRecord> {
        self.edges.iter().find(|edge| key.matches(edge))
    }

    pub(in crate::app) fn selection(&self) -> &Selection {
        self.selection.state()
    }

    pub(in crate::app) fn is_settled(&self) -> bool {
        self.simulation.is_settled()
    }

    pub(in crate::app) fn show_quadtree(&self) -> bool {
        self.show_quadtree
    }

    pub(in crate::app) fn set_show_quadtree(&mut self, show: bool) {
        if self.show_quadtree != show {
            self.show_quadtree = show;
            self.render_loop.schedule();
        }
    }

    pub(in crate::app) fn set_highlight_since(&mut self, since: Option<i64>) {
        self.highlight.set_since(since);
        self.render_loop.schedule();
    }

    pub(in crate::app) fn set_search_term(&mut self, term: &str) {
        self.highlight.set_search(term);
        self.render_loop.schedule();
    }

    pub(in crate::app) fn set_dim_mode(&mut self, dim_mode: bool) {
        self.highlight.set_dim_mode(dim_mode);
        self.render_loop.schedule();
    }

    pub(in crate::app) fn reset_view(&mut self) {
        self.viewport.reset();
        tracing::debug!("view reset");
        self.render_loop.schedule();
    }

    /// Same as a wheel notch: `raw` is a window position in logical points.
    pub(in crate::app) fn zoom(&mut self, delta: f32, raw: Pos2) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        self.viewport.zoom_at_raw(delta, raw);
        self.render_loop.schedule();
    }

    /// Moves the view by a device-pixel delta.
    pub(in crate::app) fn pan(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
        self.render_loop.schedule();
    }

    pub(in crate::app) fn set_selection_change_handler(&mut self, handler: Option<SelectionHandler>) {
        self.selection.set_handler(handler);
    }

    pub(in crate::app) fn clear_selection(&mut self) {
        self.selection.clear();
        self.render_loop.schedule();
    }

    /// Recomputes the backing size from the on-screen rect and pixel density.
    pub(in crate::app) fn resize(&mut self, rect: Rect, pixels_per_point: f32) {
        let first_measure = self.surface.is_none();
        self.viewport.set_surface(rect.min, pixels_per_point);
        let pixels_per_point = self.viewport.pixels_per_point();
        let size = vec2(
            (rect.width() * pixels_per_point).floor().max(1.0),
            (rect.height() * pixels_per_point).floor().max(1.0),
        );

        self.simulation.canvas_size = size;
        self.simulation.center = size * 0.5;
        self.surface = Some(Surface {
            rect,
            pixels_per_point,
        });

        // Anything placed before the first measurement used the default canvas.
        if first_measure && !self.bodies.is_empty() {
            self.reseed_bodies();
            tracing::debug!(nodes = self.bodies.len(), "reseeded layout for measured canvas");
        }
        self.render_loop.schedule();
    }

    /// Host-side resize observation: calls `resize` only when the allocated
    /// rect or pixel density actually changed.
    pub(in crate::app) fn observe_surface(&mut self, rect: Rect, pixels_per_point: f32) {
        if !self.observing_resize {
            return;
        }
        let current = Surface {
            rect,
            pixels_per_point,
        };
        if self.surface != Some(current) {
            self.resize(rect, pixels_per_point);
        }
    }

    pub(in crate::app) fn destroy(&mut self) {
        self.render_loop.cancel();
        self.observing_resize = false;
        tracing::debug!("graph canvas torn down");
    }

    /// Runs the pending frame's simulation step, if one is due, and keeps the
    /// loop going while the layout is still moving.
    pub(in crate::app) fn advance_frame(&mut self) -> bool {
        if !self.render_loop.begin_frame() {
            return false;
        }

        let worked = physics::tick(&mut self.bodies, &self.links, &mut self.simulation);
        if worked {
            if self.simulation.is_settled() {
                tracing::debug!(alpha = self.simulation.alpha, "layout settled");
            }
            self.render_loop.schedule();
        }
        worked
    }

    fn pick_raw(&self, raw: Pos2) -> Pick {
        let world = self.viewport.raw_to_world(raw);
        picking::pick(&self.bodies, &self.links, world, self.viewport.scale())
    }

    /// Click semantics: select whatever is under the pointer, or clear.
    pub(in crate::app) fn click_at(&mut self, raw: Pos2) {
        let next = Selection::from_pick(self.pick_raw(raw), &self.nodes, &self.edges);
        self.selection.select(next);
        self.render_loop.schedule();
    }

    pub(in crate::app) fn hover_at(&mut self, raw: Option<Pos2>) {
        self.hover = raw.map(|raw| (self.pick_raw(raw), raw));
    }
}
