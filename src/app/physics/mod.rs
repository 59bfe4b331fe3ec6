mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};

use forces::{accumulate_repulsion, apply_centering, apply_link_forces};
pub(in crate::app) use quadtree::QuadtreeCell;
use quadtree::{QuadBounds, QuadNode, collect_quadtree_cells};

/// Tunables and per-run energy for the layout. `alpha` decays every tick and
/// the simulation is at rest once it falls below `alpha_min`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct SimulationConfig {
    pub alpha: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    pub charge: f32,
    pub theta: f32,
    pub jitter: f32,
    pub link_distance: f32,
    pub link_strength: f32,
    pub center_strength: f32,
    pub bounds_pad: f32,
    pub center: Vec2,
    /// Fallback bounds when no body has a finite position.
    pub canvas_size: Vec2,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_min: 0.03,
            alpha_decay: 0.02,
            velocity_decay: 0.55,
            charge: 26.0,
            theta: 0.9,
            jitter: 0.01,
            link_distance: 44.0,
            link_strength: 0.06,
            center_strength: 0.0025,
            bounds_pad: 220.0,
            center: vec2(480.0, 320.0),
            canvas_size: vec2(960.0, 640.0),
        }
    }
}

impl SimulationConfig {
    pub(in crate::app) fn for_canvas(canvas_size: Vec2) -> Self {
        Self {
            center: canvas_size * 0.5,
            canvas_size,
            ..Self::default()
        }
    }

    pub(in crate::app) fn is_settled(&self) -> bool {
        self.alpha < self.alpha_min
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// An edge whose endpoints both resolved to bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct Link {
    pub edge: usize,
    pub source: usize,
    pub target: usize,
}

fn simulation_bounds(bodies: &[Body], config: &SimulationConfig) -> QuadBounds {
    QuadBounds::from_points(bodies.iter().map(|body| body.position))
        .unwrap_or_else(|| QuadBounds::new(Vec2::ZERO, config.canvas_size))
        .padded(config.bounds_pad)
}

/// Advances the layout by one step. Returns `false` without touching anything
/// once the simulation has settled or when there is nothing to move.
pub(in crate::app) fn tick(bodies: &mut [Body], links: &[Link], config: &mut SimulationConfig) -> bool {
    if bodies.is_empty() || config.is_settled() {
        return false;
    }

    let positions = bodies.iter().map(|body| body.position).collect::<Vec<_>>();
    let tree = QuadNode::build(&positions, simulation_bounds(bodies, config));

    let charge = config.charge * config.alpha;
    for (index, body) in bodies.iter_mut().enumerate() {
        accumulate_repulsion(
            &tree,
            index,
            positions[index],
            charge,
            config.theta,
            config.jitter,
            &mut body.velocity,
        );
    }

    apply_link_forces(
        bodies,
        links,
        config.link_distance,
        config.link_strength * config.alpha,
    );
    apply_centering(bodies, config.center, config.center_strength * config.alpha);

    for body in bodies.iter_mut() {
        body.velocity *= config.velocity_decay;
        body.position += body.velocity;
    }

    config.alpha *= 1.0 - config.alpha_decay.clamp(0.0, 1.0);
    true
}

pub(in crate::app) fn quadtree_cells(
    bodies: &[Body],
    config: &SimulationConfig,
    cells: &mut Vec<QuadtreeCell>,
) {
    cells.clear();
    if bodies.is_empty() {
        return;
    }

    let positions = bodies.iter().map(|body| body.position).collect::<Vec<_>>();
    let tree = QuadNode::build(&positions, simulation_bounds(bodies, config));
    collect_quadtree_cells(&tree, 0, cells);
}
