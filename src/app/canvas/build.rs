use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use crate::graph::{EdgeRecord, GraphData, NodeRecord};

use super::super::physics::{Body, Link, SimulationConfig};
use super::GraphCanvas;

fn dedupe_nodes(nodes: Vec<NodeRecord>) -> (Vec<NodeRecord>, HashMap<String, usize>) {
    let mut kept = Vec::with_capacity(nodes.len());
    let mut index_by_id = HashMap::with_capacity(nodes.len());

    for node in nodes {
        match index_by_id.entry(node.id.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!(id = %node.id, "duplicate node id; keeping the first record");
            }
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(node);
            }
        }
    }

    (kept, index_by_id)
}

/// Edges whose endpoints both resolve become simulation links; the rest stay
/// in the edge list but take part in nothing.
fn resolve_links(edges: &[EdgeRecord], index_by_id: &HashMap<String, usize>) -> Vec<Link> {
    edges
        .iter()
        .enumerate()
        .filter_map(|(edge, record)| {
            let source = *index_by_id.get(&record.source)?;
            let target = *index_by_id.get(&record.target)?;
            Some(Link {
                edge,
                source,
                target,
            })
        })
        .collect()
}

/// A uniform point inside the ellipse spanning 60% of the canvas around the
/// simulation center.
fn seed_position(rng: &mut impl Rng, center: Vec2, canvas_size: Vec2) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let distance = rng.gen_range(0.0f32..1.0).sqrt();
    let semi_axes = canvas_size * 0.3;
    center + vec2(angle.cos() * semi_axes.x, angle.sin() * semi_axes.y) * distance
}

impl GraphCanvas {
    /// Replaces the working set. Nodes whose id was already on the canvas keep
    /// their position and velocity; new ids are seeded around the center. The
    /// view is reset and the layout re-energised.
    pub(in crate::app) fn set_data(&mut self, data: GraphData) {
        let GraphData { nodes, edges } = data;

        let mut previous = self
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .zip(self.bodies.iter().copied())
            .map(|(id, body)| (id.to_owned(), body))
            .collect::<HashMap<_, _>>();

        let (nodes, index_by_id) = dedupe_nodes(nodes);
        let links = resolve_links(&edges, &index_by_id);

        let simulation = SimulationConfig::for_canvas(self.simulation.canvas_size);
        let mut reused = 0usize;
        let bodies = nodes
            .iter()
            .map(|node| match previous.remove(&node.id) {
                Some(body)
                    if body.position.x.is_finite()
                        && body.position.y.is_finite()
                        && body.velocity.x.is_finite()
                        && body.velocity.y.is_finite() =>
                {
                    reused += 1;
                    body
                }
                _ => Body {
                    position: seed_position(
                        &mut self.rng,
                        simulation.center,
                        simulation.canvas_size,
                    ),
                    velocity: Vec2::ZERO,
                },
            })
            .collect::<Vec<_>>();

        tracing::info!(
            nodes = nodes.len(),
            edges = edges.len(),
            links = links.len(),
            reused,
            "graph data replaced"
        );

        self.nodes = nodes;
        self.edges = edges;
        self.index_by_id = index_by_id;
        self.bodies = bodies;
        self.links = links;
        self.simulation = simulation;
        self.hover = None;
        self.viewport.reset();
        self.render_loop.schedule();
    }

    /// Scatters every body afresh around the current simulation center.
    pub(super) fn reseed_bodies(&mut self) {
        let center = self.simulation.center;
        let canvas_size = self.simulation.canvas_size;
        for body in &mut self.bodies {
            *body = Body {
                position: seed_position(&mut self.rng, center, canvas_size),
                velocity: Vec2::ZERO,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::graph::NodeKind;

    #[test]
    fn duplicate_ids_keep_the_first_record() {
        let nodes = vec![
            NodeRecord::new("a", NodeKind::ZntI, "first"),
            NodeRecord::new("b", NodeKind::ZntI, ""),
            NodeRecord::new("a", NodeKind::ZntI, "second"),
        ];
        let (kept, index_by_id) = dedupe_nodes(nodes);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[index_by_id["a"]].label, "first");
    }

    #[test]
    fn dangling_edges_do_not_become_links() {
        let index_by_id = HashMap::from([("a".to_owned(), 0), ("b".to_owned(), 1)]);
        let edges = vec![
            EdgeRecord::new("a", "ghost", "x"),
            EdgeRecord::new("a", "b", "x"),
            EdgeRecord::new("ghost", "b", "x"),
        ];
        let links = resolve_links(&edges, &index_by_id);
        assert_eq!(
            links,
            vec![Link {
                edge: 1,
                source: 0,
                target: 1
            }]
        );
    }

    #[test]
    fn seeds_land_inside_the_ellipse() {
        let mut rng = StdRng::seed_from_u64(7);
        let center = vec2(400.0, 300.0);
        let size = vec2(800.0, 600.0);
        for _ in 0..500 {
            let offset = seed_position(&mut rng, center, size) - center;
            let normalized = (offset.x / 240.0).powi(2) + (offset.y / 180.0).powi(2);
            assert!(normalized <= 1.0 + 1e-4);
        }
    }
}
