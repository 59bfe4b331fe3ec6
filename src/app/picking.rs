use eframe::egui::Vec2;

use super::physics::{Body, Link};

pub(in crate::app) const NODE_HIT_RADIUS_PX: f32 = 9.0;
pub(in crate::app) const EDGE_HIT_TOLERANCE_PX: f32 = 7.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Pick {
    /// Index into the canvas node list.
    Node(usize),
    /// Index into the canvas edge list.
    Edge(usize),
    Nothing,
}

/// Nodes win over edges: edges are only tested when no node is in reach.
pub(in crate::app) fn pick(bodies: &[Body], links: &[Link], world: Vec2, scale: f32) -> Pick {
    if let Some(index) = pick_node(bodies, world, scale) {
        return Pick::Node(index);
    }
    pick_edge(bodies, links, world, scale).map_or(Pick::Nothing, Pick::Edge)
}

pub(in crate::app) fn pick_node(bodies: &[Body], world: Vec2, scale: f32) -> Option<usize> {
    let (index, distance_sq) = bodies
        .iter()
        .enumerate()
        .map(|(index, body)| (index, (world - body.position).length_sq()))
        .filter(|(_, distance_sq)| distance_sq.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let hit_radius = NODE_HIT_RADIUS_PX / scale;
    (distance_sq <= hit_radius * hit_radius).then_some(index)
}

pub(in crate::app) fn pick_edge(
    bodies: &[Body],
    links: &[Link],
    world: Vec2,
    scale: f32,
) -> Option<usize> {
    let tolerance = EDGE_HIT_TOLERANCE_PX / scale;
    links
        .iter()
        .filter_map(|link| {
            let source = bodies.get(link.source)?;
            let target = bodies.get(link.target)?;
            let distance = distance_to_segment(world, source.position, target.position);
            (distance < tolerance).then_some((link.edge, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(edge, _)| edge)
}

pub(in crate::app) fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq == 0.0 {
        return (point - start).length();
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    (point - (start + segment * t)).length()
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn body(x: f32, y: f32) -> Body {
        Body {
            position: vec2(x, y),
            velocity: Vec2::ZERO,
        }
    }

    fn link(edge: usize, source: usize, target: usize) -> Link {
        Link {
            edge,
            source,
            target,
        }
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = vec2(0.0, 0.0);
        let b = vec2(10.0, 0.0);
        assert_eq!(distance_to_segment(vec2(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(vec2(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(vec2(13.0, 4.0), a, b), 5.0);
        assert_eq!(distance_to_segment(vec2(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn nearest_node_within_radius_is_picked() {
        let bodies = [body(0.0, 0.0), body(12.0, 0.0)];
        assert_eq!(pick_node(&bodies, vec2(7.0, 0.0), 1.0), Some(1));
        assert_eq!(pick_node(&bodies, vec2(0.0, 9.0), 1.0), Some(0));
        assert_eq!(pick_node(&bodies, vec2(0.0, 9.5), 1.0), None);
    }

    #[test]
    fn hit_radius_shrinks_in_world_units_when_zoomed_in() {
        let bodies = [body(0.0, 0.0)];
        assert_eq!(pick_node(&bodies, vec2(6.0, 0.0), 1.0), Some(0));
        assert_eq!(pick_node(&bodies, vec2(6.0, 0.0), 2.0), None);
        assert_eq!(pick_node(&bodies, vec2(20.0, 0.0), 0.4), Some(0));
    }

    #[test]
    fn closest_edge_within_tolerance_wins() {
        let bodies = [body(0.0, 0.0), body(100.0, 0.0), body(0.0, 10.0), body(100.0, 10.0)];
        let links = [link(4, 0, 1), link(9, 2, 3)];
        assert_eq!(pick_edge(&bodies, &links, vec2(50.0, 3.0), 1.0), Some(4));
        assert_eq!(pick_edge(&bodies, &links, vec2(50.0, 6.0), 1.0), Some(9));
        assert_eq!(pick_edge(&bodies, &links, vec2(50.0, 30.0), 1.0), None);
    }

    #[test]
    fn links_to_missing_bodies_are_ignored() {
        let bodies = [body(0.0, 0.0)];
        let links = [link(0, 0, 3)];
        assert_eq!(pick_edge(&bodies, &links, vec2(0.0, 0.0), 1.0), None);
    }

    #[test]
    fn nodes_take_priority_over_edges() {
        let bodies = [body(0.0, 0.0), body(100.0, 0.0)];
        let links = [link(0, 0, 1)];

        assert_eq!(pick(&bodies, &links, vec2(4.0, 4.0), 1.0), Pick::Node(0));
        assert_eq!(pick(&bodies, &links, vec2(50.0, 4.0), 1.0), Pick::Edge(0));
        assert_eq!(pick(&bodies, &links, vec2(50.0, 40.0), 1.0), Pick::Nothing);
    }
}
