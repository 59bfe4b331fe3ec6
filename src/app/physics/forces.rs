use eframe::egui::Vec2;

use super::quadtree::{QuadCell, QuadNode};
use super::{Body, Link};

/// Barnes-Hut traversal for one body. Regions that look small enough from
/// `point` are treated as a single mass at their centroid.
pub(super) fn accumulate_repulsion(
    root: &QuadNode,
    index: usize,
    point: Vec2,
    strength: f32,
    theta: f32,
    jitter: f32,
    velocity: &mut Vec2,
) {
    let theta_sq = theta * theta;
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.mass <= 0.0 {
            continue;
        }
        if let QuadCell::Leaf(other) = node.cell
            && other == index
        {
            continue;
        }

        let delta = node.centroid - point;
        let distance_sq = delta.length_sq() + jitter;
        let width = node.bounds.width();

        match &node.cell {
            QuadCell::Internal(children) if (width * width) / distance_sq >= theta_sq => {
                stack.extend(children.iter());
            }
            _ => {
                *velocity -= delta * (strength * node.mass / distance_sq);
            }
        }
    }
}

/// Spring pull along every link, equal and opposite on both endpoints.
pub(super) fn apply_link_forces(
    bodies: &mut [Body],
    links: &[Link],
    link_distance: f32,
    strength: f32,
) {
    let count = bodies.len();
    for link in links {
        if link.source >= count || link.target >= count {
            continue;
        }

        let delta = bodies[link.target].position - bodies[link.source].position;
        let length = delta.length();
        let distance = if length > 0.0 { length } else { 1.0 };
        let force = (delta / distance) * ((distance - link_distance) * strength);

        bodies[link.source].velocity += force;
        bodies[link.target].velocity -= force;
    }
}

pub(super) fn apply_centering(bodies: &mut [Body], center: Vec2, strength: f32) {
    for body in bodies {
        body.velocity += (center - body.position) * strength;
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::super::quadtree::QuadBounds;
    use super::*;

    fn body(x: f32, y: f32) -> Body {
        Body {
            position: vec2(x, y),
            velocity: Vec2::ZERO,
        }
    }

    #[test]
    fn link_forces_are_equal_and_opposite() {
        let mut bodies = vec![body(0.0, 0.0), body(100.0, 30.0)];
        let links = [Link {
            edge: 0,
            source: 0,
            target: 1,
        }];

        apply_link_forces(&mut bodies, &links, 44.0, 0.06);

        let a = bodies[0].velocity;
        let b = bodies[1].velocity;
        assert!(a.length() > 0.0);
        assert!((a + b).length() < 1e-5);
        // Stretched springs pull the source toward the target.
        assert!(a.x > 0.0 && a.y > 0.0);
    }

    #[test]
    fn compressed_links_push_apart() {
        let mut bodies = vec![body(0.0, 0.0), body(10.0, 0.0)];
        let links = [Link {
            edge: 0,
            source: 0,
            target: 1,
        }];

        apply_link_forces(&mut bodies, &links, 44.0, 0.06);
        assert!(bodies[0].velocity.x < 0.0);
        assert!(bodies[1].velocity.x > 0.0);
    }

    #[test]
    fn coincident_link_endpoints_stay_finite() {
        let mut bodies = vec![body(5.0, 5.0), body(5.0, 5.0)];
        let links = [Link {
            edge: 0,
            source: 0,
            target: 1,
        }];

        apply_link_forces(&mut bodies, &links, 44.0, 0.06);
        assert!(bodies.iter().all(|b| b.velocity.x.is_finite() && b.velocity.y.is_finite()));
    }

    #[test]
    fn out_of_range_links_are_ignored() {
        let mut bodies = vec![body(0.0, 0.0)];
        let links = [Link {
            edge: 0,
            source: 0,
            target: 4,
        }];

        apply_link_forces(&mut bodies, &links, 44.0, 0.06);
        assert_eq!(bodies[0].velocity, Vec2::ZERO);
    }

    #[test]
    fn repulsion_pushes_bodies_apart_and_skips_self() {
        let positions = [vec2(0.0, 0.0), vec2(20.0, 0.0)];
        let bounds = QuadBounds::from_points(positions).unwrap().padded(50.0);
        let tree = QuadNode::build(&positions, bounds);

        let mut left = Vec2::ZERO;
        let mut right = Vec2::ZERO;
        accumulate_repulsion(&tree, 0, positions[0], 26.0, 0.9, 0.01, &mut left);
        accumulate_repulsion(&tree, 1, positions[1], 26.0, 0.9, 0.01, &mut right);

        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!((left + right).length() < 1e-4);
    }

    #[test]
    fn lone_body_feels_no_repulsion() {
        let positions = [vec2(3.0, 3.0)];
        let bounds = QuadBounds::from_points(positions).unwrap().padded(50.0);
        let tree = QuadNode::build(&positions, bounds);

        let mut velocity = Vec2::ZERO;
        accumulate_repulsion(&tree, 0, positions[0], 26.0, 0.9, 0.01, &mut velocity);
        assert_eq!(velocity, Vec2::ZERO);
    }

    #[test]
    fn distant_clusters_are_approximated_by_their_centroid() {
        let mut positions = vec![vec2(-500.0, -500.0)];
        positions.extend((0..8).map(|i| vec2(1000.0 + i as f32, 1000.0 + (i % 3) as f32)));
        let bounds = QuadBounds::new(vec2(-2000.0, -2000.0), vec2(2000.0, 2000.0));
        let tree = QuadNode::build(&positions, bounds);

        let mut approximate = Vec2::ZERO;
        accumulate_repulsion(&tree, 0, positions[0], 26.0, 0.9, 0.01, &mut approximate);

        let mut exact = Vec2::ZERO;
        for other in &positions[1..] {
            let delta = *other - positions[0];
            exact -= delta * (26.0 / (delta.length_sq() + 0.01));
        }

        assert!((approximate - exact).length() / exact.length() < 0.01);
    }

    #[test]
    fn centering_pulls_toward_center() {
        let mut bodies = vec![body(0.0, 0.0)];
        apply_centering(&mut bodies, vec2(100.0, 50.0), 0.01);
        assert!((bodies[0].velocity - vec2(1.0, 0.5)).length() < 1e-6);
    }
}
