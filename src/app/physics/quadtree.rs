use eframe::egui::{Vec2, vec2};

const QUADTREE_MAX_DEPTH: usize = 24;
const QUADTREE_MIN_CELL_SIZE: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct QuadBounds {
    pub(in crate::app) min: Vec2,
    pub(in crate::app) max: Vec2,
}

impl QuadBounds {
    pub(in crate::app) fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounding box of every finite point, or `None` when there is none.
    pub(in crate::app) fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for point in points {
            if !point.x.is_finite() || !point.y.is_finite() {
                continue;
            }
            min = min.min(point);
            max = max.max(point);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        Some(Self { min, max })
    }

    pub(in crate::app) fn padded(self, pad: f32) -> Self {
        Self {
            min: self.min - vec2(pad, pad),
            max: self.max + vec2(pad, pad),
        }
    }

    pub(in crate::app) fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    pub(in crate::app) fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    fn midpoint(self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    fn quadrant_for(self, point: Vec2) -> usize {
        let mid = self.midpoint();
        usize::from(point.x >= mid.x) + 2 * usize::from(point.y >= mid.y)
    }

    fn child(self, quadrant: usize) -> Self {
        let mid = self.midpoint();
        match quadrant {
            0 => Self::new(self.min, mid),
            1 => Self::new(vec2(mid.x, self.min.y), vec2(self.max.x, mid.y)),
            2 => Self::new(vec2(self.min.x, mid.y), vec2(mid.x, self.max.y)),
            _ => Self::new(mid, self.max),
        }
    }
}

#[derive(Debug)]
pub(in crate::app) enum QuadCell {
    Empty,
    Leaf(usize),
    /// Points that could not be separated before the depth or size limit.
    Bucket(Vec<usize>),
    Internal(Box<[QuadNode; 4]>),
}

#[derive(Debug)]
pub(in crate::app) struct QuadNode {
    pub(in crate::app) bounds: QuadBounds,
    pub(in crate::app) mass: f32,
    pub(in crate::app) centroid: Vec2,
    pub(in crate::app) cell: QuadCell,
}

pub(in crate::app) struct QuadtreeCell {
    pub min: Vec2,
    pub max: Vec2,
    pub depth: usize,
    pub is_leaf: bool,
}

impl QuadNode {
    fn empty(bounds: QuadBounds) -> Self {
        Self {
            bounds,
            mass: 0.0,
            centroid: Vec2::ZERO,
            cell: QuadCell::Empty,
        }
    }

    /// Builds a fresh tree over `positions`; indices in the tree refer back
    /// into that slice. Non-finite positions are left out.
    pub(in crate::app) fn build(positions: &[Vec2], bounds: QuadBounds) -> Self {
        let mut root = Self::empty(bounds);
        for (index, position) in positions.iter().enumerate() {
            if position.x.is_finite() && position.y.is_finite() {
                root.insert(index, positions, 0);
            }
        }
        root.accumulate(positions);
        root
    }

    fn insert(&mut self, index: usize, positions: &[Vec2], depth: usize) {
        let cell = std::mem::replace(&mut self.cell, QuadCell::Empty);
        self.cell = match cell {
            QuadCell::Empty => QuadCell::Leaf(index),
            QuadCell::Bucket(mut indices) => {
                indices.push(index);
                QuadCell::Bucket(indices)
            }
            QuadCell::Leaf(existing) => {
                let bounds = self.bounds;
                if depth >= QUADTREE_MAX_DEPTH
                    || bounds.width() <= QUADTREE_MIN_CELL_SIZE
                    || bounds.height() <= QUADTREE_MIN_CELL_SIZE
                {
                    QuadCell::Bucket(vec![existing, index])
                } else {
                    let mut children =
                        Box::new(std::array::from_fn(|quadrant| Self::empty(bounds.child(quadrant))));
                    for point in [existing, index] {
                        let quadrant = bounds.quadrant_for(positions[point]);
                        children[quadrant].insert(point, positions, depth + 1);
                    }
                    QuadCell::Internal(children)
                }
            }
            QuadCell::Internal(mut children) => {
                let quadrant = self.bounds.quadrant_for(positions[index]);
                children[quadrant].insert(index, positions, depth + 1);
                QuadCell::Internal(children)
            }
        };
    }

    fn accumulate(&mut self, positions: &[Vec2]) {
        let (mass, weighted) = match &mut self.cell {
            QuadCell::Empty => (0.0, Vec2::ZERO),
            QuadCell::Leaf(index) => (1.0, positions[*index]),
            QuadCell::Bucket(indices) => {
                let sum = indices
                    .iter()
                    .fold(Vec2::ZERO, |sum, &index| sum + positions[index]);
                (indices.len() as f32, sum)
            }
            QuadCell::Internal(children) => {
                let mut mass = 0.0;
                let mut weighted = Vec2::ZERO;
                for child in children.iter_mut() {
                    child.accumulate(positions);
                    if child.mass > 0.0 {
                        mass += child.mass;
                        weighted += child.centroid * child.mass;
                    }
                }
                (mass, weighted)
            }
        };

        self.mass = mass;
        if mass > 0.0 {
            self.centroid = weighted / mass;
        }
    }

    pub(in crate::app) fn is_leaf(&self) -> bool {
        !matches!(self.cell, QuadCell::Internal(_))
    }
}

pub(in crate::app) fn collect_quadtree_cells(
    node: &QuadNode,
    depth: usize,
    cells: &mut Vec<QuadtreeCell>,
) {
    if node.mass <= 0.0 {
        return;
    }

    cells.push(QuadtreeCell {
        min: node.bounds.min,
        max: node.bounds.max,
        depth,
        is_leaf: node.is_leaf(),
    });

    if let QuadCell::Internal(children) = &node.cell {
        for child in children.iter() {
            collect_quadtree_cells(child, depth + 1, cells);
        }
    }
}
