use eframe::egui::Color32;

use crate::graph::{EdgeRecord, NodeKind, NodeRecord};

use super::super::render_utils::with_alpha;
use super::super::selection::Selection;
use super::{HighlightRules, HighlightTier, RingStyle};

pub(in crate::app) const BASE_NODE_RADIUS: f32 = 6.0;
pub(in crate::app) const ACCENT: Color32 = Color32::from_rgb(0, 255, 214);
const DIM_FILL: Color32 = Color32::from_rgb(0x8a, 0xa0, 0xb6);
const EDGE_BASE: Color32 = Color32::from_rgb(80, 210, 255);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum NodeShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Hexagon,
    Pentagon,
}

pub(in crate::app) fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::ZntI => Color32::from_rgb(0x00, 0xff, 0xd6),
        NodeKind::ZntIi => Color32::from_rgb(0x2e, 0xa7, 0xff),
        NodeKind::ZntIii => Color32::from_rgb(0x30, 0xff, 0xb1),
        NodeKind::DataAttribute => Color32::from_rgb(0xff, 0xb0, 0x00),
        NodeKind::RelationalCalc => Color32::from_rgb(0xa9, 0x79, 0xff),
        NodeKind::LogicalDecision => Color32::from_rgb(0xff, 0x4d, 0x6d),
        NodeKind::Unknown => Color32::from_rgb(0x8b, 0xb3, 0xd9),
    }
}

pub(in crate::app) fn kind_shape(kind: NodeKind) -> NodeShape {
    match kind {
        NodeKind::ZntI | NodeKind::Unknown => NodeShape::Circle,
        NodeKind::ZntIi => NodeShape::Square,
        NodeKind::ZntIii => NodeShape::Triangle,
        NodeKind::DataAttribute => NodeShape::Diamond,
        NodeKind::RelationalCalc => NodeShape::Hexagon,
        NodeKind::LogicalDecision => NodeShape::Pentagon,
    }
}

/// Recent nodes breathe with a period of 2π·220 ms (about 1.4 s).
fn pulse_radius(time_ms: f64) -> f32 {
    let phase = (time_ms / 220.0) % std::f64::consts::TAU;
    BASE_NODE_RADIUS + 2.2 + 1.2 * phase.sin() as f32
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct NodeAppearance {
    pub tier: HighlightTier,
    pub shape: NodeShape,
    /// Fill with the tier opacity already applied.
    pub fill: Color32,
    /// World units.
    pub radius: f32,
    pub ring: Option<RingStyle>,
    pub pulsing: bool,
}

pub(in crate::app) fn node_appearance(
    node: &NodeRecord,
    rules: &HighlightRules,
    selection: &Selection,
    time_ms: f64,
) -> NodeAppearance {
    let tier = rules.classify(node, selection);
    let pulsing = rules.is_recent(node);
    let opacity = tier.opacity(rules.focus_active(selection));

    let base = if rules.dim_mode() && !tier.is_highlighted() {
        DIM_FILL
    } else {
        kind_color(node.kind)
    };

    NodeAppearance {
        tier,
        shape: kind_shape(node.kind),
        fill: with_alpha(base, opacity),
        radius: if pulsing {
            pulse_radius(time_ms)
        } else {
            BASE_NODE_RADIUS
        },
        ring: tier.ring(),
        pulsing,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct EdgeAppearance {
    pub color: Color32,
    /// Device pixels, independent of zoom.
    pub width_px: f32,
    pub glow_px: Option<f32>,
}

pub(in crate::app) fn edge_appearance(edge: &EdgeRecord, selection: &Selection) -> EdgeAppearance {
    match selection {
        Selection::Edge(key) if key.matches(edge) => EdgeAppearance {
            color: with_alpha(ACCENT, 0.95),
            width_px: 3.2,
            glow_px: Some(16.0),
        },
        Selection::Node(id) if *id == edge.source || *id == edge.target => EdgeAppearance {
            color: with_alpha(ACCENT, 0.55),
            width_px: 2.0,
            glow_px: None,
        },
        _ => EdgeAppearance {
            color: with_alpha(EDGE_BASE, if selection.is_active() { 0.10 } else { 0.22 }),
            width_px: 1.0,
            glow_px: None,
        },
    }
}
