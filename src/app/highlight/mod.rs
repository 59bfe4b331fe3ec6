use crate::graph::NodeRecord;

use super::selection::Selection;

mod style;

pub(in crate::app) use self::style::{
    ACCENT, NodeShape, edge_appearance, kind_color, kind_shape, node_appearance,
};

/// Inputs that decide which nodes stand out. Changing any of them only
/// repaints; the layout is left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct HighlightRules {
    since: Option<i64>,
    search: String,
    dim_mode: bool,
}

impl HighlightRules {
    pub(in crate::app) fn set_since(&mut self, since: Option<i64>) {
        self.since = since;
    }

    /// Stores the term trimmed and lowercased; an all-whitespace term turns
    /// search highlighting off.
    pub(in crate::app) fn set_search(&mut self, term: &str) {
        self.search = term.trim().to_lowercase();
    }

    pub(in crate::app) fn dim_mode(&self) -> bool {
        self.dim_mode
    }

    pub(in crate::app) fn set_dim_mode(&mut self, dim_mode: bool) {
        self.dim_mode = dim_mode;
    }

    pub(in crate::app) fn is_recent(&self, node: &NodeRecord) -> bool {
        let Some(since) = self.since else {
            return false;
        };
        node.created.is_some_and(|created| created >= since)
            || node.updated.is_some_and(|updated| updated >= since)
    }

    pub(in crate::app) fn matches_search(&self, node: &NodeRecord) -> bool {
        if self.search.is_empty() {
            return false;
        }
        node.id.to_lowercase().contains(&self.search)
            || node.label.to_lowercase().contains(&self.search)
    }

    /// Any active emphasis pushes unhighlighted nodes further back.
    pub(in crate::app) fn focus_active(&self, selection: &Selection) -> bool {
        selection.is_active() || !self.search.is_empty() || self.since.is_some()
    }

    pub(in crate::app) fn classify(&self, node: &NodeRecord, selection: &Selection) -> HighlightTier {
        match selection {
            Selection::Node(id) if *id == node.id => return HighlightTier::SelectedNode,
            Selection::Edge(key) if key.touches(&node.id) => {
                return HighlightTier::SelectedEdgeEndpoint;
            }
            _ => {}
        }

        if self.matches_search(node) {
            HighlightTier::SearchMatch
        } else if self.is_recent(node) {
            HighlightTier::Recent
        } else {
            HighlightTier::Dim
        }
    }
}

/// Strict priority order: the first matching tier wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(in crate::app) enum HighlightTier {
    SelectedNode,
    SelectedEdgeEndpoint,
    SearchMatch,
    Recent,
    Dim,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct RingStyle {
    pub alpha: f32,
    /// Stroke width in device pixels, independent of zoom.
    pub width_px: f32,
    pub glow_px: f32,
    /// Distance from the node outline in world units.
    pub gap: f32,
}

impl HighlightTier {
    pub(in crate::app) fn is_highlighted(self) -> bool {
        self != Self::Dim
    }

    pub(in crate::app) fn opacity(self, focus_active: bool) -> f32 {
        match self {
            Self::SelectedNode => 1.0,
            Self::SelectedEdgeEndpoint => 0.88,
            Self::SearchMatch => 0.92,
            Self::Recent => 0.75,
            Self::Dim if focus_active => 0.06,
            Self::Dim => 0.16,
        }
    }

    pub(in crate::app) fn ring(self) -> Option<RingStyle> {
        let (alpha, width_px, glow_px) = match self {
            Self::SelectedNode => (0.95, 3.6, 22.0),
            Self::SelectedEdgeEndpoint => (0.82, 3.0, 18.0),
            Self::SearchMatch => (0.75, 2.4, 14.0),
            Self::Recent => (0.55, 2.4, 14.0),
            Self::Dim => return None,
        };
        let gap = if self == Self::SelectedNode { 2.2 } else { 1.2 };
        Some(RingStyle {
            alpha,
            width_px,
            glow_px,
            gap,
        })
    }
}
