use crate::graph::{EdgeRecord, NodeRecord};

use super::picking::Pick;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(in crate::app) struct EdgeKey {
    pub source: String,
    pub target: String,
    pub edge_type: String,
}

impl EdgeKey {
    pub(in crate::app) fn of(edge: &EdgeRecord) -> Self {
        Self {
            source: edge.source.clone(),
            target: edge.target.clone(),
            edge_type: edge.edge_type.clone(),
        }
    }

    pub(in crate::app) fn matches(&self, edge: &EdgeRecord) -> bool {
        self.source == edge.source && self.target == edge.target && self.edge_type == edge.edge_type
    }

    pub(in crate::app) fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum Selection {
    #[default]
    None,
    Node(String),
    Edge(EdgeKey),
}

impl Selection {
    pub(in crate::app) fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    #[cfg(test)]
    pub(in crate::app) fn edge(&self) -> Option<&EdgeKey> {
        match self {
            Self::Edge(key) => Some(key),
            _ => None,
        }
    }

    pub(in crate::app) fn from_pick(pick: Pick, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Self {
        match pick {
            Pick::Node(index) => nodes
                .get(index)
                .map_or(Self::None, |node| Self::Node(node.id.clone())),
            Pick::Edge(index) => edges
                .get(index)
                .map_or(Self::None, |edge| Self::Edge(EdgeKey::of(edge))),
            Pick::Nothing => Self::None,
        }
    }
}

pub(in crate::app) type SelectionHandler = Box<dyn FnMut(&Selection)>;

/// Holds the current selection and the single observer told about every
/// transition, including repeated clears.
#[derive(Default)]
pub(in crate::app) struct SelectionController {
    state: Selection,
    handler: Option<SelectionHandler>,
}

impl SelectionController {
    pub(in crate::app) fn state(&self) -> &Selection {
        &self.state
    }

    pub(in crate::app) fn set_handler(&mut self, handler: Option<SelectionHandler>) {
        self.handler = handler;
    }

    pub(in crate::app) fn select(&mut self, next: Selection) {
        tracing::debug!(selection = ?next, "selection changed");
        self.state = next;
        if let Some(handler) = self.handler.as_mut() {
            handler(&self.state);
        }
    }

    pub(in crate::app) fn clear(&mut self) {
        self.select(Selection::None);
    }
}
