use std::collections::{HashMap, HashSet};

use super::model::{EdgeRecord, GraphData, NodeKind, NodeRecord};

pub const MAX_NODE_PRESETS: [usize; 5] = [0, 300, 600, 900, 1200];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphFilter {
    pub enabled_kinds: HashSet<NodeKind>,
    pub hide_isolated: bool,
    /// Zero keeps every node.
    pub max_nodes: usize,
}

impl Default for GraphFilter {
    fn default() -> Self {
        Self {
            enabled_kinds: NodeKind::ALL.into_iter().collect(),
            hide_isolated: false,
            max_nodes: 0,
        }
    }
}

impl GraphFilter {
    pub fn apply(&self, data: &GraphData) -> GraphData {
        let mut nodes = data
            .nodes
            .iter()
            .filter(|node| self.enabled_kinds.contains(&node.kind))
            .cloned()
            .collect::<Vec<_>>();
        let mut edges = edges_within(&nodes, data.edges.iter());

        if self.hide_isolated {
            let degree = degree_by_id(&edges);
            nodes.retain(|node| degree.get(node.id.as_str()).copied().unwrap_or(0) > 0);
            edges = edges_within(&nodes, edges.iter());
        }

        if self.max_nodes > 0 && nodes.len() > self.max_nodes {
            let degree = degree_by_id(&edges);
            nodes.sort_by(|a, b| {
                let a_degree = degree.get(a.id.as_str()).copied().unwrap_or(0);
                let b_degree = degree.get(b.id.as_str()).copied().unwrap_or(0);
                b_degree.cmp(&a_degree)
            });
            nodes.truncate(self.max_nodes);
            edges = edges_within(&nodes, edges.iter());
        }

        GraphData { nodes, edges }
    }
}

fn edges_within<'a>(
    nodes: &[NodeRecord],
    edges: impl Iterator<Item = &'a EdgeRecord>,
) -> Vec<EdgeRecord> {
    let ids = nodes.iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();
    edges
        .filter(|edge| ids.contains(edge.source.as_str()) && ids.contains(edge.target.as_str()))
        .cloned()
        .collect()
}

fn degree_by_id(edges: &[EdgeRecord]) -> HashMap<&str, usize> {
    let mut degree = HashMap::new();
    for edge in edges {
        *degree.entry(edge.source.as_str()).or_insert(0) += 1;
        *degree.entry(edge.target.as_str()).or_insert(0) += 1;
    }
    degree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GraphData {
        GraphData {
            nodes: vec![
                NodeRecord::new("hub", NodeKind::ZntI, "hub"),
                NodeRecord::new("a", NodeKind::DataAttribute, "a"),
                NodeRecord::new("b", NodeKind::DataAttribute, "b"),
                NodeRecord::new("c", NodeKind::LogicalDecision, "c"),
                NodeRecord::new("lonely", NodeKind::Unknown, "lonely"),
            ],
            edges: vec![
                EdgeRecord::new("hub", "a", "has"),
                EdgeRecord::new("hub", "b", "has"),
                EdgeRecord::new("hub", "c", "decides"),
                EdgeRecord::new("a", "ghost", "dangling"),
            ],
        }
    }

    fn ids(data: &GraphData) -> Vec<&str> {
        data.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    #[test]
    fn default_filter_only_drops_dangling_edges() {
        let filtered = GraphFilter::default().apply(&sample());
        assert_eq!(filtered.nodes.len(), 5);
        assert_eq!(filtered.edges.len(), 3);
    }

    #[test]
    fn disabled_kinds_take_their_edges_with_them() {
        let mut filter = GraphFilter::default();
        filter.enabled_kinds.remove(&NodeKind::DataAttribute);

        let filtered = filter.apply(&sample());
        assert_eq!(ids(&filtered), vec!["hub", "c", "lonely"]);
        assert_eq!(filtered.edges.len(), 1);
        assert_eq!(filtered.edges[0].target, "c");
    }

    #[test]
    fn hide_isolated_removes_degree_zero_nodes() {
        let filter = GraphFilter {
            hide_isolated: true,
            ..GraphFilter::default()
        };

        let filtered = filter.apply(&sample());
        assert!(!ids(&filtered).contains(&"lonely"));
        assert_eq!(filtered.nodes.len(), 4);
    }

    #[test]
    fn max_nodes_keeps_highest_degree_first() {
        let filter = GraphFilter {
            max_nodes: 2,
            ..GraphFilter::default()
        };

        let filtered = filter.apply(&sample());
        assert_eq!(ids(&filtered), vec!["hub", "a"]);
        assert_eq!(filtered.edges, vec![EdgeRecord::new("hub", "a", "has")]);
    }
}
