use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    ZntI,
    ZntIi,
    ZntIii,
    DataAttribute,
    RelationalCalc,
    LogicalDecision,
    #[default]
    Unknown,
}

impl NodeKind {
    pub const ALL: [Self; 7] = [
        Self::ZntI,
        Self::ZntIi,
        Self::ZntIii,
        Self::DataAttribute,
        Self::RelationalCalc,
        Self::LogicalDecision,
        Self::Unknown,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "znt-i" => Self::ZntI,
            "znt-ii" => Self::ZntIi,
            "znt-iii" => Self::ZntIii,
            "data_attribute" => Self::DataAttribute,
            "relational_calc" => Self::RelationalCalc,
            "logical_decision" => Self::LogicalDecision,
            _ => Self::Unknown,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::ZntI => "znt-i",
            Self::ZntIi => "znt-ii",
            Self::ZntIii => "znt-iii",
            Self::DataAttribute => "data_attribute",
            Self::RelationalCalc => "relational_calc",
            Self::LogicalDecision => "logical_decision",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ZntI => "class I agent",
            Self::ZntIi => "class II agent",
            Self::ZntIii => "class III agent",
            Self::DataAttribute => "attribute",
            Self::RelationalCalc => "relational calculation",
            Self::LogicalDecision => "logical decision",
            Self::Unknown => "unknown",
        }
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.as_deref().map(Self::from_tag).unwrap_or_default())
    }
}

/// Semantic node data. Simulation state lives in a separate arena keyed by
/// node index, so records stay immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, deserialize_with = "lenient_label")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created: Option<i64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl NodeRecord {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            created: None,
            updated: None,
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_label")]
    pub edge_type: String,
    #[serde(default, deserialize_with = "lenient_props")]
    pub props: BTreeMap<String, Value>,
}

#[cfg(test)]
impl EdgeRecord {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type: edge_type.into(),
            props: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub nodes: Vec<NodeRecord>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub edges: Vec<EdgeRecord>,
}

impl GraphData {
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        match T::deserialize(item) {
            Ok(record) => records.push(record),
            Err(error) => tracing::warn!(position, %error, "skipping malformed graph record"),
        }
    }
    Ok(records)
}

fn lenient_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v as i64)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| v as i64)
            })
        }
        _ => None,
    })
}

fn lenient_props<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_array_collections_decode_as_empty() {
        let data = GraphData::from_json_str(r#"{"nodes": {"a": 1}, "edges": "nope"}"#).unwrap();
        assert!(data.nodes.is_empty());
        assert!(data.edges.is_empty());

        let data = GraphData::from_json_str("{}").unwrap();
        assert_eq!(data, GraphData::default());
    }

    #[test]
    fn unknown_and_missing_kinds_fall_back() {
        let data = GraphData::from_json_str(
            r#"{"nodes": [
                {"id": "a", "kind": "relational_calc"},
                {"id": "b", "kind": "mystery"},
                {"id": "c", "kind": null},
                {"id": "d"}
            ]}"#,
        )
        .unwrap();

        let kinds = data.nodes.iter().map(|node| node.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                NodeKind::RelationalCalc,
                NodeKind::Unknown,
                NodeKind::Unknown,
                NodeKind::Unknown
            ]
        );
    }

    #[test]
    fn malformed_records_are_skipped() {
        let data = GraphData::from_json_str(
            r#"{"nodes": [{"id": "a"}, {"label": "no id"}, 7],
                "edges": [{"source": "a", "target": "b", "type": "rel"}, {"source": "a"}]}"#,
        )
        .unwrap();

        assert_eq!(data.nodes.len(), 1);
        assert_eq!(data.edges.len(), 1);
        assert_eq!(data.edges[0].edge_type, "rel");
    }

    #[test]
    fn timestamps_accept_numbers_and_numeric_strings() {
        let data = GraphData::from_json_str(
            r#"{"nodes": [
                {"id": "a", "created": 1700000000000, "updated": "1700000000500"},
                {"id": "b", "created": 12.9, "updated": "soon"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(data.nodes[0].created, Some(1_700_000_000_000));
        assert_eq!(data.nodes[0].updated, Some(1_700_000_000_500));
        assert_eq!(data.nodes[1].created, Some(12));
        assert_eq!(data.nodes[1].updated, None);
    }

    #[test]
    fn extra_node_fields_survive_for_details() {
        let data =
            GraphData::from_json_str(r#"{"nodes": [{"id": "a", "title": "Alpha", "score": 3}]}"#)
                .unwrap();

        let node = &data.nodes[0];
        assert_eq!(node.extra.get("title"), Some(&Value::from("Alpha")));
        let rendered = serde_json::to_value(node).unwrap();
        assert_eq!(rendered["kind"], Value::from("unknown"));
        assert_eq!(rendered["score"], Value::from(3));
    }
}
