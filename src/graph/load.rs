use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::GraphData;

pub fn load_graph_file(path: &Path) -> Result<GraphData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;

    let data = GraphData::from_json_str(&raw)
        .with_context(|| format!("failed to parse graph JSON in {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        nodes = data.nodes.len(),
        edges = data.edges.len(),
        "loaded graph"
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("graph-lens-{}-{name}", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_nodes_and_edges_from_disk() {
        let path = temp_file(
            "ok.json",
            r#"{"nodes": [{"id": "a", "kind": "znt-i"}, {"id": "b"}],
                "edges": [{"source": "a", "target": "b", "type": "uses"}]}"#,
        );

        let data = load_graph_file(&path).unwrap();
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.edges.len(), 1);
        fs::remove_file(path).ok();
    }

    #[test]
    fn reports_missing_files_and_bad_json() {
        let missing = std::env::temp_dir().join("graph-lens-definitely-missing.json");
        let error = load_graph_file(&missing).unwrap_err();
        assert!(error.to_string().contains("failed to read graph file"));

        let path = temp_file("bad.json", "{ not json");
        let error = load_graph_file(&path).unwrap_err();
        assert!(error.to_string().contains("failed to parse graph JSON"));
        fs::remove_file(path).ok();
    }
}
