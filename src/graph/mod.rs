mod filter;
mod load;
mod model;

pub use filter::{GraphFilter, MAX_NODE_PRESETS};
pub use load::load_graph_file;
pub use model::{EdgeRecord, GraphData, NodeKind, NodeRecord};
