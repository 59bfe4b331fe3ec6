mod app;
mod graph;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file holding `{ "nodes": [...], "edges": [...] }`.
    #[arg(long)]
    graph: PathBuf,

    /// Seed for initial node placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Log directives used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_filter: String,

    /// Start with non-highlighted nodes painted gray.
    #[arg(long)]
    dim_mode: bool,

    /// Start highlighting nodes changed within this many minutes.
    #[arg(long)]
    highlight_minutes: Option<u32>,
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_filter);

    let launch = app::LaunchOptions {
        graph_path: args.graph,
        seed: args.seed,
        dim_mode: args.dim_mode,
        highlight_minutes: args.highlight_minutes,
    };
    tracing::info!(path = %launch.graph_path.display(), "starting graph-lens");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "graph-lens",
        options,
        Box::new(move |cc| Ok(Box::new(app::GraphLensApp::new(cc, launch)))),
    )
}
