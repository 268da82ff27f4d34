use std::net::SocketAddr;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use transit_server::graph::TransitGraph;
use transit_server::planner::SearchConfig;
use transit_server::web::{AppState, create_router};

const DEFAULT_GRAPH: &str = "data/graph.json";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let graph_path = std::env::var("TRANSIT_GRAPH").unwrap_or_else(|_| DEFAULT_GRAPH.to_string());
    let graph = match TransitGraph::from_file(&graph_path) {
        Ok(graph) => graph,
        Err(e) => {
            error!(path = %graph_path, error = %e, "Failed to load transit graph");
            std::process::exit(1);
        }
    };
    info!(
        path = %graph_path,
        stops = graph.stop_count(),
        routes = graph.route_count(),
        walks = graph.walk_count(),
        "Loaded transit graph"
    );

    // Bad timetables only fail the searches that reach them
    for problem in graph.check_timetables() {
        warn!(%problem, "Timetable will be rejected at query time");
    }

    let addr: SocketAddr = std::env::var("TRANSIT_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .expect("TRANSIT_ADDR must be a socket address");

    let state = AppState::new(graph, SearchConfig::default());
    let app = create_router(state);

    info!("Transit planner listening on http://{addr}");
    info!("  GET  /health  - Health check");
    info!("  POST /paths   - Plan paths between two points");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
