use axum::Json;
use axum::Router;
use axum::extract::{Extension, Path};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use fleetcache::group::{GroupStats, LoaderFn, get_group, list_groups, new_group};
use fleetcache::peers::protocol::DEFAULT_BASE_PATH;
use fleetcache::peers::{self, HttpPool};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use sysinfo::System;

/// Name of the group every node of the fleet serves by default.
const DEFAULT_GROUP: &str = "main";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --bind <addr:port> --source <data.json> [--self-url <url>] [--peer <url> ...] [--cache-bytes <n>]",
            args[0]
        );
        eprintln!(
            "Example: {} --bind 127.0.0.1:8001 --source scores.json",
            args[0]
        );
        eprintln!(
            "Example: {} --bind 127.0.0.1:8002 --source scores.json --peer http://127.0.0.1:8001 --peer http://127.0.0.1:8002",
            args[0]
        );
        std::process::exit(1);
    }

    let mut bind_addr: Option<SocketAddr> = None;
    let mut self_url: Option<String> = None;
    let mut source_path: Option<String> = None;
    let mut peer_urls: Vec<String> = vec![];
    let mut cache_bytes: usize = 8 * 1024 * 1024;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--self-url" => {
                self_url = Some(args[i + 1].clone());
                i += 2;
            }
            "--source" => {
                source_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--peer" => {
                peer_urls.push(args[i + 1].clone());
                i += 2;
            }
            "--cache-bytes" => {
                cache_bytes = args[i + 1].parse()?;
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let bind_addr = bind_addr.expect("--bind is required");
    let source_path = source_path.expect("--source is required");
    let self_url = self_url.unwrap_or_else(|| format!("http://{}", bind_addr));

    tracing::info!("Starting cache node on {} as {}", bind_addr, self_url);

    // 1. Backing source: a JSON map acting as the authoritative store the
    //    loader answers misses from.
    let source: HashMap<String, String> =
        serde_json::from_str(&std::fs::read_to_string(&source_path)?)?;
    tracing::info!("Loaded {} entries from {}", source.len(), source_path);

    let source = Arc::new(source);
    let group = new_group(
        DEFAULT_GROUP,
        cache_bytes,
        Arc::new(LoaderFn::new(move |key: &str| {
            tracing::info!("Loading {} from the backing source", key);
            source
                .get(key)
                .map(|value| value.as_bytes().to_vec())
                .ok_or_else(|| anyhow::anyhow!("{} not present in the backing source", key))
        })),
    );

    // 2. Peer pool: the fleet is the full peer list, this node included. A
    //    node started without --peer runs solo and owns every key.
    if peer_urls.is_empty() {
        tracing::info!("No peers configured, running as a single-node fleet");
        peer_urls.push(self_url.clone());
    }
    let pool = Arc::new(HttpPool::new(&self_url));
    pool.set_peers(&peer_urls);
    group.register_peers(pool);

    // 3. HTTP router: the peer-facing cache surface plus the public API and
    //    health endpoints.
    let app = Router::new()
        .route("/health/routes", get(handle_routes))
        .route("/health/stats", get(handle_stats))
        .route("/api/:key", get(handle_api_get))
        .merge(peers::router(DEFAULT_BASE_PATH))
        .layer(Extension(NodeContext {
            self_url,
            peers: peer_urls,
        }));

    // 4. Start HTTP server:
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Node identity shared with the health handlers.
#[derive(Clone)]
struct NodeContext {
    self_url: String,
    peers: Vec<String>,
}

#[derive(Serialize)]
struct RoutesResponse {
    routes: Vec<&'static str>,
}

#[derive(Serialize)]
struct NodeStatsResponse {
    self_url: String,
    peers: Vec<String>,
    groups: Vec<GroupStats>,
    cpu_usage: f32,
    mem_used_mb: u64,
    mem_total_mb: u64,
}

async fn handle_routes() -> Json<RoutesResponse> {
    Json(RoutesResponse {
        routes: vec![
            "/health/routes",
            "/health/stats",
            "/api/:key",
            "/cache/:group/:key",
        ],
    })
}

async fn handle_stats(Extension(node): Extension<NodeContext>) -> Json<NodeStatsResponse> {
    let groups = list_groups().iter().map(|group| group.stats()).collect();

    let mut sys = System::new_all();
    sys.refresh_cpu();
    sys.refresh_memory();
    let cpu_usage = sys.global_cpu_info().cpu_usage();
    // sysinfo returns bytes for memory values.
    let mem_total_mb = sys.total_memory() / (1024 * 1024);
    let mem_used_mb = sys.used_memory() / (1024 * 1024);

    Json(NodeStatsResponse {
        self_url: node.self_url,
        peers: node.peers,
        groups,
        cpu_usage,
        mem_used_mb,
        mem_total_mb,
    })
}

/// Public read endpoint for the default group. Answers from the fleet-wide
/// cache space, loading through the backing source only when needed.
async fn handle_api_get(Path(key): Path<String>) -> Response {
    let Some(group) = get_group(DEFAULT_GROUP) else {
        return (StatusCode::NOT_FOUND, "default group is not configured").into_response();
    };

    match group.get(&key).await {
        Ok(view) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
