//! AIC-IF API Gateway
//!
//! The single process hosting the citation components.
//! Handles:
//! - Request routing onto the registry, graph and interpreter
//! - Rate limiting
//! - Observability (logging, metrics, request ids)

mod handlers;
mod middleware;

#[cfg(test)]
mod tests;

use aicif_citation::{
    registry::ImpactScorer, seed, CitationRegistry, KnowledgeGraph, ModelInterpreter,
};
use aicif_common::{
    config::{AppConfig, ObservabilityConfig},
    metrics::{self as app_metrics, LATENCY_BUCKETS},
    CitationRecord, NewCitation,
};
use anyhow::Context;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tokio::{signal, sync::RwLock};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
///
/// Registry and graph each sit behind their own lock. Anything that writes
/// both takes the registry lock first.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<RwLock<CitationRegistry>>,
    pub graph: Arc<RwLock<KnowledgeGraph>>,
    pub interpreter: Arc<ModelInterpreter>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the components, preloading demo data when configured
    pub fn new(config: AppConfig) -> Self {
        let mut registry =
            CitationRegistry::with_scorer(ImpactScorer::new(config.registry.score.clone()));
        let mut graph = KnowledgeGraph::new();

        if config.demo.seed_sample_data {
            seed::seed_registry(&mut registry);
            seed::seed_graph(&mut graph);
        }
        app_metrics::record_graph_size(graph.node_count(), graph.edge_count());

        let interpreter = ModelInterpreter::with_sample_catalog(config.interpreter.seed);

        Self {
            config: Arc::new(config),
            registry: Arc::new(RwLock::new(registry)),
            graph: Arc::new(RwLock::new(graph)),
            interpreter: Arc::new(interpreter),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Append citations to the registry and mirror them into the graph
    ///
    /// Both locks are held for the whole batch so readers never observe a
    /// citation in one component but not the other.
    pub async fn log_citations(&self, citations: Vec<NewCitation>) -> Vec<CitationRecord> {
        let mut registry = self.registry.write().await;
        let mut graph = self.graph.write().await;

        let records: Vec<CitationRecord> = citations
            .into_iter()
            .map(|citation| {
                let record = citation.complete();
                registry.insert(record.clone());
                graph.add_citation(&record);
                app_metrics::record_citation(&record.ai_model, registry.len());
                record
            })
            .collect();

        app_metrics::record_graph_size(graph.node_count(), graph.edge_count());
        records
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config.observability);

    info!(
        service = %config.observability.service_name,
        "Starting AIC-IF API Gateway v{}",
        aicif_common::VERSION
    );

    let mut state = AppState::new(config.clone());

    if config.observability.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .set_buckets(LATENCY_BUCKETS)
            .context("invalid histogram buckets")?
            .install_recorder()
            .context("failed to install Prometheus recorder")?;
        app_metrics::register_metrics();
        state = state.with_metrics(handle);
    }

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut api_routes = Router::new()
        // Citation registry
        .route(
            "/citations",
            post(handlers::citations::log_citation).get(handlers::citations::list_citations),
        )
        .route("/citations/recent", get(handlers::citations::recent_citations))
        .route("/stats/top-cited", get(handlers::stats::top_cited))
        .route("/stats/summary", get(handlers::stats::summary))
        // Knowledge graph
        .route("/graph", get(handlers::graph::graph_data))
        .route("/graph/connections", get(handlers::graph::entity_connections))
        .route("/graph/path", get(handlers::graph::citation_path))
        // Model interpreter
        .route("/interpreter/datasets", get(handlers::contributions::list_datasets))
        .route("/interpreter/models", get(handlers::contributions::list_models))
        .route("/contributions/analyze", post(handlers::contributions::analyze))
        .route(
            "/contributions/visualization",
            get(handlers::contributions::visualization),
        )
        // Demo traffic
        .route("/demo/simulate-citations", post(handlers::demo::simulate_citations));

    if config.rate_limit.enabled {
        let limiter = middleware::rate_limit::create_rate_limiter(
            config.rate_limit.requests_per_second,
            config.rate_limit.burst,
        );
        api_routes = api_routes.layer(from_fn_with_state(
            limiter,
            middleware::rate_limit::rate_limit_middleware,
        ));
    }

    Router::new()
        // Health endpoints (never rate limited)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::health::metrics))
        .nest("/api", api_routes)
        .route_layer(from_fn(middleware::metrics::track_metrics))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
