//! Per-request metrics

use aicif_common::metrics::RequestMetrics;
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

/// Record count and latency per route template
///
/// Labels use the matched route template (`/api/graph/path`), never the
/// raw URI.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let tracker = RequestMetrics::start(request.method().as_str(), &endpoint);
    let response = next.run(request).await;
    tracker.finish(response.status().as_u16());

    response
}
