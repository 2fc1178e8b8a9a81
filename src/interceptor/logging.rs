use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Middleware that logs request timing and status
///
/// Mount with `axum::middleware::from_fn(log_requests)`.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    tracing::debug!(%method, %uri, "--> request");

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(%method, %uri, status = status.as_u16(), elapsed_ms, "<-- response");
    } else {
        tracing::info!(%method, %uri, status = status.as_u16(), elapsed_ms, "<-- response");
    }
    response
}
