//! 中间件模块

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 请求日志中间件
pub async fn request_logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed = ?elapsed,
            "Request completed with error status"
        );
    } else {
        tracing::info!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed = ?elapsed,
            "Request completed"
        );
    }

    response
}
