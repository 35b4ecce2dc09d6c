use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

// -- 请求日志中间件：2xx 记为 info，4xx 记为 warn，其余记为 error
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_success() {
        tracing::info!(target: "request", %method, %path, status = status.as_u16(), elapsed_ms, "请求成功");
    } else if status.is_client_error() {
        tracing::warn!(target: "request", %method, %path, status = status.as_u16(), elapsed_ms, "客户端错误");
    } else {
        tracing::error!(target: "request", %method, %path, status = status.as_u16(), elapsed_ms, "服务器错误");
    }

    response
}
