use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use fleet_telemetry::{RequestIds, new_request_ids};
use std::time::Instant;
use tracing::{Instrument, debug, info_span};

/// 请求上下文中间件：注入 request_id/trace_id
///
/// 生成的 ID 记录在请求 span 上，并通过 `x-request-id`/`x-trace-id` 响应头返回；
/// 请求结束时在同一 span 内记录状态码与耗时。
pub async fn request_context(req: Request, next: Next) -> Response {
    let ids = new_request_ids();
    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %req.method(),
        path = %req.uri().path()
    );

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;
    span.in_scope(|| {
        debug!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request_completed"
        );
    });
    echo_ids(&mut response, &ids);
    response
}

fn echo_ids(response: &mut Response, ids: &RequestIds) {
    for (name, value) in [("x-request-id", &ids.request_id), ("x-trace-id", &ids.trace_id)] {
        if let Ok(value) = HeaderValue::from_str(value) {
            response.headers_mut().insert(name, value);
        }
    }
}
