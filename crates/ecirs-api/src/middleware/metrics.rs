//! HTTP 요청 metrics middleware.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::metrics::{record_http_duration, record_http_request, record_http_response};

/// 라우트에 매칭되지 않은 요청의 `path` 라벨.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// 메트릭 `path` 라벨.
///
/// 라우터에 등록된 경로 템플릿(`/api/v1/invoices/{id}`)을 사용하므로
/// 문서 ID가 라벨 카디널리티를 늘리지 않습니다.
pub fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// - `http_requests_total`: 요청 수 (method, path)
/// - `http_responses_total`: 응답 수 (method, path, status)
/// - `http_request_duration_seconds`: 처리 시간 히스토그램
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().as_str().to_owned();
    let route = route_label(&request);

    record_http_request(&method, &route);
    let response = next.run(request).await;

    record_http_response(&method, &route, response.status().as_u16());
    record_http_duration(&method, &route, started.elapsed().as_secs_f64());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{HeaderValue, Method, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    /// 계산된 라벨을 응답 헤더로 돌려주는 테스트용 레이어.
    async fn echo_route(request: Request, next: Next) -> Response {
        let route = route_label(&request);
        let mut response = next.run(request).await;
        if let Ok(value) = HeaderValue::from_str(&route) {
            response.headers_mut().insert("x-route", value);
        }
        response
    }

    fn app() -> Router {
        let invoices = Router::new()
            .route("/", get(ok_handler))
            .route("/{id}", get(ok_handler));
        Router::new()
            .nest("/api/v1/invoices", invoices)
            .fallback(|| async { StatusCode::NOT_FOUND })
            .layer(middleware::from_fn(echo_route))
            .layer(middleware::from_fn(metrics_layer))
    }

    async fn call(uri: &str) -> (StatusCode, Option<String>) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let route = response
            .headers()
            .get("x-route")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        (response.status(), route)
    }

    #[tokio::test]
    async fn test_document_id_collapses_to_route_template() {
        let (status, route) = call("/api/v1/invoices/123e4567-e89b-12d3-a456-426614174000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(route.as_deref(), Some("/api/v1/invoices/{id}"));
    }

    #[tokio::test]
    async fn test_unknown_path_keeps_status_and_fixed_label() {
        let (status, route) = call("/api/v1/nothing-here/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(route.as_deref(), Some(UNMATCHED_ROUTE));
    }
}
