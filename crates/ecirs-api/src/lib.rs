//! ECIRS REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (고객, 계약, 청구서, 영수증)
//! - JWT 인증과 역할/스테이션 기반 권한 검사
//! - PostgreSQL 및 인메모리 저장소
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 인증 및 권한 게이트
//! - [`services`]: 리소스별 업무 규칙
//! - [`repository`]: 저장소 트레이트와 구현
//! - [`validation`]: 검증 추출기
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

pub use auth::{hash_password, verify_password, Claims, JwtAuth, JwtAuthError, JwtConfig};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use repository::{InMemoryStore, StoreError};
pub use routes::create_api_router;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, create_test_state_with_store, TEST_JWT_SECRET};
