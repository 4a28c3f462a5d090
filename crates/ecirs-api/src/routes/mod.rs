//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `{prefix}/auth` - 로그인, 등록, 현재 사용자
//! - `{prefix}/clients` - 고객 관리 및 잔액 조정
//! - `{prefix}/contracts` - 계약 관리
//! - `{prefix}/invoices` - 청구서 관리
//! - `{prefix}/receipts` - 영수증 관리
//!
//! `prefix`는 `server.api_prefix` 설정값이며 기본값은 `/api/v1`입니다.

pub mod auth;
pub mod clients;
pub mod contracts;
pub mod health;
pub mod invoices;
pub mod receipts;

pub use auth::{auth_router, LoginRequest, LoginResponse, RegisterRequest};
pub use clients::{
    clients_router, BalanceAdjustmentRequest, CreateClientRequest, UpdateClientRequest,
};
pub use contracts::{
    contracts_router, ContractListQuery, CreateContractRequest, UpdateContractRequest,
};
pub use health::{
    health_router, ComponentHealth, ComponentStatus, HealthResponse, LivenessResponse,
};
pub use invoices::{invoices_router, CreateInvoiceRequest, InvoiceListQuery, UpdateInvoiceRequest};
pub use receipts::{receipts_router, CreateReceiptRequest, ReceiptListQuery, UpdateReceiptRequest};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// `api_prefix`는 앞에 `/`가 있고 끝에 `/`가 없는 형태여야 합니다 (예: `/api/v1`).
pub fn create_api_router(api_prefix: &str) -> Router<Arc<AppState>> {
    let prefix = api_prefix.trim_end_matches('/');

    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API 엔드포인트
        .nest(&format!("{prefix}/auth"), auth_router())
        .nest(&format!("{prefix}/clients"), clients_router())
        .nest(&format!("{prefix}/contracts"), contracts_router())
        .nest(&format!("{prefix}/invoices"), invoices_router())
        .nest(&format!("{prefix}/receipts"), receipts_router())
}
