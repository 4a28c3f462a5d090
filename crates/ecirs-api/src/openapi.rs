//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/docs` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use ecirs_core::{
    Client, ClientType, Contract, ContractStatus, Invoice, InvoiceStatus, PaymentMethod, Receipt,
    Role, StationCode, UserProfile, UserStatus,
};

use crate::error::ApiErrorResponse;
use crate::routes::{
    BalanceAdjustmentRequest, ComponentHealth, ComponentStatus, CreateClientRequest,
    CreateContractRequest, CreateInvoiceRequest, CreateReceiptRequest, HealthResponse,
    LivenessResponse, LoginRequest, LoginResponse, RegisterRequest, UpdateClientRequest,
    UpdateContractRequest, UpdateInvoiceRequest, UpdateReceiptRequest,
};

// ==================== OpenAPI 문서 정의 ====================

/// ECIRS API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ECIRS API",
        version = "0.1.0",
        description = r#"
# ECIRS REST API

방송국 광고 계약, 청구서, 영수증을 관리하는 REST API입니다.

## 인증

`/health`, `/auth/login`, `/auth/register`를 제외한 모든 엔드포인트는
`Authorization: Bearer <token>` 헤더가 필요합니다.

## 스테이션 범위

계약/청구서/영수증은 사용자에게 할당된 스테이션 범위 안에서만 조회/변경할 수 있습니다.
`super_admin`은 모든 스테이션에 접근할 수 있습니다.

## 잔액

청구서 생성은 고객 잔액을 총액만큼 늘리고, 영수증 생성은 금액만큼 줄입니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3100", description = "로컬 개발 서버"),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 로그인, 등록, 현재 사용자"),
        (name = "clients", description = "고객 - 고객 CRUD 및 잔액 조정"),
        (name = "contracts", description = "계약 - 스테이션 범위 계약 관리"),
        (name = "invoices", description = "청구서 - VAT 계산 및 잔액 반영"),
        (name = "receipts", description = "영수증 - 입금 기록 및 잔액 차감"),
    ),
    components(
        schemas(
            // 공통
            ApiErrorResponse,
            StationCode,
            Role,
            UserStatus,
            // Health
            LivenessResponse,
            HealthResponse,
            ComponentHealth,
            ComponentStatus,
            // Auth
            LoginRequest,
            LoginResponse,
            RegisterRequest,
            UserProfile,
            // Clients
            Client,
            ClientType,
            CreateClientRequest,
            UpdateClientRequest,
            BalanceAdjustmentRequest,
            // Contracts
            Contract,
            ContractStatus,
            CreateContractRequest,
            UpdateContractRequest,
            // Invoices
            Invoice,
            InvoiceStatus,
            CreateInvoiceRequest,
            UpdateInvoiceRequest,
            // Receipts
            Receipt,
            PaymentMethod,
            CreateReceiptRequest,
            UpdateReceiptRequest,
        )
    ),
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::auth::me,

        // ===== Clients =====
        crate::routes::clients::list_clients,
        crate::routes::clients::get_client,
        crate::routes::clients::create_client,
        crate::routes::clients::update_client,
        crate::routes::clients::delete_client,
        crate::routes::clients::adjust_balance,

        // ===== Contracts =====
        crate::routes::contracts::list_contracts,
        crate::routes::contracts::get_contract,
        crate::routes::contracts::create_contract,
        crate::routes::contracts::update_contract,
        crate::routes::contracts::delete_contract,

        // ===== Invoices =====
        crate::routes::invoices::list_invoices,
        crate::routes::invoices::get_invoice,
        crate::routes::invoices::create_invoice,
        crate::routes::invoices::update_invoice,
        crate::routes::invoices::delete_invoice,

        // ===== Receipts =====
        crate::routes::receipts::list_receipts,
        crate::routes::receipts::get_receipt,
        crate::routes::receipts::create_receipt,
        crate::routes::receipts::update_receipt,
        crate::routes::receipts::delete_receipt,
    )
)]
pub struct ApiDoc;

/// `bearer_auth` 보안 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// - `/docs` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("ECIRS API"));

        for tag in ["health", "auth", "clients", "contracts", "invoices", "receipts"] {
            assert!(json.contains(tag), "missing tag {tag}");
        }

        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/v1/auth/login"));
        assert!(json.contains("/api/v1/clients/{id}/balance"));
        assert!(json.contains("/api/v1/contracts/{id}"));
        assert!(json.contains("/api/v1/invoices"));
        assert!(json.contains("/api/v1/receipts/{id}"));
    }

    #[test]
    fn test_openapi_has_bearer_scheme() {
        let spec = ApiDoc::openapi();
        let schemes = spec
            .components
            .as_ref()
            .map(|c| c.security_schemes.contains_key("bearer_auth"))
            .unwrap_or(false);
        assert!(schemes);
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("CreateInvoiceRequest"));
        assert!(json.contains("BalanceAdjustmentRequest"));
        assert!(json.contains("StationCode"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
