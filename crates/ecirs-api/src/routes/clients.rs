//! 고객 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/clients` - 고객 목록 (최신순)
//! - `GET /api/v1/clients/{id}` - 고객 조회
//! - `POST /api/v1/clients` - 고객 생성
//! - `PUT /api/v1/clients/{id}` - 고객 프로필 수정
//! - `DELETE /api/v1/clients/{id}` - 고객 삭제
//! - `POST /api/v1/clients/{id}/balance` - 잔액 조정

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use ecirs_core::{Client, ClientType, ClientUpdate, NewClient};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::roles::{BALANCE_ROLES, DELETE_ROLES, SALES_WRITE_ROLES};
use crate::auth::{require_roles, JwtAuth};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{validate_non_zero_amount, ValidatedJson};

// ==================== 요청 타입 ====================

/// 고객 생성 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientRequest {
    #[validate(length(min = 1, max = 255, message = "company_name must be 1-255 characters"))]
    pub company_name: String,
    #[validate(length(min = 1, max = 255, message = "contact_person must be 1-255 characters"))]
    pub contact_person: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 10, max = 20, message = "phone must be 10-20 characters"))]
    pub phone: String,
    #[validate(length(min = 1, max = 50, message = "tin must be 1-50 characters"))]
    pub tin: String,
    #[serde(rename = "type")]
    pub client_type: ClientType,
    #[serde(default)]
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
}

impl From<CreateClientRequest> for NewClient {
    fn from(req: CreateClientRequest) -> Self {
        Self {
            company_name: req.company_name,
            contact_person: req.contact_person,
            email: req.email,
            phone: req.phone,
            tin: req.tin,
            client_type: req.client_type,
            address: req.address,
        }
    }
}

/// 고객 수정 요청 (부분 수정). 잔액은 받지 않습니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClientRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "company_name must be 1-255 characters"))]
    pub company_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "contact_person must be 1-255 characters"))]
    pub contact_person: Option<String>,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 10, max = 20, message = "phone must be 10-20 characters"))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "tin must be 1-50 characters"))]
    pub tin: Option<String>,
    #[serde(default, rename = "type")]
    pub client_type: Option<ClientType>,
    #[serde(default)]
    #[validate(length(max = 500, message = "address must be at most 500 characters"))]
    pub address: Option<String>,
}

impl From<UpdateClientRequest> for ClientUpdate {
    fn from(req: UpdateClientRequest) -> Self {
        Self {
            company_name: req.company_name,
            contact_person: req.contact_person,
            email: req.email,
            phone: req.phone,
            tin: req.tin,
            client_type: req.client_type,
            address: req.address,
        }
    }
}

/// 잔액 조정 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BalanceAdjustmentRequest {
    /// 더할 금액 (음수면 차감, 0 불가)
    #[validate(custom(function = "validate_non_zero_amount"))]
    pub amount: Decimal,
}

// ==================== 핸들러 ====================

#[utoipa::path(
    get,
    path = "/api/v1/clients",
    responses(
        (status = 200, description = "고객 목록", body = Vec<Client>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    JwtAuth(_claims): JwtAuth,
) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.clients.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    params(("id" = String, Path, description = "고객 ID")),
    responses(
        (status = 200, description = "고객", body = Client),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn get_client(
    State(state): State<Arc<AppState>>,
    JwtAuth(_claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    Ok(Json(state.clients.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "생성됨", body = Client),
        (status = 400, description = "검증 실패 또는 TIN 중복", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ValidatedJson(req): ValidatedJson<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    require_roles(&claims, SALES_WRITE_ROLES)?;
    let client = state.clients.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    put,
    path = "/api/v1/clients/{id}",
    params(("id" = String, Path, description = "고객 ID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "수정됨", body = Client),
        (status = 400, description = "검증 실패 또는 TIN 중복", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateClientRequest>,
) -> ApiResult<Json<Client>> {
    require_roles(&claims, SALES_WRITE_ROLES)?;
    Ok(Json(state.clients.update(&id, req.into()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}",
    params(("id" = String, Path, description = "고객 ID")),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 400, description = "계약이 남아 있음", body = ApiErrorResponse),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    require_roles(&claims, DELETE_ROLES)?;
    state.clients.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/clients/{id}/balance",
    params(("id" = String, Path, description = "고객 ID")),
    request_body = BalanceAdjustmentRequest,
    responses(
        (status = 200, description = "조정된 고객", body = Client),
        (status = 403, description = "권한 없음", body = ApiErrorResponse),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn adjust_balance(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<BalanceAdjustmentRequest>,
) -> ApiResult<Json<Client>> {
    require_roles(&claims, BALANCE_ROLES)?;
    Ok(Json(state.clients.adjust_balance(&id, req.amount).await?))
}

/// 고객 라우터 생성.
pub fn clients_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route(
            "/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/{id}/balance", post(adjust_balance))
}
