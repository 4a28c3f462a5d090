//! 계약 API 라우트
//!
//! 모든 엔드포인트는 인증과 스테이션 게이트를 거칩니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/contracts?station=&status=` - 계약 목록
//! - `GET /api/v1/contracts/{id}` - 계약 조회
//! - `POST /api/v1/contracts` - 계약 생성
//! - `PUT /api/v1/contracts/{id}` - 계약 수정
//! - `DELETE /api/v1/contracts/{id}` - 계약 삭제

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use ecirs_core::{Contract, ContractStatus, ContractUpdate, StationCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::roles::{DELETE_ROLES, SALES_WRITE_ROLES};
use crate::auth::{require_roles, JwtAuth};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::ContractDraft;
use crate::state::AppState;
use crate::validation::{validate_positive_amount, validate_uuid, ApiQuery, ValidatedJson};

// ==================== 요청 타입 ====================

/// 계약 목록 쿼리
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContractListQuery {
    /// 스테이션 필터 (호출자 범위 안이어야 함)
    pub station: Option<StationCode>,
    /// 상태 필터
    pub status: Option<ContractStatus>,
}

/// 계약 생성 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateContractRequest {
    #[validate(custom(function = "validate_uuid"))]
    pub client_id: String,
    #[validate(length(min = 1, max = 255, message = "campaign must be 1-255 characters"))]
    pub campaign: String,
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub station_code: StationCode,
    #[serde(default)]
    pub status: Option<ContractStatus>,
}

impl From<CreateContractRequest> for ContractDraft {
    fn from(req: CreateContractRequest) -> Self {
        Self {
            client_id: req.client_id,
            campaign: req.campaign,
            amount: req.amount,
            status: req.status,
            start_date: req.start_date,
            end_date: req.end_date,
            station_code: req.station_code,
        }
    }
}

/// 계약 수정 요청 (부분 수정). 고객 연결은 바꿀 수 없습니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateContractRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "campaign must be 1-255 characters"))]
    pub campaign: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub station_code: Option<StationCode>,
    #[serde(default)]
    pub status: Option<ContractStatus>,
}

impl From<UpdateContractRequest> for ContractUpdate {
    fn from(req: UpdateContractRequest) -> Self {
        Self {
            campaign: req.campaign,
            amount: req.amount,
            status: req.status,
            start_date: req.start_date,
            end_date: req.end_date,
            station_code: req.station_code,
        }
    }
}

// ==================== 핸들러 ====================

#[utoipa::path(
    get,
    path = "/api/v1/contracts",
    params(ContractListQuery),
    responses(
        (status = 200, description = "계약 목록", body = Vec<Contract>),
        (status = 403, description = "범위 밖 스테이션", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "contracts"
)]
pub async fn list_contracts(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ApiQuery(query): ApiQuery<ContractListQuery>,
) -> ApiResult<Json<Vec<Contract>>> {
    Ok(Json(
        state
            .contracts
            .list(&claims, query.station, query.status)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/contracts/{id}",
    params(("id" = String, Path, description = "계약 ID")),
    responses(
        (status = 200, description = "계약", body = Contract),
        (status = 403, description = "범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "계약 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "contracts"
)]
pub async fn get_contract(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<Contract>> {
    Ok(Json(state.contracts.get(&claims, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/contracts",
    request_body = CreateContractRequest,
    responses(
        (status = 201, description = "생성됨", body = Contract),
        (status = 400, description = "검증 실패", body = ApiErrorResponse),
        (status = 403, description = "권한 없음 또는 범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "고객 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "contracts"
)]
pub async fn create_contract(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ValidatedJson(req): ValidatedJson<CreateContractRequest>,
) -> ApiResult<(StatusCode, Json<Contract>)> {
    require_roles(&claims, SALES_WRITE_ROLES)?;
    let contract = state.contracts.create(&claims, req.into()).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

#[utoipa::path(
    put,
    path = "/api/v1/contracts/{id}",
    params(("id" = String, Path, description = "계약 ID")),
    request_body = UpdateContractRequest,
    responses(
        (status = 200, description = "수정됨", body = Contract),
        (status = 400, description = "검증 실패", body = ApiErrorResponse),
        (status = 403, description = "권한 없음 또는 범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "계약 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "contracts"
)]
pub async fn update_contract(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateContractRequest>,
) -> ApiResult<Json<Contract>> {
    require_roles(&claims, SALES_WRITE_ROLES)?;
    Ok(Json(state.contracts.update(&claims, &id, req.into()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/contracts/{id}",
    params(("id" = String, Path, description = "계약 ID")),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 400, description = "청구서가 남아 있음", body = ApiErrorResponse),
        (status = 403, description = "권한 없음 또는 범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "계약 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "contracts"
)]
pub async fn delete_contract(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    require_roles(&claims, DELETE_ROLES)?;
    state.contracts.delete(&claims, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 계약 라우터 생성.
pub fn contracts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_contracts).post(create_contract))
        .route(
            "/{id}",
            get(get_contract).put(update_contract).delete(delete_contract),
        )
}
