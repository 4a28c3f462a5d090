//! 영수증 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/receipts?station=` - 영수증 목록
//! - `GET /api/v1/receipts/{id}` - 영수증 조회
//! - `POST /api/v1/receipts` - 영수증 생성 (고객 잔액 차감)
//! - `PUT /api/v1/receipts/{id}` - 영수증 수정 (금액 차이 반영)
//! - `DELETE /api/v1/receipts/{id}` - 영수증 삭제 (차감 취소)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ecirs_core::{PaymentMethod, Receipt, ReceiptUpdate, StationCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::roles::{DELETE_ROLES, FINANCE_WRITE_ROLES};
use crate::auth::{require_roles, JwtAuth};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::ReceiptDraft;
use crate::state::AppState;
use crate::validation::{validate_positive_amount, validate_uuid, ApiQuery, ValidatedJson};

/// 영수증 목록 쿼리
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReceiptListQuery {
    pub station: Option<StationCode>,
}

/// 영수증 생성 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReceiptRequest {
    #[validate(custom(function = "validate_uuid"))]
    pub invoice_id: String,
    #[validate(custom(function = "validate_uuid"))]
    pub client_id: String,
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    #[validate(length(max = 255, message = "payment_reference must be at most 255 characters"))]
    pub payment_reference: Option<String>,
    pub station_code: StationCode,
}

impl From<CreateReceiptRequest> for ReceiptDraft {
    fn from(req: CreateReceiptRequest) -> Self {
        Self {
            invoice_id: req.invoice_id,
            client_id: req.client_id,
            amount: req.amount,
            payment_method: req.payment_method,
            payment_reference: req.payment_reference,
            station_code: req.station_code,
        }
    }
}

/// 영수증 수정 요청. 청구서/고객 연결은 바꿀 수 없습니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReceiptRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    #[validate(length(max = 255, message = "payment_reference must be at most 255 characters"))]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub station_code: Option<StationCode>,
}

impl From<UpdateReceiptRequest> for ReceiptUpdate {
    fn from(req: UpdateReceiptRequest) -> Self {
        Self {
            amount: req.amount,
            payment_method: req.payment_method,
            payment_reference: req.payment_reference,
            station_code: req.station_code,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/receipts",
    params(ReceiptListQuery),
    responses(
        (status = 200, description = "영수증 목록", body = Vec<Receipt>),
        (status = 403, description = "범위 밖 스테이션", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "receipts"
)]
pub async fn list_receipts(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ApiQuery(query): ApiQuery<ReceiptListQuery>,
) -> ApiResult<Json<Vec<Receipt>>> {
    Ok(Json(state.receipts.list(&claims, query.station).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/receipts/{id}",
    params(("id" = String, Path, description = "영수증 ID")),
    responses(
        (status = 200, description = "영수증", body = Receipt),
        (status = 403, description = "범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "영수증 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "receipts"
)]
pub async fn get_receipt(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<Receipt>> {
    Ok(Json(state.receipts.get(&claims, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/receipts",
    request_body = CreateReceiptRequest,
    responses(
        (status = 201, description = "생성됨", body = Receipt),
        (status = 400, description = "검증 실패 또는 고객 불일치", body = ApiErrorResponse),
        (status = 403, description = "권한 없음 또는 범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "청구서 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "receipts"
)]
pub async fn create_receipt(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ValidatedJson(req): ValidatedJson<CreateReceiptRequest>,
) -> ApiResult<(StatusCode, Json<Receipt>)> {
    require_roles(&claims, FINANCE_WRITE_ROLES)?;
    let receipt = state.receipts.create(&claims, req.into()).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[utoipa::path(
    put,
    path = "/api/v1/receipts/{id}",
    params(("id" = String, Path, description = "영수증 ID")),
    request_body = UpdateReceiptRequest,
    responses(
        (status = 200, description = "수정됨", body = Receipt),
        (status = 400, description = "검증 실패", body = ApiErrorResponse),
        (status = 403, description = "권한 없음 또는 범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "영수증 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "receipts"
)]
pub async fn update_receipt(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateReceiptRequest>,
) -> ApiResult<Json<Receipt>> {
    require_roles(&claims, FINANCE_WRITE_ROLES)?;
    Ok(Json(state.receipts.update(&claims, &id, req.into()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/receipts/{id}",
    params(("id" = String, Path, description = "영수증 ID")),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 403, description = "권한 없음 또는 범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "영수증 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "receipts"
)]
pub async fn delete_receipt(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    require_roles(&claims, DELETE_ROLES)?;
    state.receipts.delete(&claims, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 영수증 라우터 생성.
pub fn receipts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_receipts).post(create_receipt))
        .route(
            "/{id}",
            get(get_receipt).put(update_receipt).delete(delete_receipt),
        )
}
