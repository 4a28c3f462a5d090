//! 청구서 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/invoices?station=&status=` - 청구서 목록
//! - `GET /api/v1/invoices/{id}` - 청구서 조회
//! - `POST /api/v1/invoices` - 청구서 생성 (고객 잔액 증가)
//! - `PUT /api/v1/invoices/{id}` - 청구서 수정 (총액 차이 반영)
//! - `DELETE /api/v1/invoices/{id}` - 청구서 삭제 (잔액 효과 취소)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use ecirs_core::{Invoice, InvoiceStatus, InvoiceUpdate, StationCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::roles::{DELETE_ROLES, FINANCE_WRITE_ROLES};
use crate::auth::{require_roles, JwtAuth};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::InvoiceDraft;
use crate::state::AppState;
use crate::validation::{
    validate_positive_amount, validate_uuid, validate_vat_rate, ApiQuery, ValidatedJson,
};

/// 청구서 목록 쿼리
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceListQuery {
    pub station: Option<StationCode>,
    pub status: Option<InvoiceStatus>,
}

/// 청구서 생성 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInvoiceRequest {
    #[validate(custom(function = "validate_uuid"))]
    pub contract_id: String,
    #[validate(custom(function = "validate_uuid"))]
    pub client_id: String,
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Decimal,
    /// VAT 비율(%) - 기본 7.5
    #[serde(default)]
    #[validate(custom(function = "validate_vat_rate"))]
    pub vat_rate: Option<Decimal>,
    pub due_date: DateTime<Utc>,
    pub station_code: StationCode,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
}

impl From<CreateInvoiceRequest> for InvoiceDraft {
    fn from(req: CreateInvoiceRequest) -> Self {
        Self {
            contract_id: req.contract_id,
            client_id: req.client_id,
            amount: req.amount,
            vat_rate: req.vat_rate,
            status: req.status,
            due_date: req.due_date,
            station_code: req.station_code,
        }
    }
}

/// 청구서 수정 요청. 금액이나 VAT 비율이 바뀌면 총액을 다시 계산합니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateInvoiceRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: Option<Decimal>,
    #[serde(default)]
    #[validate(custom(function = "validate_vat_rate"))]
    pub vat_rate: Option<Decimal>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub station_code: Option<StationCode>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
}

impl From<UpdateInvoiceRequest> for InvoiceUpdate {
    fn from(req: UpdateInvoiceRequest) -> Self {
        Self {
            amount: req.amount,
            vat_rate: req.vat_rate,
            status: req.status,
            due_date: req.due_date,
            station_code: req.station_code,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    params(InvoiceListQuery),
    responses(
        (status = 200, description = "청구서 목록", body = Vec<Invoice>),
        (status = 403, description = "범위 밖 스테이션", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ApiQuery(query): ApiQuery<InvoiceListQuery>,
) -> ApiResult<Json<Vec<Invoice>>> {
    Ok(Json(
        state
            .invoices
            .list(&claims, query.station, query.status)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "청구서 ID")),
    responses(
        (status = 200, description = "청구서", body = Invoice),
        (status = 403, description = "범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "청구서 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.invoices.get(&claims, &id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "생성됨", body = Invoice),
        (status = 400, description = "검증 실패 또는 계약-고객 불일치", body = ApiErrorResponse),
        (status = 403, description = "권한 없음 또는 범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "계약 또는 고객 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    ValidatedJson(req): ValidatedJson<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    require_roles(&claims, FINANCE_WRITE_ROLES)?;
    let invoice = state.invoices.create(&claims, req.into()).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "청구서 ID")),
    request_body = UpdateInvoiceRequest,
    responses(
        (status = 200, description = "수정됨", body = Invoice),
        (status = 400, description = "검증 실패", body = ApiErrorResponse),
        (status = 403, description = "권한 없음 또는 범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "청구서 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn update_invoice(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateInvoiceRequest>,
) -> ApiResult<Json<Invoice>> {
    require_roles(&claims, FINANCE_WRITE_ROLES)?;
    Ok(Json(state.invoices.update(&claims, &id, req.into()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "청구서 ID")),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 400, description = "영수증이 남아 있음", body = ApiErrorResponse),
        (status = 403, description = "권한 없음 또는 범위 밖 스테이션", body = ApiErrorResponse),
        (status = 404, description = "청구서 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    require_roles(&claims, DELETE_ROLES)?;
    state.invoices.delete(&claims, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 청구서 라우터 생성.
pub fn invoices_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route(
            "/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
}
