//! 인증 API 라우트
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/auth/login` - 로그인 (토큰 발급)
//! - `POST /api/v1/auth/register` - 사용자 등록
//! - `GET /api/v1/auth/me` - 현재 사용자 프로필

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use ecirs_core::{Role, StationCode, UserProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{create_token, Claims, JwtAuth};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::metrics::record_login;
use crate::services::{AuthService, Registration};
use crate::state::AppState;
use crate::validation::ValidatedJson;

// ==================== 요청/응답 타입 ====================

/// 로그인 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// 로그인 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer 토큰
    pub token: String,
    pub user: UserProfile,
}

/// 사용자 등록 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 255, message = "full_name must be 1-255 characters"))]
    pub full_name: String,
    #[validate(length(min = 10, max = 20, message = "phone must be 10-20 characters"))]
    pub phone: String,
    pub role: Role,
    pub station_codes: Vec<StationCode>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            phone: req.phone,
            role: req.role,
            station_codes: req.station_codes,
        }
    }
}

// ==================== 핸들러 ====================

/// 로그인.
///
/// 존재하지 않는 사용자와 틀린 비밀번호는 같은 401 응답을 받습니다.
/// 비활성 계정은 자격 증명 검증 후에만 403으로 구분됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 400, description = "입력 검증 실패", body = ApiErrorResponse),
        (status = 401, description = "잘못된 자격 증명", body = ApiErrorResponse),
        (status = 403, description = "비활성 계정", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let Some(user) = state.auth.verify_password(&req.username, &req.password).await? else {
        warn!(username = %req.username, "Login rejected");
        record_login("rejected");
        return Err(ApiError::Authentication(
            "Invalid username or password".to_string(),
        ));
    };

    if !user.is_active() {
        warn!(user_id = %user.id, "Login attempt on inactive account");
        record_login("inactive");
        return Err(ApiError::Authorization("Account is inactive".to_string()));
    }

    let claims = Claims::new(
        AuthService::user_to_jwt_payload(&user),
        state.jwt.expires_in_minutes,
    );
    let token = create_token(&claims, &state.jwt.secret).map_err(|e| {
        tracing::error!(error = %e, "Token signing failed");
        ApiError::Internal("An unexpected error occurred".to_string())
    })?;

    info!(user_id = %user.id, role = %user.role, "User logged in");
    record_login("success");
    Ok(Json(LoginResponse {
        token,
        user: user.profile(),
    }))
}

/// 사용자 등록.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "등록 성공", body = UserProfile),
        (status = 400, description = "검증 실패 또는 중복", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    if state.auth.find_by_username(&req.username).await?.is_some() {
        return Err(ApiError::Duplicate("Username already exists".to_string()));
    }
    if state.auth.find_by_email(&req.email).await?.is_some() {
        return Err(ApiError::Duplicate("Email already exists".to_string()));
    }

    let user = state.auth.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(user.profile())))
}

/// 현재 사용자 프로필 (상태 포함).
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "프로필", body = UserProfile),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
) -> ApiResult<Json<UserProfile>> {
    let user = state
        .auth
        .find_by_id(&claims.payload.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(user.profile_with_status()))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/me", get(me))
}
