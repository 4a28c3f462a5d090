//! Axum용 JWT 인증 추출기 및 요청 게이트.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use ecirs_core::{role_allowed, station_allowed, Role, StationCode};

use super::jwt::{decode_token, Claims, JwtConfig, JwtError};
use crate::error::ApiError;

/// JWT 인증 추출기.
///
/// `Authorization: Bearer <token>` 헤더를 검증하고 Claims를 꺼냅니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(JwtAuth(claims): JwtAuth) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.payload.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

/// JWT 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtAuthError {
    #[error("Authentication required")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidAuthHeader,
    #[error("Invalid or expired token")]
    TokenExpired,
    #[error("Invalid or expired token")]
    InvalidToken,
}

impl From<JwtAuthError> for ApiError {
    fn from(err: JwtAuthError) -> Self {
        ApiError::Authentication(err.to_string())
    }
}

impl IntoResponse for JwtAuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl<S> FromRequestParts<S> for JwtAuth
where
    S: Send + Sync,
    JwtConfig: FromRef<S>,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(JwtAuthError::MissingToken)?;

        // Bearer 토큰 형식 확인
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(JwtAuthError::InvalidAuthHeader)?;

        let config = JwtConfig::from_ref(state);

        let token_data = decode_token(token.trim(), &config.secret).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            match e {
                JwtError::TokenExpired => JwtAuthError::TokenExpired,
                _ => JwtAuthError::InvalidToken,
            }
        })?;

        Ok(JwtAuth(token_data.claims))
    }
}

/// 역할 게이트.
///
/// 호출자의 역할이 허용 목록에 없으면 403을 반환합니다.
pub fn require_roles(claims: &Claims, allowed: &[Role]) -> Result<(), ApiError> {
    if role_allowed(claims.payload.role, allowed) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %claims.payload.user_id,
            role = %claims.payload.role,
            "Role gate denied request"
        );
        Err(ApiError::Authorization("Insufficient permissions".to_string()))
    }
}

/// 스테이션 게이트.
///
/// `super_admin`이 아니고 대상 스테이션이 호출자 범위 밖이면 403을 반환합니다.
pub fn require_station(claims: &Claims, station: StationCode) -> Result<(), ApiError> {
    if station_allowed(claims.payload.role, &claims.payload.station_codes, station) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %claims.payload.user_id,
            station = %station,
            "Station gate denied request"
        );
        Err(ApiError::Authorization("No access to this station".to_string()))
    }
}
