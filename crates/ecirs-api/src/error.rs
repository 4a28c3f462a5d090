//! 통합 API 에러 타입.
//!
//! 모든 엔드포인트는 실패 시 동일한 형식의 JSON 본문을 반환합니다.
//!
//! ```json
//! {
//!   "error": "Bad Request",
//!   "message": "Client with this TIN already exists",
//!   "details": null
//! }
//! ```
//!
//! `details`는 검증 실패일 때만 포함됩니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::repository::StoreError;

/// 에러 응답 본문.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 종류 (예: "Unauthorized", "Validation Error")
    pub error: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 검증 실패 상세 정보 (선택적)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성.
    ///
    /// # Example
    ///
    /// ```
    /// use ecirs_api::error::ApiErrorResponse;
    ///
    /// let error = ApiErrorResponse::new("Not Found", "Client not found");
    /// assert!(error.details.is_none());
    /// ```
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error, self.message)
    }
}

/// API 경계 에러.
///
/// 종류별로 HTTP 상태 코드가 고정됩니다.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 형식이 잘못되었거나 범위를 벗어난 입력 (400)
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },
    /// 고유 제약 위반 (400)
    #[error("{0}")]
    Duplicate(String),
    /// 토큰 누락/무효/만료 또는 잘못된 자격 증명 (401)
    #[error("{0}")]
    Authentication(String),
    /// 인증되었지만 역할/스테이션 범위 부족 (403)
    #[error("{0}")]
    Authorization(String),
    /// 리소스 없음 (404)
    #[error("{0}")]
    NotFound(String),
    /// 예기치 않은 실패 (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// 상세 정보 없는 검증 에러.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::Duplicate(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 응답 본문의 `error` 필드 값.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "Validation Error",
            ApiError::Duplicate(_) => "Bad Request",
            ApiError::Authentication(_) => "Unauthorized",
            ApiError::Authorization(_) => "Forbidden",
            ApiError::NotFound(_) => "Not Found",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }

    /// 응답 본문으로 변환.
    pub fn to_response_body(&self) -> ApiErrorResponse {
        match self {
            ApiError::Validation {
                message,
                details: Some(details),
            } => ApiErrorResponse::with_details(self.kind(), message.clone(), details.clone()),
            other => ApiErrorResponse::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response_body())).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => ApiError::Duplicate(message),
            StoreError::OutOfRange(message) => ApiError::validation(message),
            other => {
                tracing::error!(error = %other, "Storage operation failed");
                ApiError::Internal("An unexpected error occurred".to_string())
            }
        }
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Duplicate("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Authentication("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Authorization("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelope_without_details() {
        let body = ApiError::Duplicate("Username already exists".into()).to_response_body();
        let json = serde_json::to_string(&body).unwrap();

        assert!(json.contains(r#""error":"Bad Request""#));
        assert!(json.contains(r#""message":"Username already exists""#));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_validation_envelope_carries_details() {
        let err = ApiError::Validation {
            message: "Invalid request body".into(),
            details: Some(serde_json::json!({"tin": ["length"]})),
        };
        let body = err.to_response_body();

        assert_eq!(body.error, "Validation Error");
        assert_eq!(body.details.unwrap()["tin"][0], "length");
    }

    #[test]
    fn test_store_errors_hide_internals() {
        let err: ApiError = StoreError::InvalidRecord("role = root".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("root"));

        let err: ApiError = StoreError::Conflict("Client has contracts".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_out_of_range_amount_is_validation_error() {
        let err: ApiError = StoreError::OutOfRange("amount overflow".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "Validation Error");
        assert_eq!(err.to_string(), "amount overflow");
    }
}
