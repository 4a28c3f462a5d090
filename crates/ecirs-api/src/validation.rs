//! 요청 검증.
//!
//! `ValidatedJson`은 본문 역직렬화와 `validator` 규칙 검사를 한 번에 수행하고,
//! 실패를 axum 기본 텍스트 응답 대신 통합 에러 봉투(`Validation Error`)로 바꿉니다.
//! 쿼리 문자열은 `ApiQuery`가 같은 방식으로 처리합니다.

use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use ecirs_core::{check_money, MONEY_SCALE};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

// ==================== 추출기 ====================

/// 검증된 JSON 본문.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate().map_err(validation_failed)?;
        Ok(Self(value))
    }
}

/// 쿼리 문자열 추출기. 알 수 없는 enum 값 등은 400 검증 에러가 됩니다.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::Validation {
        message: "Invalid request body".to_string(),
        details: Some(json!({ "body": rejection.body_text() })),
    }
}

fn query_rejection(rejection: QueryRejection) -> ApiError {
    ApiError::Validation {
        message: "Invalid query parameters".to_string(),
        details: Some(json!({ "query": rejection.body_text() })),
    }
}

/// 필드별 메시지 목록으로 변환.
pub fn validation_failed(errors: ValidationErrors) -> ApiError {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages = field_errors.iter().map(|e| {
            e.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("invalid value ({})", e.code))
        });
        fields.entry(field.to_string()).or_default().extend(messages);
    }

    ApiError::Validation {
        message: "Validation failed".to_string(),
        details: Some(Value::from(
            fields
                .into_iter()
                .map(|(field, messages)| (field, Value::from(messages)))
                .collect::<serde_json::Map<String, Value>>(),
        )),
    }
}

// ==================== 커스텀 검증 함수 ====================
// Option 필드에 사용하면 validator가 Some일 때만 내부 값을 넘깁니다.

/// 금액 한도(`NUMERIC(18, 2)`) 검사를 검증 에러로 변환.
fn money_in_range(value: &Decimal) -> Result<(), ValidationError> {
    check_money(*value).map(|_| ()).map_err(|e| {
        ValidationError::new("amount_out_of_range").with_message(e.to_string().into())
    })
}

/// 금액은 0보다 크고 저장 가능한 범위 안이어야 함.
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("amount_not_positive")
            .with_message("amount must be greater than 0".into()));
    }
    money_in_range(value)
}

/// 잔액 조정 금액은 0이 아니고 저장 가능한 범위 안이어야 함.
pub fn validate_non_zero_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_zero() {
        return Err(ValidationError::new("amount_zero").with_message("amount must not be 0".into()));
    }
    money_in_range(value)
}

/// VAT 비율 (0 ~ 100, 소수점 둘째 자리까지).
pub fn validate_vat_rate(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("vat_rate_out_of_range")
            .with_message("vat_rate must be between 0 and 100".into()));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError::new("vat_rate_scale")
            .with_message("vat_rate must have at most 2 decimal places".into()));
    }
    Ok(())
}

/// UUID 형식 식별자.
pub fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    if Uuid::parse_str(value).is_err() {
        return Err(ValidationError::new("invalid_uuid").with_message("must be a valid UUID".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse, routing::post, Router};
    use rust_decimal_macros::dec;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct SampleBody {
        #[validate(length(min = 3, message = "name must be at least 3 characters"))]
        name: String,
        #[validate(custom(function = "validate_positive_amount"))]
        amount: Decimal,
    }

    async fn sample_handler(ValidatedJson(body): ValidatedJson<SampleBody>) -> impl IntoResponse {
        body.name
    }

    async fn send(body: &str) -> (StatusCode, Value) {
        let app = Router::new().route("/", post(sample_handler));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, _) = send(r#"{"name":"Kano","amount":10}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rule_violation_lists_fields() {
        let (status, json) = send(r#"{"name":"Ka","amount":0}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Validation Error");
        assert_eq!(
            json["details"]["name"][0],
            "name must be at least 3 characters"
        );
        assert_eq!(json["details"]["amount"][0], "amount must be greater than 0");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let (status, json) = send(r#"{"name":"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Validation Error");
        assert_eq!(json["message"], "Invalid request body");
    }

    #[test]
    fn test_custom_validators() {
        assert!(validate_positive_amount(&dec!(0.01)).is_ok());
        assert!(validate_positive_amount(&dec!(-1)).is_err());
        assert!(validate_non_zero_amount(&dec!(-200)).is_ok());
        assert!(validate_non_zero_amount(&Decimal::ZERO).is_err());
        assert!(validate_vat_rate(&dec!(100)).is_ok());
        assert!(validate_vat_rate(&dec!(100.5)).is_err());
        assert!(validate_uuid("6f1c2b1e-3d4a-4c5b-9e8f-0a1b2c3d4e5f").is_ok());
        assert!(validate_uuid("client-1").is_err());
    }

    #[test]
    fn test_amount_validators_enforce_column_limits() {
        assert!(validate_positive_amount(&ecirs_core::MAX_MONEY).is_ok());
        assert!(validate_positive_amount(&Decimal::MAX).is_err());
        assert!(validate_positive_amount(&dec!(1.005)).is_err());
        assert!(validate_positive_amount(&dec!(1.50)).is_ok());

        assert!(validate_non_zero_amount(&Decimal::MIN).is_err());
        assert!(validate_non_zero_amount(&dec!(-0.001)).is_err());
        assert!(validate_vat_rate(&dec!(7.125)).is_err());
    }

    #[tokio::test]
    async fn test_oversize_amount_is_rejected_with_envelope() {
        let (status, json) =
            send(r#"{"name":"Kano","amount":"79228162514264337593543950335"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Validation Error");
        assert!(json["details"]["amount"][0]
            .as_str()
            .unwrap()
            .contains("must not exceed"));
    }
}
