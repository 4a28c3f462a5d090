//! JWT 토큰 처리.
//!
//! HS256 서명 Access Token 생성/검증 로직.

use chrono::{Duration, Utc};
use ecirs_core::{Role, StationCode};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

/// 토큰에 담기는 최소 사용자 정보.
///
/// 비밀번호 해시 등 민감 정보는 절대 포함하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    pub role: Role,
    #[serde(rename = "stationCodes")]
    pub station_codes: Vec<StationCode>,
}

/// JWT Access Token 페이로드.
///
/// 사용자 클레임은 [`JwtPayload`]에서만 정의되며 평탄화되어 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub payload: JwtPayload,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 페이로드와 만료 시간(분)으로 Claims 생성.
    pub fn new(payload: JwtPayload, expires_in_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            payload,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
        }
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// 서명 설정.
///
/// `AppState`에서 `FromRef`로 추출됩니다.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_minutes: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expires_in_minutes", &self.expires_in_minutes)
            .finish()
    }
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
}

/// Access Token 생성.
///
/// # Arguments
///
/// * `claims` - JWT 페이로드
/// * `secret` - 비밀 키
///
/// # Returns
///
/// 인코딩된 JWT 문자열
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::from)
}

/// JWT 토큰 디코딩 및 검증.
///
/// 서명과 만료 시간을 모두 검증합니다.
pub fn decode_token(token: &str, secret: &str) -> Result<TokenData<Claims>, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
        _ => JwtError::DecodingError,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn payload() -> JwtPayload {
        JwtPayload {
            user_id: "user123".to_string(),
            username: "musa".to_string(),
            role: Role::StationManager,
            station_codes: vec![StationCode::FrKan],
        }
    }

    #[test]
    fn test_create_and_decode_token() {
        let claims = Claims::new(payload(), 60);

        let token = create_token(&claims, TEST_SECRET).unwrap();
        assert!(!token.is_empty());

        let decoded = decode_token(&token, TEST_SECRET).unwrap();
        assert_eq!(decoded.claims.payload.user_id, "user123");
        assert_eq!(decoded.claims.payload.role, Role::StationManager);
        assert_eq!(decoded.claims.payload.station_codes, vec![StationCode::FrKan]);
        assert!(!decoded.claims.is_expired());
    }

    #[test]
    fn test_claims_wire_names() {
        let json = serde_json::to_value(Claims::new(payload(), 60)).unwrap();
        assert_eq!(json["userId"], "user123");
        assert_eq!(json["stationCodes"][0], "FR-KAN");
        assert_eq!(json["role"], "station_manager");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_flat_claims_decode_into_payload() {
        let json = serde_json::json!({
            "userId": "user123",
            "username": "musa",
            "role": "station_manager",
            "stationCodes": ["FR-KAN"],
            "iat": 1,
            "exp": 2,
        });
        let claims: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(claims.payload, payload());
        assert_eq!(claims.exp, 2);
    }

    #[test]
    fn test_expired_token() {
        let claims = Claims::new(payload(), -10);
        let token = create_token(&claims, TEST_SECRET).unwrap();

        let result = decode_token(&token, TEST_SECRET);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_invalid_token() {
        let result = decode_token("invalid.token.here", TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = create_token(&Claims::new(payload(), 60), TEST_SECRET).unwrap();

        let result = decode_token(&token, "wrong-secret-key-for-testing-minimum-32-chars");
        assert!(result.is_err());
    }
}
