//! 인증 서비스.
//!
//! 사용자 조회, 등록, 자격 증명 검증, JWT 페이로드 변환을 담당합니다.

use std::sync::{Arc, LazyLock};

use ecirs_core::{NewUser, Role, StationCode, User};

use crate::auth::{hash_password, verify_password, JwtPayload};
use crate::error::{ApiError, ApiResult};
use crate::repository::UserStore;

/// 존재하지 않는 사용자에 대해서도 해시 검증 비용을 치르기 위한 더미 해시.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("ecirs-dummy-password").ok());

/// 검증을 통과한 등록 입력.
#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
    pub station_codes: Vec<StationCode>,
}

/// 인증 서비스.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn find_by_username(&self, username: &str) -> ApiResult<Option<User>> {
        Ok(self.users.find_by_username(username).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        Ok(self.users.find_by_email(email).await?)
    }

    pub async fn find_by_id(&self, id: &str) -> ApiResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// 새 사용자 등록.
    ///
    /// 사용자 이름/이메일 중복 검사는 호출자가 먼저 수행합니다.
    /// 비밀번호는 해시된 형태로만 저장되며 상태는 `active`로 시작합니다.
    pub async fn register(&self, input: Registration) -> ApiResult<User> {
        let password_hash = hash_password(&input.password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            ApiError::Internal("An unexpected error occurred".to_string())
        })?;

        let user = self
            .users
            .insert(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                full_name: input.full_name,
                phone: input.phone,
                role: input.role,
                station_codes: input.station_codes,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user)
    }

    /// 자격 증명 검증.
    ///
    /// 사용자가 없거나 비밀번호가 틀리면 모두 `None`을 반환합니다.
    /// 두 경우 모두 해시 검증을 한 번 수행하여 응답 시간 차이를 줄입니다.
    pub async fn verify_password(&self, username: &str, password: &str) -> ApiResult<Option<User>> {
        match self.users.find_by_username(username).await? {
            Some(user) if verify_password(password, &user.password_hash) => Ok(Some(user)),
            Some(_) => Ok(None),
            None => {
                if let Some(dummy) = DUMMY_HASH.as_deref() {
                    let _ = verify_password(password, dummy);
                }
                Ok(None)
            }
        }
    }

    /// 토큰에 담을 최소 클레임.
    pub fn user_to_jwt_payload(user: &User) -> JwtPayload {
        JwtPayload {
            user_id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            station_codes: user.station_codes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    fn registration(username: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "s3cret-pass".to_string(),
            full_name: "Amina Bello".to_string(),
            phone: "08030000000".to_string(),
            role: Role::Accountant,
            station_codes: vec![StationCode::FrKad],
        }
    }

    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn test_register_stores_hash_only() {
        let auth = service();
        let user = auth.register(registration("amina")).await.unwrap();

        assert_ne!(user.password_hash, "s3cret-pass");
        assert!(user.password_hash.starts_with("$argon2"));
        assert!(user.is_active());

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("s3cret-pass"));
        assert!(!json.contains(&user.password_hash));
    }

    #[tokio::test]
    async fn test_verify_password_outcomes() {
        let auth = service();
        auth.register(registration("amina")).await.unwrap();

        let ok = auth.verify_password("amina", "s3cret-pass").await.unwrap();
        assert_eq!(ok.map(|u| u.username), Some("amina".to_string()));

        assert!(auth.verify_password("amina", "wrong-pass").await.unwrap().is_none());
        assert!(auth.verify_password("nobody", "s3cret-pass").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_jwt_payload_has_no_secrets() {
        let auth = service();
        let user = auth.register(registration("musa")).await.unwrap();
        let payload = AuthService::user_to_jwt_payload(&user);

        assert_eq!(payload.user_id, user.id);
        assert_eq!(payload.role, Role::Accountant);
        assert_eq!(payload.station_codes, vec![StationCode::FrKad]);

        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("userId"));
        assert!(json.contains("stationCodes"));
    }
}
