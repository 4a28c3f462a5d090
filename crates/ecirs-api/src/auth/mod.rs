//! 인증 및 권한 부여.
//!
//! JWT 기반 인증과 역할/스테이션 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`JwtAuth`]: Axum 핸들러용 JWT 검증 추출기
//! - [`require_roles`], [`require_station`]: 요청 게이트
//! - [`roles`]: 리소스별 허용 역할 목록
//! - 비밀번호 해싱/검증 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn delete_client(
//!     JwtAuth(claims): JwtAuth,
//!     Path(id): Path<String>,
//! ) -> ApiResult<StatusCode> {
//!     require_roles(&claims, roles::DELETE_ROLES)?;
//!     // ...
//! }
//! ```

mod jwt;
mod middleware;
mod password;
pub mod roles;

pub use jwt::{create_token, decode_token, Claims, JwtConfig, JwtError, JwtPayload};
pub use middleware::{require_roles, require_station, JwtAuth, JwtAuthError};
pub use password::{hash_password, verify_password, PasswordError};
