//! 사용자 및 역할.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::StationCode;

string_enum! {
    /// 사용자 역할.
    ///
    /// 평면적인 권한 집합이며 계층이 없습니다.
    /// 유일한 예외는 `SuperAdmin`의 전체 스테이션 접근입니다.
    Role as "role" {
        /// 최고 관리자 - 모든 스테이션 접근
        SuperAdmin => "super_admin",
        /// 스테이션 관리자
        StationManager => "station_manager",
        /// 영업 담당
        SalesExecutive => "sales_executive",
        /// 회계 담당
        Accountant => "accountant",
        /// 읽기 전용
        Viewer => "viewer",
    }
}

string_enum! {
    /// 계정 상태.
    UserStatus as "user status" {
        Active => "active",
        Inactive => "inactive",
    }
}

/// 사용자 레코드.
///
/// `password_hash`는 직렬화되지 않으며 `Debug` 출력에서도 가려집니다.
#[derive(Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
    pub station_codes: Vec<StationCode>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("station_codes", &self.station_codes)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl User {
    /// 활성 계정 여부.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// 외부 노출용 프로필 (상태 제외).
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
            station_codes: self.station_codes.clone(),
            status: None,
        }
    }

    /// 계정 상태를 포함한 프로필.
    pub fn profile_with_status(&self) -> UserProfile {
        UserProfile {
            status: Some(self.status),
            ..self.profile()
        }
    }
}

/// 응답에 노출 가능한 사용자 정보.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub station_codes: Vec<StationCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

/// 저장소에 삽입할 새 사용자.
///
/// 평문 비밀번호가 아닌 해시만 보관합니다.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: String,
    pub role: Role,
    pub station_codes: Vec<StationCode>,
}
