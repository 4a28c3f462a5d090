//! 역할/스테이션 기반 접근 제어 규칙.
//!
//! 두 개의 독립적인 판정 함수를 제공합니다. 호출 순서와 조합은 라우팅 계층의 책임입니다.
//!
//! - **역할 판정**: 호출자의 역할이 허용 목록에 포함되는지 (평면 집합 포함 관계, 계층 없음)
//! - **스테이션 판정**: `super_admin`이거나 대상 스테이션이 호출자의 스테이션 목록에 포함되는지

use crate::domain::{Role, StationCode};

/// 역할 판정.
///
/// `role`이 `allowed`에 포함될 때만 통과합니다. `super_admin`도 목록에 없으면 거부됩니다.
pub fn role_allowed(role: Role, allowed: &[Role]) -> bool {
    allowed.contains(&role)
}

/// 스테이션 판정.
///
/// `super_admin`은 스테이션 목록과 무관하게 항상 통과합니다.
pub fn station_allowed(role: Role, stations: &[StationCode], target: StationCode) -> bool {
    role == Role::SuperAdmin || stations.contains(&target)
}

/// 호출자가 조회할 수 있는 스테이션 범위.
///
/// `None`은 전체 스테이션을 의미합니다.
pub fn visible_stations(role: Role, stations: &[StationCode]) -> Option<Vec<StationCode>> {
    if role == Role::SuperAdmin {
        None
    } else {
        Some(stations.to_vec())
    }
}
