//! 리소스별 허용 역할 목록.
//!
//! 역할 게이트는 평면적인 집합 포함 관계이므로 `super_admin`도 목록에 명시해야 합니다.

use ecirs_core::Role;

/// 고객 생성/수정, 계약 생성/수정.
pub const SALES_WRITE_ROLES: &[Role] = &[
    Role::SuperAdmin,
    Role::StationManager,
    Role::SalesExecutive,
];

/// 청구서/영수증 생성/수정.
pub const FINANCE_WRITE_ROLES: &[Role] = &[
    Role::SuperAdmin,
    Role::StationManager,
    Role::Accountant,
];

/// 고객 잔액 직접 조정.
pub const BALANCE_ROLES: &[Role] = &[Role::SuperAdmin, Role::Accountant];

/// 모든 리소스 삭제.
pub const DELETE_ROLES: &[Role] = &[Role::SuperAdmin, Role::StationManager];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_has_no_write_role() {
        for list in [
            SALES_WRITE_ROLES,
            FINANCE_WRITE_ROLES,
            BALANCE_ROLES,
            DELETE_ROLES,
        ] {
            assert!(!list.contains(&Role::Viewer));
            assert!(list.contains(&Role::SuperAdmin));
        }
    }

    #[test]
    fn test_sales_and_finance_split() {
        assert!(!SALES_WRITE_ROLES.contains(&Role::Accountant));
        assert!(!FINANCE_WRITE_ROLES.contains(&Role::SalesExecutive));
        assert!(!BALANCE_ROLES.contains(&Role::StationManager));
    }
}
