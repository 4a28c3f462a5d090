//! 저장소 계층.
//!
//! 엔티티별 저장소 트레이트와 두 가지 구현을 제공합니다.
//!
//! - `Pg*Store`: PostgreSQL (`sqlx::PgPool`을 소유)
//! - [`InMemoryStore`]: 단일 `RwLock`으로 보호되는 테이블 집합 (테스트/로컬 실행용)
//!
//! 서비스는 `Arc<dyn …Store>`만 주입받으며 전역 연결 풀은 존재하지 않습니다.
//!
//! # 원장(잔액) 효과
//!
//! 청구서 생성은 고객 잔액에 `total_amount`를 더하고, 영수증 생성은 `amount`를 뺍니다.
//! 삭제는 효과를 되돌리고 수정은 차액만 반영합니다.
//! 모든 구현은 문서 쓰기와 잔액 변경을 하나의 원자적 단위로 수행해야 합니다.

use std::time::Instant;

use async_trait::async_trait;
use ecirs_core::{
    Client, ClientUpdate, Contract, ContractStatus, ContractUpdate, CoreError, DocumentFilter,
    Invoice, InvoiceStatus, InvoiceUpdate, NewClient, NewContract, NewInvoice, NewReceipt,
    NewUser, Receipt, ReceiptUpdate, User,
};
use rust_decimal::Decimal;

pub mod clients;
pub mod contracts;
pub mod invoices;
pub mod memory;
pub mod receipts;
pub mod users;

pub use clients::PgClientStore;
pub use contracts::PgContractStore;
pub use invoices::PgInvoiceStore;
pub use memory::InMemoryStore;
pub use receipts::PgReceiptStore;
pub use users::PgUserStore;

// ==================== 에러 ====================

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 데이터베이스 연결/쿼리 실패
    #[error("데이터베이스 오류: {0}")]
    Database(sqlx::Error),

    /// 저장된 값이 도메인 규칙을 벗어남 (예: 알 수 없는 역할 문자열)
    #[error("잘못된 레코드: {0}")]
    InvalidRecord(String),

    /// 고유 제약 또는 참조 무결성 위반
    #[error("{0}")]
    Conflict(String),

    /// 금액이 컬럼 범위를 벗어남 (잔액 누적 포함)
    #[error("{0}")]
    OutOfRange(String),
}

/// PostgreSQL unique_violation
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL foreign_key_violation
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL numeric_value_out_of_range
const PG_NUMERIC_OUT_OF_RANGE: &str = "22003";

pub(crate) const UNIQUE_MESSAGE: &str = "Record already exists";
pub(crate) const FOREIGN_KEY_MESSAGE: &str = "Referenced record is missing or still in use";
pub(crate) const OUT_OF_RANGE_MESSAGE: &str = "Amount is out of range";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => {
                    return StoreError::Conflict(UNIQUE_MESSAGE.to_string());
                }
                Some(PG_FOREIGN_KEY_VIOLATION) => {
                    return StoreError::Conflict(FOREIGN_KEY_MESSAGE.to_string());
                }
                Some(PG_NUMERIC_OUT_OF_RANGE) => {
                    return StoreError::OutOfRange(OUT_OF_RANGE_MESSAGE.to_string());
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AmountOutOfRange(message) => StoreError::OutOfRange(message),
            other => StoreError::InvalidRecord(other.to_string()),
        }
    }
}

/// 저장소 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

/// 쿼리 실행 시간 로깅.
pub(crate) fn log_query(operation: &'static str, started: Instant, rows: u64) {
    tracing::debug!(
        operation,
        elapsed_ms = started.elapsed().as_millis() as u64,
        rows,
        "Executed query"
    );
}

// ==================== 저장소 트레이트 ====================

/// 사용자 저장소.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;

    /// 새 사용자 삽입. 상태는 항상 `active`로 시작합니다.
    async fn insert(&self, user: NewUser) -> StoreResult<User>;
}

/// 고객 저장소.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// 전체 고객 (최신순).
    async fn list(&self) -> StoreResult<Vec<Client>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Client>>;

    async fn find_by_tin(&self, tin: &str) -> StoreResult<Option<Client>>;

    /// 잔액 0으로 새 고객 삽입.
    async fn insert(&self, client: NewClient) -> StoreResult<Client>;

    /// 프로필 부분 수정. 잔액은 변경하지 않습니다.
    async fn update(&self, id: &str, update: ClientUpdate) -> StoreResult<Option<Client>>;

    /// 삭제. 계약이 남아 있으면 `Conflict`.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    /// `balance = balance + delta` 단일 연산.
    async fn adjust_balance(&self, id: &str, delta: Decimal) -> StoreResult<Option<Client>>;
}

/// 계약 저장소.
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// 필터에 맞는 계약 (최신순).
    async fn list(&self, filter: &DocumentFilter<ContractStatus>) -> StoreResult<Vec<Contract>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Contract>>;

    async fn insert(&self, contract: NewContract) -> StoreResult<Contract>;

    async fn update(&self, id: &str, update: ContractUpdate) -> StoreResult<Option<Contract>>;

    /// 삭제. 청구서가 남아 있으면 `Conflict`.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

/// 청구서 저장소.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// 필터에 맞는 청구서 (최신순).
    async fn list(&self, filter: &DocumentFilter<InvoiceStatus>) -> StoreResult<Vec<Invoice>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Invoice>>;

    /// 삽입과 동시에 고객 잔액에 `total_amount`를 더합니다.
    async fn insert(&self, invoice: NewInvoice) -> StoreResult<Invoice>;

    /// 수정 후 총액 차이만큼 고객 잔액을 조정합니다.
    async fn update(&self, id: &str, update: InvoiceUpdate) -> StoreResult<Option<Invoice>>;

    /// 삭제와 동시에 잔액 효과를 되돌립니다. 영수증이 남아 있으면 `Conflict`.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

/// 영수증 저장소.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// 필터 조건에 맞는 영수증 (최신순). 영수증에는 상태가 없습니다.
    async fn list(&self, filter: &DocumentFilter<()>) -> StoreResult<Vec<Receipt>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Receipt>>;

    /// 삽입과 동시에 고객 잔액에서 `amount`를 뺍니다.
    async fn insert(&self, receipt: NewReceipt) -> StoreResult<Receipt>;

    /// 수정 후 금액 차이만큼 고객 잔액을 조정합니다.
    async fn update(&self, id: &str, update: ReceiptUpdate) -> StoreResult<Option<Receipt>>;

    /// 삭제와 동시에 잔액 효과를 되돌립니다.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_becomes_invalid_record() {
        let err: StoreError = CoreError::unknown("role", "root").into();
        assert!(matches!(err, StoreError::InvalidRecord(ref msg) if msg.contains("root")));
    }

    #[test]
    fn test_amount_overflow_becomes_out_of_range() {
        let err: StoreError = CoreError::AmountOutOfRange("amount overflow".into()).into();
        assert!(matches!(err, StoreError::OutOfRange(ref msg) if msg == "amount overflow"));
    }

    #[test]
    fn test_non_database_sqlx_error_is_database() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
