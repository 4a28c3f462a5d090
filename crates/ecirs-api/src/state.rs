//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 여러 요청 간에 공유됩니다.
//! 저장소는 생성 시점에 주입되며 전역 연결 풀은 존재하지 않습니다.

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::JwtConfig;
use crate::repository::{
    InMemoryStore, PgClientStore, PgContractStore, PgInvoiceStore, PgReceiptStore, PgUserStore,
};
use crate::services::{
    AuthService, ClientService, ContractService, InvoiceService, ReceiptService,
};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 사용자 조회/등록/자격 증명 검증
    pub auth: AuthService,

    /// 고객 프로필 및 잔액
    pub clients: ClientService,

    pub contracts: ContractService,

    pub invoices: InvoiceService,

    pub receipts: ReceiptService,

    /// JWT 서명 설정
    pub jwt: JwtConfig,

    /// 데이터베이스 연결 풀 (인메모리 저장소 사용 시 None)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// PostgreSQL 저장소로 상태 생성.
    ///
    /// 각 저장소는 같은 풀의 복제본을 소유합니다.
    pub fn with_postgres(pool: PgPool, jwt: JwtConfig) -> Self {
        let users = Arc::new(PgUserStore::new(pool.clone()));
        let clients = Arc::new(PgClientStore::new(pool.clone()));
        let contracts = Arc::new(PgContractStore::new(pool.clone()));
        let invoices = Arc::new(PgInvoiceStore::new(pool.clone()));
        let receipts = Arc::new(PgReceiptStore::new(pool.clone()));

        Self {
            auth: AuthService::new(users),
            clients: ClientService::new(clients.clone()),
            contracts: ContractService::new(contracts.clone(), clients.clone()),
            invoices: InvoiceService::new(invoices.clone(), contracts, clients),
            receipts: ReceiptService::new(receipts, invoices),
            jwt,
            db_pool: Some(pool),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 인메모리 저장소로 상태 생성.
    ///
    /// 전달한 저장소의 복제본이 테이블을 공유하므로 호출자가 데이터를 직접 준비할 수 있습니다.
    pub fn with_memory_store(store: InMemoryStore, jwt: JwtConfig) -> Self {
        let store = Arc::new(store);

        Self {
            auth: AuthService::new(store.clone()),
            clients: ClientService::new(store.clone()),
            contracts: ContractService::new(store.clone(), store.clone()),
            invoices: InvoiceService::new(store.clone(), store.clone(), store.clone()),
            receipts: ReceiptService::new(store.clone(), store),
            jwt,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }
}

impl FromRef<Arc<AppState>> for JwtConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.jwt.clone()
    }
}

/// 테스트용 JWT 비밀키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_JWT_SECRET: &str = "ecirs-test-secret";

/// 테스트용 AppState 생성 헬퍼.
///
/// 데이터베이스 없이 인메모리 저장소 위에서 동작합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    create_test_state_with_store(InMemoryStore::new())
}

/// 주어진 인메모리 저장소를 공유하는 테스트용 AppState.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state_with_store(store: InMemoryStore) -> AppState {
    AppState::with_memory_store(
        store,
        JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expires_in_minutes: 60,
        },
    )
}
