//! Contract Repository
//!
//! `contracts` 테이블에 대한 PostgreSQL 연산.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ecirs_core::{Contract, ContractStatus, ContractUpdate, DocumentFilter, NewContract};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{log_query, ContractStore, StoreError, StoreResult};

/// `contracts` 행.
#[derive(Debug, FromRow)]
struct ContractRow {
    id: String,
    doc_num: String,
    client_id: String,
    client_name: String,
    campaign: String,
    amount: Decimal,
    status: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    created_by: String,
    station_code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContractRow> for Contract {
    type Error = StoreError;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        Ok(Contract {
            id: row.id,
            doc_num: row.doc_num,
            client_id: row.client_id,
            client_name: row.client_name,
            campaign: row.campaign,
            amount: row.amount,
            status: row.status.parse()?,
            start_date: row.start_date,
            end_date: row.end_date,
            created_by: row.created_by,
            station_code: row.station_code.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// 필터의 스테이션 목록을 쿼리 파라미터로 변환.
pub(crate) fn station_param<S>(filter: &DocumentFilter<S>) -> Option<Vec<String>> {
    filter
        .stations
        .as_ref()
        .map(|codes| codes.iter().map(|c| c.as_str().to_string()).collect())
}

/// PostgreSQL 계약 저장소.
#[derive(Clone)]
pub struct PgContractStore {
    pool: PgPool,
}

impl PgContractStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContractStore for PgContractStore {
    async fn list(&self, filter: &DocumentFilter<ContractStatus>) -> StoreResult<Vec<Contract>> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, ContractRow>(
            r#"
            SELECT * FROM contracts
            WHERE ($1::text[] IS NULL OR station_code = ANY($1))
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(station_param(filter))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        log_query("contracts.list", started, rows.len() as u64);

        rows.into_iter().map(Contract::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Contract>> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ContractRow>("SELECT * FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        log_query("contracts.find_by_id", started, row.is_some() as u64);

        row.map(Contract::try_from).transpose()
    }

    async fn insert(&self, contract: NewContract) -> StoreResult<Contract> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ContractRow>(
            r#"
            INSERT INTO contracts (
                id, doc_num, client_id, client_name, campaign, amount, status,
                start_date, end_date, created_by, station_code, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&contract.doc_num)
        .bind(&contract.client_id)
        .bind(&contract.client_name)
        .bind(&contract.campaign)
        .bind(contract.amount)
        .bind(contract.status.as_str())
        .bind(contract.start_date)
        .bind(contract.end_date)
        .bind(&contract.created_by)
        .bind(contract.station_code.as_str())
        .fetch_one(&self.pool)
        .await?;
        log_query("contracts.insert", started, 1);

        Contract::try_from(row)
    }

    async fn update(&self, id: &str, update: ContractUpdate) -> StoreResult<Option<Contract>> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ContractRow>(
            r#"
            UPDATE contracts SET
                campaign = COALESCE($2, campaign),
                amount = COALESCE($3, amount),
                status = COALESCE($4, status),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                station_code = COALESCE($7, station_code),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.campaign)
        .bind(update.amount)
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.start_date)
        .bind(update.end_date)
        .bind(update.station_code.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;
        log_query("contracts.update", started, row.is_some() as u64);

        row.map(Contract::try_from).transpose()
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let has_invoices: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM invoices WHERE contract_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if has_invoices {
            return Err(StoreError::Conflict(
                "Contract still has invoices".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        log_query("contracts.delete", started, result.rows_affected());

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecirs_core::StationCode;

    #[test]
    fn test_station_param() {
        let all: DocumentFilter<ContractStatus> = DocumentFilter::default();
        assert_eq!(station_param(&all), None);

        let scoped: DocumentFilter<ContractStatus> = DocumentFilter {
            stations: Some(vec![StationCode::FrKan, StationCode::DlKan]),
            status: None,
        };
        assert_eq!(
            station_param(&scoped),
            Some(vec!["FR-KAN".to_string(), "DL-KAN".to_string()])
        );
    }

    #[test]
    fn test_bad_station_is_invalid_record() {
        let now = Utc::now();
        let row = ContractRow {
            id: "k-1".to_string(),
            doc_num: "CTR/XX/20260101/00000000".to_string(),
            client_id: "c-1".to_string(),
            client_name: "Acme".to_string(),
            campaign: "Launch".to_string(),
            amount: Decimal::ONE,
            status: "draft".to_string(),
            start_date: now,
            end_date: now,
            created_by: "u-1".to_string(),
            station_code: "XX".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            Contract::try_from(row),
            Err(StoreError::InvalidRecord(_))
        ));
    }
}
