//! Receipt Repository
//!
//! `receipts` 테이블에 대한 PostgreSQL 연산.
//! 영수증 금액은 고객 잔액에서 차감됩니다.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ecirs_core::{DocumentFilter, NewReceipt, Receipt, ReceiptUpdate};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::clients::adjust_balance_in_tx;
use super::contracts::station_param;
use super::{log_query, ReceiptStore, StoreError, StoreResult};

/// `receipts` 행.
#[derive(Debug, FromRow)]
struct ReceiptRow {
    id: String,
    doc_num: String,
    invoice_id: String,
    client_id: String,
    amount: Decimal,
    payment_method: String,
    payment_reference: Option<String>,
    station_code: String,
    received_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReceiptRow> for Receipt {
    type Error = StoreError;

    fn try_from(row: ReceiptRow) -> Result<Self, Self::Error> {
        Ok(Receipt {
            id: row.id,
            doc_num: row.doc_num,
            invoice_id: row.invoice_id,
            client_id: row.client_id,
            amount: row.amount,
            payment_method: row.payment_method.parse()?,
            payment_reference: row.payment_reference,
            station_code: row.station_code.parse()?,
            received_by: row.received_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL 영수증 저장소.
#[derive(Clone)]
pub struct PgReceiptStore {
    pool: PgPool,
}

impl PgReceiptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReceiptStore for PgReceiptStore {
    async fn list(&self, filter: &DocumentFilter<()>) -> StoreResult<Vec<Receipt>> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT * FROM receipts
            WHERE ($1::text[] IS NULL OR station_code = ANY($1))
            ORDER BY created_at DESC
            "#,
        )
        .bind(station_param(filter))
        .fetch_all(&self.pool)
        .await?;
        log_query("receipts.list", started, rows.len() as u64);

        rows.into_iter().map(Receipt::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Receipt>> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ReceiptRow>("SELECT * FROM receipts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        log_query("receipts.find_by_id", started, row.is_some() as u64);

        row.map(Receipt::try_from).transpose()
    }

    async fn insert(&self, receipt: NewReceipt) -> StoreResult<Receipt> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            INSERT INTO receipts (
                id, doc_num, invoice_id, client_id, amount, payment_method,
                payment_reference, station_code, received_by, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&receipt.doc_num)
        .bind(&receipt.invoice_id)
        .bind(&receipt.client_id)
        .bind(receipt.amount)
        .bind(receipt.payment_method.as_str())
        .bind(&receipt.payment_reference)
        .bind(receipt.station_code.as_str())
        .bind(&receipt.received_by)
        .fetch_one(&mut *tx)
        .await?;

        adjust_balance_in_tx(&mut tx, &row.client_id, -row.amount).await?;
        tx.commit().await?;
        log_query("receipts.insert", started, 1);

        Receipt::try_from(row)
    }

    async fn update(&self, id: &str, update: ReceiptUpdate) -> StoreResult<Option<Receipt>> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, ReceiptRow>(
            "SELECT * FROM receipts WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let mut receipt = Receipt::try_from(current)?;
        let previous_amount = receipt.amount;
        update.apply_to(&mut receipt);

        let row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            UPDATE receipts SET
                amount = $2,
                payment_method = $3,
                payment_reference = $4,
                station_code = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(receipt.amount)
        .bind(receipt.payment_method.as_str())
        .bind(&receipt.payment_reference)
        .bind(receipt.station_code.as_str())
        .fetch_one(&mut *tx)
        .await?;

        // 수납액이 늘면 잔액은 그만큼 줄어듭니다.
        adjust_balance_in_tx(&mut tx, &row.client_id, previous_amount - row.amount).await?;
        tx.commit().await?;
        log_query("receipts.update", started, 1);

        Receipt::try_from(row).map(Some)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let deleted: Option<(String, Decimal)> =
            sqlx::query_as("DELETE FROM receipts WHERE id = $1 RETURNING client_id, amount")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((client_id, amount)) = deleted else {
            return Ok(false);
        };

        adjust_balance_in_tx(&mut tx, &client_id, amount).await?;
        tx.commit().await?;
        log_query("receipts.delete", started, 1);

        Ok(true)
    }
}
