//! Invoice Repository
//!
//! `invoices` 테이블에 대한 PostgreSQL 연산.
//! 쓰기 연산은 고객 잔액 조정과 같은 트랜잭션에서 실행됩니다.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ecirs_core::{DocumentFilter, Invoice, InvoiceStatus, InvoiceUpdate, NewInvoice};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::clients::adjust_balance_in_tx;
use super::contracts::station_param;
use super::{log_query, InvoiceStore, StoreError, StoreResult};

/// `invoices` 행.
#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: String,
    doc_num: String,
    contract_id: String,
    client_id: String,
    amount: Decimal,
    vat_rate: Decimal,
    vat_amount: Decimal,
    total_amount: Decimal,
    status: String,
    due_date: DateTime<Utc>,
    station_code: String,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = StoreError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: row.id,
            doc_num: row.doc_num,
            contract_id: row.contract_id,
            client_id: row.client_id,
            amount: row.amount,
            vat_rate: row.vat_rate,
            vat_amount: row.vat_amount,
            total_amount: row.total_amount,
            status: row.status.parse()?,
            due_date: row.due_date,
            station_code: row.station_code.parse()?,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL 청구서 저장소.
#[derive(Clone)]
pub struct PgInvoiceStore {
    pool: PgPool,
}

impl PgInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceStore for PgInvoiceStore {
    async fn list(&self, filter: &DocumentFilter<InvoiceStatus>) -> StoreResult<Vec<Invoice>> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT * FROM invoices
            WHERE ($1::text[] IS NULL OR station_code = ANY($1))
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(station_param(filter))
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        log_query("invoices.list", started, rows.len() as u64);

        rows.into_iter().map(Invoice::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Invoice>> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, InvoiceRow>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        log_query("invoices.find_by_id", started, row.is_some() as u64);

        row.map(Invoice::try_from).transpose()
    }

    async fn insert(&self, invoice: NewInvoice) -> StoreResult<Invoice> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            INSERT INTO invoices (
                id, doc_num, contract_id, client_id, amount, vat_rate, vat_amount,
                total_amount, status, due_date, station_code, created_by,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&invoice.doc_num)
        .bind(&invoice.contract_id)
        .bind(&invoice.client_id)
        .bind(invoice.amount)
        .bind(invoice.vat_rate)
        .bind(invoice.vat_amount)
        .bind(invoice.total_amount)
        .bind(invoice.status.as_str())
        .bind(invoice.due_date)
        .bind(invoice.station_code.as_str())
        .bind(&invoice.created_by)
        .fetch_one(&mut *tx)
        .await?;

        adjust_balance_in_tx(&mut tx, &row.client_id, row.total_amount).await?;
        tx.commit().await?;
        log_query("invoices.insert", started, 1);

        Invoice::try_from(row)
    }

    async fn update(&self, id: &str, update: InvoiceUpdate) -> StoreResult<Option<Invoice>> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, InvoiceRow>(
            "SELECT * FROM invoices WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let mut invoice = Invoice::try_from(current)?;
        let previous_total = invoice.total_amount;
        update.apply_to(&mut invoice)?;

        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            UPDATE invoices SET
                amount = $2,
                vat_rate = $3,
                vat_amount = $4,
                total_amount = $5,
                status = $6,
                due_date = $7,
                station_code = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(invoice.amount)
        .bind(invoice.vat_rate)
        .bind(invoice.vat_amount)
        .bind(invoice.total_amount)
        .bind(invoice.status.as_str())
        .bind(invoice.due_date)
        .bind(invoice.station_code.as_str())
        .fetch_one(&mut *tx)
        .await?;

        adjust_balance_in_tx(&mut tx, &row.client_id, row.total_amount - previous_total).await?;
        tx.commit().await?;
        log_query("invoices.update", started, 1);

        Invoice::try_from(row).map(Some)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let has_receipts: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM receipts WHERE invoice_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if has_receipts {
            return Err(StoreError::Conflict(
                "Invoice still has receipts".to_string(),
            ));
        }

        let deleted: Option<(String, Decimal)> = sqlx::query_as(
            "DELETE FROM invoices WHERE id = $1 RETURNING client_id, total_amount",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((client_id, total_amount)) = deleted else {
            return Ok(false);
        };

        adjust_balance_in_tx(&mut tx, &client_id, -total_amount).await?;
        tx.commit().await?;
        log_query("invoices.delete", started, 1);

        Ok(true)
    }
}
