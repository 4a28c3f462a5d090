//! Client Repository
//!
//! `clients` 테이블에 대한 PostgreSQL 연산.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ecirs_core::{Client, ClientUpdate, NewClient};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{log_query, ClientStore, StoreError, StoreResult};

/// `clients` 행.
#[derive(Debug, FromRow)]
pub(crate) struct ClientRow {
    id: String,
    company_name: String,
    contact_person: String,
    email: String,
    phone: String,
    tin: String,
    #[sqlx(rename = "type")]
    client_type: String,
    balance: Decimal,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
    type Error = StoreError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        Ok(Client {
            id: row.id,
            company_name: row.company_name,
            contact_person: row.contact_person,
            email: row.email,
            phone: row.phone,
            tin: row.tin,
            client_type: row.client_type.parse()?,
            balance: row.balance,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL 고객 저장소.
#[derive(Clone)]
pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStore for PgClientStore {
    async fn list(&self) -> StoreResult<Vec<Client>> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, ClientRow>("SELECT * FROM clients ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        log_query("clients.list", started, rows.len() as u64);

        rows.into_iter().map(Client::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Client>> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ClientRow>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        log_query("clients.find_by_id", started, row.is_some() as u64);

        row.map(Client::try_from).transpose()
    }

    async fn find_by_tin(&self, tin: &str) -> StoreResult<Option<Client>> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ClientRow>("SELECT * FROM clients WHERE tin = $1")
            .bind(tin)
            .fetch_optional(&self.pool)
            .await?;
        log_query("clients.find_by_tin", started, row.is_some() as u64);

        row.map(Client::try_from).transpose()
    }

    async fn insert(&self, client: NewClient) -> StoreResult<Client> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            INSERT INTO clients (
                id, company_name, contact_person, email, phone, tin, type,
                address, balance, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&client.company_name)
        .bind(&client.contact_person)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.tin)
        .bind(client.client_type.as_str())
        .bind(&client.address)
        .fetch_one(&self.pool)
        .await?;
        log_query("clients.insert", started, 1);

        Client::try_from(row)
    }

    async fn update(&self, id: &str, update: ClientUpdate) -> StoreResult<Option<Client>> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }

        let started = Instant::now();
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            UPDATE clients SET
                company_name = COALESCE($2, company_name),
                contact_person = COALESCE($3, contact_person),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                tin = COALESCE($6, tin),
                type = COALESCE($7, type),
                address = COALESCE($8, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.company_name)
        .bind(&update.contact_person)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.tin)
        .bind(update.client_type.map(|t| t.as_str()))
        .bind(&update.address)
        .fetch_optional(&self.pool)
        .await?;
        log_query("clients.update", started, row.is_some() as u64);

        row.map(Client::try_from).transpose()
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let has_contracts: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM contracts WHERE client_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if has_contracts {
            return Err(StoreError::Conflict(
                "Client still has contracts".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        log_query("clients.delete", started, result.rows_affected());

        Ok(result.rows_affected() > 0)
    }

    async fn adjust_balance(&self, id: &str, delta: Decimal) -> StoreResult<Option<Client>> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            UPDATE clients
            SET balance = balance + $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        log_query("clients.adjust_balance", started, row.is_some() as u64);

        row.map(Client::try_from).transpose()
    }
}

/// 트랜잭션 안에서 고객 잔액을 조정합니다.
///
/// 고객이 없으면 `Conflict`를 반환하여 호출자의 트랜잭션이 롤백되도록 합니다.
pub(crate) async fn adjust_balance_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    client_id: &str,
    delta: Decimal,
) -> StoreResult<()> {
    if delta.is_zero() {
        return Ok(());
    }

    let result = sqlx::query(
        "UPDATE clients SET balance = balance + $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(delta)
    .bind(client_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::Conflict(format!(
            "Client {} does not exist",
            client_id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_conversion() {
        let now = Utc::now();
        let row = ClientRow {
            id: "c-1".to_string(),
            company_name: "Dutse Motors".to_string(),
            contact_person: "Ibrahim".to_string(),
            email: "ib@dutsemotors.ng".to_string(),
            phone: "08061234567".to_string(),
            tin: "TIN-77".to_string(),
            client_type: "agency".to_string(),
            balance: dec!(-120.50),
            address: None,
            created_at: now,
            updated_at: now,
        };

        let client = Client::try_from(row).unwrap();
        assert_eq!(client.client_type, ecirs_core::ClientType::Agency);
        assert_eq!(client.balance, dec!(-120.50));
    }
}
