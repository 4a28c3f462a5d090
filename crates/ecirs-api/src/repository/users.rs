//! User Repository
//!
//! `users` 테이블에 대한 PostgreSQL 연산.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ecirs_core::{NewUser, StationCode, User, UserStatus};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{log_query, StoreError, StoreResult, UserStore};

/// `users` 행.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    full_name: String,
    phone: String,
    role: String,
    station_codes: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let station_codes = row
            .station_codes
            .iter()
            .map(|code| code.parse::<StationCode>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            full_name: row.full_name,
            phone: row.phone,
            role: row.role.parse()?,
            station_codes,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL 사용자 저장소.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        operation: &'static str,
        sql: &'static str,
        value: &str,
    ) -> StoreResult<Option<User>> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, UserRow>(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        log_query(operation, started, row.is_some() as u64);

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.find_one(
            "users.find_by_username",
            "SELECT * FROM users WHERE username = $1",
            username,
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_one(
            "users.find_by_email",
            "SELECT * FROM users WHERE email = $1",
            email,
        )
        .await
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        self.find_one("users.find_by_id", "SELECT * FROM users WHERE id = $1", id)
            .await
    }

    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let started = Instant::now();
        let station_codes: Vec<String> = user
            .station_codes
            .iter()
            .map(|code| code.as_str().to_string())
            .collect();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, full_name, phone,
                role, station_codes, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(user.role.as_str())
        .bind(&station_codes)
        .bind(UserStatus::Active.as_str())
        .fetch_one(&self.pool)
        .await?;
        log_query("users.insert", started, 1);

        User::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str, stations: &[&str]) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: "u-1".to_string(),
            username: "halima".to_string(),
            email: "halima@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            full_name: "Halima Sani".to_string(),
            phone: "08020000000".to_string(),
            role: role.to_string(),
            station_codes: stations.iter().map(|s| s.to_string()).collect(),
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_conversion() {
        let user = User::try_from(row("accountant", &["FR-KAD", "DL-KAN"])).unwrap();
        assert_eq!(user.role, ecirs_core::Role::Accountant);
        assert_eq!(
            user.station_codes,
            vec![StationCode::FrKad, StationCode::DlKan]
        );
        assert!(user.is_active());
    }

    #[test]
    fn test_unknown_values_are_invalid_records() {
        assert!(matches!(
            User::try_from(row("root", &[])),
            Err(StoreError::InvalidRecord(_))
        ));
        assert!(matches!(
            User::try_from(row("viewer", &["XX-YYY"])),
            Err(StoreError::InvalidRecord(_))
        ));
    }
}
