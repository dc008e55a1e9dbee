//! User directory storage for the email app.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::info;

use crate::error::AppError;

pub const LIKE_ESCAPE: char = '!';

const MAX_CONNECTIONS: u32 = 5;

const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
    username VARCHAR(255) NOT NULL PRIMARY KEY,
    email VARCHAR(255)
)";

pub const SEED_USERS: [(&str, &str); 5] = [
    ("dora", "dora@amazon.com"),
    ("cansin", "cansin@google.com"),
    ("sencer", "sencer@bmw.com"),
    ("uras", "uras@mercedes.com"),
    ("ares", "ares@porche.com"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEmail {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Added,
    AlreadyExists,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Users whose name contains `keyword`, compared case-sensitively.
    async fn find_by_fragment(&self, keyword: &str) -> Result<Vec<UserEmail>, AppError>;

    async fn insert_user(&self, username: &str, email: &str) -> Result<InsertOutcome, AppError>;
}

pub fn escape_like(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        match c {
            '!' | '%' | '_' => {
                out.push(LIKE_ESCAPE);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

pub fn contains_pattern(keyword: &str) -> String {
    format!("%{}%", escape_like(keyword))
}

pub struct MySqlDirectory {
    pool: MySqlPool,
}

impl MySqlDirectory {
    pub async fn connect(options: MySqlConnectOptions) -> Result<Self, AppError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Creates the `users` table and seeds the demo rows when it is empty.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            info!(count, "users table already populated");
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for (username, email) in SEED_USERS {
            sqlx::query("INSERT INTO users (username, email) VALUES (?, ?)")
                .bind(username)
                .bind(email)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        info!(count = SEED_USERS.len(), "seeded users table");
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for MySqlDirectory {
    async fn find_by_fragment(&self, keyword: &str) -> Result<Vec<UserEmail>, AppError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT username, COALESCE(email, '') FROM users \
             WHERE username LIKE BINARY ? ESCAPE '!' ORDER BY username",
        )
        .bind(contains_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(username, email)| UserEmail { username, email })
            .collect())
    }

    async fn insert_user(&self, username: &str, email: &str) -> Result<InsertOutcome, AppError> {
        let existing: Option<(String,)> =
            sqlx::query_as("SELECT username FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Ok(InsertOutcome::AlreadyExists);
        }

        let inserted = sqlx::query("INSERT INTO users (username, email) VALUES (?, ?)")
            .bind(username)
            .bind(email)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(_) => Ok(InsertOutcome::Added),
            // Lost a race with a concurrent insert of the same name.
            Err(sqlx::Error::Database(error)) if error.is_unique_violation() => {
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("a_b%c!d"), "a!_b!%c!!d");
        assert_eq!(contains_pattern("dor"), "%dor%");
        assert_eq!(contains_pattern("%"), "%!%%");
    }
}
