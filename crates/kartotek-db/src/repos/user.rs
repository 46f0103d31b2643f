use crate::call;
use anyhow::Result;
use chrono::{DateTime, Utc};
use kartotek_common::models::user::{Rights, User};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub user_id: i64,
    pub username: String,
    pub password_digest: String,
    pub first_name: String,
    pub last_name: String,
    pub rights: i16,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.user_id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            // Unknown ordinals map to the least privileged role.
            rights: Rights::try_from(row.rights).unwrap_or(Rights::User),
            created_at: row.created_at,
        }
    }
}

pub struct UserRepo;

impl UserRepo {
    pub async fn create(
        pool: &PgPool,
        username: &str,
        password_digest: &str,
        first_name: &str,
        last_name: &str,
        rights: i16,
    ) -> Result<UserRow> {
        call::write(
            "create user",
            sqlx::query_as::<_, UserRow>(
                "INSERT INTO users (username, password_digest, first_name, last_name, rights) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING user_id, username, password_digest, first_name, last_name, rights, created_at",
            )
            .bind(username)
            .bind(password_digest)
            .bind(first_name)
            .bind(last_name)
            .bind(rights)
            .fetch_one(pool),
        )
        .await
    }

    /// All rows matching (username, digest) exactly. The login handler treats
    /// anything other than exactly one match as incorrect credentials.
    pub async fn find_by_credentials(
        pool: &PgPool,
        username: &str,
        password_digest: &str,
    ) -> Result<Vec<UserRow>> {
        call::read("find user by credentials", || {
            sqlx::query_as::<_, UserRow>(
                "SELECT user_id, username, password_digest, first_name, last_name, rights, created_at \
                 FROM users WHERE username = $1 AND password_digest = $2",
            )
            .bind(username)
            .bind(password_digest)
            .fetch_all(pool)
        })
        .await
    }

    pub async fn get_by_id(pool: &PgPool, user_id: i64) -> Result<Option<UserRow>> {
        call::read("get user by id", || {
            sqlx::query_as::<_, UserRow>(
                "SELECT user_id, username, password_digest, first_name, last_name, rights, created_at \
                 FROM users WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(pool)
        })
        .await
    }

    pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRow>> {
        call::read("get user by username", || {
            sqlx::query_as::<_, UserRow>(
                "SELECT user_id, username, password_digest, first_name, last_name, rights, created_at \
                 FROM users WHERE username = $1",
            )
            .bind(username)
            .fetch_optional(pool)
        })
        .await
    }

    /// Update first and last name by id. Username, digest, and rights are
    /// immutable through this statement. Returns the number of rows affected.
    pub async fn update_name(
        pool: &PgPool,
        user_id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<u64> {
        call::write("update user name", async {
            sqlx::query("UPDATE users SET first_name = $2, last_name = $3 WHERE user_id = $1")
                .bind(user_id)
                .bind(first_name)
                .bind(last_name)
                .execute(pool)
                .await
                .map(|result| result.rows_affected())
        })
        .await
    }

    /// Delete by id. Returns the number of rows affected.
    pub async fn delete(pool: &PgPool, user_id: i64) -> Result<u64> {
        call::write("delete user", async {
            sqlx::query("DELETE FROM users WHERE user_id = $1")
                .bind(user_id)
                .execute(pool)
                .await
                .map(|result| result.rows_affected())
        })
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<UserRow>> {
        call::read("list users", || {
            sqlx::query_as::<_, UserRow>(
                "SELECT user_id, username, password_digest, first_name, last_name, rights, created_at \
                 FROM users ORDER BY user_id",
            )
            .fetch_all(pool)
        })
        .await
    }
}
