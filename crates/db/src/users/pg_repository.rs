use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::users::models::User;
use crate::users::repositories::UserRepository;
use verda_common::error::{VerdaError, VerdaResult};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_user_row(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        token: row.get("token"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> VerdaResult<User> {
        let row = sqlx::query(
            "insert into users
             (id, first_name, last_name, email, password_hash, token, created_at)
             values ($1, $2, $3, $4, $5, $6, $7)
             returning id, first_name, last_name, email, password_hash, token, created_at",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.token)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(map_user_row(&row))
    }

    async fn get_by_id(&self, id: Uuid) -> VerdaResult<Option<User>> {
        let row = sqlx::query(
            "select id, first_name, last_name, email, password_hash, token, created_at
             from users
             where id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(row.as_ref().map(map_user_row))
    }

    async fn get_by_email(&self, email: &str) -> VerdaResult<Option<User>> {
        let row = sqlx::query(
            "select id, first_name, last_name, email, password_hash, token, created_at
             from users
             where email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(row.as_ref().map(map_user_row))
    }

    async fn get_by_token(&self, token: &str) -> VerdaResult<Option<User>> {
        let row = sqlx::query(
            "select id, first_name, last_name, email, password_hash, token, created_at
             from users
             where token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(row.as_ref().map(map_user_row))
    }

    async fn set_token(&self, id: Uuid, token: &str) -> VerdaResult<()> {
        let result = sqlx::query("update users set token = $2 where id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| VerdaError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(VerdaError::NotFound(format!("user {id} not found")));
        }
        Ok(())
    }

    async fn list(&self) -> VerdaResult<Vec<User>> {
        let rows = sqlx::query(
            "select id, first_name, last_name, email, password_hash, token, created_at
             from users
             order by created_at asc",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(rows.iter().map(map_user_row).collect())
    }
}
