pub mod entries;
pub mod goals;
pub mod photos;
pub mod users;

use verda_common::error::{VerdaError, VerdaResult};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create a Postgres connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> VerdaResult<PgPool> {
    tracing::info!("connecting to database");
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))
}

/// Create the tables the tracker needs if they do not exist yet.
/// Ran at service startup; statements are idempotent.
pub async fn ensure_schema(pool: &PgPool) -> VerdaResult<()> {
    let statements = [
        "create table if not exists users (
           id uuid primary key,
           first_name text not null,
           last_name text not null,
           email text not null unique,
           password_hash text not null,
           token text,
           created_at timestamptz not null default now()
         )",
        "create index if not exists users_token_idx on users(token)",
        "create table if not exists entries (
           id uuid primary key,
           user_id uuid not null references users(id),
           category text not null,
           details jsonb not null default '{}'::jsonb,
           emissions_kgco2 double precision not null default 0.0,
           created_at timestamptz not null default now()
         )",
        "create index if not exists entries_user_created_idx
           on entries(user_id, created_at desc)",
        "create index if not exists entries_created_idx on entries(created_at)",
        "create table if not exists photos (
           id uuid primary key,
           user_id uuid not null references users(id),
           filename text not null,
           detections jsonb not null default '[]'::jsonb,
           estimated_kgco2 double precision not null default 0.0,
           created_at timestamptz not null default now()
         )",
        "create index if not exists photos_user_created_idx
           on photos(user_id, created_at desc)",
        "create table if not exists goals (
           id uuid primary key,
           user_id uuid not null references users(id),
           goal_type text not null,
           params jsonb not null default '{}'::jsonb,
           created_at timestamptz not null default now()
         )",
        "create index if not exists goals_user_created_idx
           on goals(user_id, created_at desc)",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| VerdaError::Database(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_pool_fails_with_invalid_url() {
        let result = create_pool("postgres://invalid:5432/nonexistent").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let url = match std::env::var("TEST_DATABASE_URL") {
            Ok(u) => u,
            Err(_) => return,
        };
        let pool = create_pool(&url).await.expect("db should connect");
        ensure_schema(&pool).await.expect("first run");
        ensure_schema(&pool).await.expect("second run");
    }
}
