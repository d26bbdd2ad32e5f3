use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::entries::models::Entry;
use crate::entries::repositories::EntryRepository;
use verda_common::error::{VerdaError, VerdaResult};

#[derive(Clone)]
pub struct PgEntryRepository {
    pool: PgPool,
}

impl PgEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_entry_row(row: &sqlx::postgres::PgRow) -> Entry {
    Entry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        category: row.get("category"),
        details: row.get("details"),
        emissions_kgco2: row.get("emissions_kgco2"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn create(&self, entry: Entry) -> VerdaResult<Entry> {
        let row = sqlx::query(
            "insert into entries
             (id, user_id, category, details, emissions_kgco2, created_at)
             values ($1, $2, $3, $4, $5, $6)
             returning id, user_id, category, details, emissions_kgco2, created_at",
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.category)
        .bind(&entry.details)
        .bind(entry.emissions_kgco2)
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(map_entry_row(&row))
    }

    async fn list_for_user(&self, user_id: Uuid) -> VerdaResult<Vec<Entry>> {
        let rows = sqlx::query(
            "select id, user_id, category, details, emissions_kgco2, created_at
             from entries
             where user_id = $1
             order by created_at desc",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(rows.iter().map(map_entry_row).collect())
    }

    async fn list_all(&self) -> VerdaResult<Vec<Entry>> {
        let rows = sqlx::query(
            "select id, user_id, category, details, emissions_kgco2, created_at
             from entries
             order by created_at desc",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(rows.iter().map(map_entry_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::models::User;
    use crate::users::pg_repository::PgUserRepository;
    use crate::users::repositories::UserRepository;
    use crate::{create_pool, ensure_schema};
    use chrono::{Duration, Utc};
    use serde_json::json;

    async fn test_repos() -> Option<(PgEntryRepository, PgUserRepository)> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("db should connect");
        ensure_schema(&pool).await.expect("schema");
        Some((
            PgEntryRepository::new(pool.clone()),
            PgUserRepository::new(pool),
        ))
    }

    async fn insert_user(users: &PgUserRepository) -> Uuid {
        let id = Uuid::new_v4();
        users
            .create(User {
                id,
                first_name: "Entry".to_owned(),
                last_name: "Owner".to_owned(),
                email: format!("{id}@example.com"),
                password_hash: "hash".to_owned(),
                token: None,
                created_at: Utc::now(),
            })
            .await
            .expect("insert user");
        id
    }

    fn make_entry(user_id: Uuid, category: &str, kgco2: f64) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            user_id,
            category: category.to_owned(),
            details: json!({"vehicle_type": "bus", "km": 50}),
            emissions_kgco2: kgco2,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_round_trips_details_json() {
        let (entries, users) = match test_repos().await {
            Some(r) => r,
            None => return,
        };
        let user_id = insert_user(&users).await;

        let saved = entries
            .create(make_entry(user_id, "transport", 5.25))
            .await
            .expect("create");
        assert_eq!(saved.details["vehicle_type"], "bus");
        assert!((saved.emissions_kgco2 - 5.25).abs() < 1e-9);
    }

    #[tokio::test]
    async fn list_for_user_is_newest_first_and_scoped() {
        let (entries, users) = match test_repos().await {
            Some(r) => r,
            None => return,
        };
        let user_a = insert_user(&users).await;
        let user_b = insert_user(&users).await;

        let mut older = make_entry(user_a, "waste", 1.0);
        older.created_at = Utc::now() - Duration::hours(2);
        entries.create(older).await.expect("older");
        entries
            .create(make_entry(user_a, "electricity", 2.0))
            .await
            .expect("newer");
        entries
            .create(make_entry(user_b, "transport", 9.0))
            .await
            .expect("other user");

        let listed = entries.list_for_user(user_a).await.expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].category, "electricity");
        assert_eq!(listed[1].category, "waste");
        assert!(listed.iter().all(|e| e.user_id == user_a));
    }

    #[tokio::test]
    async fn list_for_unknown_user_is_empty() {
        let (entries, _users) = match test_repos().await {
            Some(r) => r,
            None => return,
        };
        let listed = entries.list_for_user(Uuid::new_v4()).await.expect("list");
        assert!(listed.is_empty());
    }
}
