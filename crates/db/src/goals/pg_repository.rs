use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::goals::models::{Goal, GoalType};
use crate::goals::repositories::GoalRepository;
use verda_common::error::{VerdaError, VerdaResult};

#[derive(Clone)]
pub struct PgGoalRepository {
    pool: PgPool,
}

impl PgGoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_goal_row(row: &sqlx::postgres::PgRow) -> VerdaResult<Goal> {
    let goal_type: String = row.get("goal_type");
    let goal_type = GoalType::from_str(&goal_type).map_err(VerdaError::Database)?;

    Ok(Goal {
        id: row.get("id"),
        user_id: row.get("user_id"),
        goal_type,
        params: row.get("params"),
        created_at: row.get("created_at"),
    })
}

#[async_trait]
impl GoalRepository for PgGoalRepository {
    async fn create(&self, goal: Goal) -> VerdaResult<Goal> {
        let row = sqlx::query(
            "insert into goals
             (id, user_id, goal_type, params, created_at)
             values ($1, $2, $3, $4, $5)
             returning id, user_id, goal_type, params, created_at",
        )
        .bind(goal.id)
        .bind(goal.user_id)
        .bind(goal.goal_type.as_str())
        .bind(&goal.params)
        .bind(goal.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        map_goal_row(&row)
    }

    async fn list_for_user(&self, user_id: Uuid) -> VerdaResult<Vec<Goal>> {
        let rows = sqlx::query(
            "select id, user_id, goal_type, params, created_at
             from goals
             where user_id = $1
             order by created_at desc",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        rows.iter().map(map_goal_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::models::User;
    use crate::users::pg_repository::PgUserRepository;
    use crate::users::repositories::UserRepository;
    use crate::{create_pool, ensure_schema};
    use chrono::Utc;
    use serde_json::json;

    async fn test_repos() -> Option<(PgGoalRepository, PgUserRepository)> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = create_pool(&url).await.expect("db should connect");
        ensure_schema(&pool).await.expect("schema");
        Some((
            PgGoalRepository::new(pool.clone()),
            PgUserRepository::new(pool),
        ))
    }

    async fn insert_user(users: &PgUserRepository) -> Uuid {
        let id = Uuid::new_v4();
        users
            .create(User {
                id,
                first_name: "Goal".to_owned(),
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

    #[tokio::test]
    async fn create_and_list_goals() {
        let (goals, users) = match test_repos().await {
            Some(r) => r,
            None => return,
        };
        let user_id = insert_user(&users).await;

        goals
            .create(Goal {
                id: Uuid::new_v4(),
                user_id,
                goal_type: GoalType::ReducePercent,
                params: json!({"percent": 10}),
                created_at: Utc::now(),
            })
            .await
            .expect("create");

        let listed = goals.list_for_user(user_id).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].goal_type, GoalType::ReducePercent);
        assert_eq!(listed[0].params["percent"], 10);
    }
}
