use async_trait::async_trait;
use uuid::Uuid;

use crate::goals::models::Goal;
use verda_common::error::VerdaResult;

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn create(&self, goal: Goal) -> VerdaResult<Goal>;

    /// A user's goals, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> VerdaResult<Vec<Goal>>;
}
