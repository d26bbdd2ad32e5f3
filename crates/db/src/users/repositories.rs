use async_trait::async_trait;
use uuid::Uuid;

use crate::users::models::User;
use verda_common::error::VerdaResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> VerdaResult<User>;
    async fn get_by_id(&self, id: Uuid) -> VerdaResult<Option<User>>;
    async fn get_by_email(&self, email: &str) -> VerdaResult<Option<User>>;
    async fn get_by_token(&self, token: &str) -> VerdaResult<Option<User>>;

    /// Replace the user's session token.
    async fn set_token(&self, id: Uuid, token: &str) -> VerdaResult<()>;

    /// All known users, for leaderboard assembly.
    async fn list(&self) -> VerdaResult<Vec<User>>;
}
