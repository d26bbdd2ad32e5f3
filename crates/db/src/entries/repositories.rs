use async_trait::async_trait;
use uuid::Uuid;

use crate::entries::models::Entry;
use verda_common::error::VerdaResult;

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn create(&self, entry: Entry) -> VerdaResult<Entry>;

    /// A user's entries, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> VerdaResult<Vec<Entry>>;

    /// Every entry in the system, for leaderboard assembly.
    async fn list_all(&self) -> VerdaResult<Vec<Entry>>;
}
