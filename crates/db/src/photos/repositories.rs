use async_trait::async_trait;
use uuid::Uuid;

use crate::photos::models::Photo;
use verda_common::error::VerdaResult;

#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn create(&self, photo: Photo) -> VerdaResult<Photo>;

    /// A user's photos, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> VerdaResult<Vec<Photo>>;
}
