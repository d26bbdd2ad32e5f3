use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::photos::models::Photo;
use crate::photos::repositories::PhotoRepository;
use verda_common::error::{VerdaError, VerdaResult};

#[derive(Clone)]
pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_photo_row(row: &sqlx::postgres::PgRow) -> Photo {
    Photo {
        id: row.get("id"),
        user_id: row.get("user_id"),
        filename: row.get("filename"),
        detections: row.get("detections"),
        estimated_kgco2: row.get("estimated_kgco2"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn create(&self, photo: Photo) -> VerdaResult<Photo> {
        let row = sqlx::query(
            "insert into photos
             (id, user_id, filename, detections, estimated_kgco2, created_at)
             values ($1, $2, $3, $4, $5, $6)
             returning id, user_id, filename, detections, estimated_kgco2, created_at",
        )
        .bind(photo.id)
        .bind(photo.user_id)
        .bind(&photo.filename)
        .bind(&photo.detections)
        .bind(photo.estimated_kgco2)
        .bind(photo.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(map_photo_row(&row))
    }

    async fn list_for_user(&self, user_id: Uuid) -> VerdaResult<Vec<Photo>> {
        let rows = sqlx::query(
            "select id, user_id, filename, detections, estimated_kgco2, created_at
             from photos
             where user_id = $1
             order by created_at desc",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VerdaError::Database(e.to_string()))?;

        Ok(rows.iter().map(map_photo_row).collect())
    }
}
