use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use verda_estimation::DetectionDetail;

#[derive(Debug, Serialize)]
pub struct PhotoUploadResponse {
    pub photo_id: Uuid,
    pub estimated_kgco2: f64,
    pub detection_details: Vec<DetectionDetail>,
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub filename: String,
    pub detections: serde_json::Value,
    pub estimated_kgco2: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListPhotosResponse {
    pub data: Vec<PhotoResponse>,
    pub count: usize,
}
