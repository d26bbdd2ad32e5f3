use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use verda_common::error::VerdaError;
use verda_db::entries::models::Entry;
use verda_db::entries::repositories::EntryRepository;
use verda_db::photos::models::Photo;
use verda_db::photos::repositories::PhotoRepository;
use verda_estimation::{estimate_from_detections, Detection};

use crate::error::ApiError;
use crate::extractors::{require_user, AuthToken};
use crate::photos::responses::{ListPhotosResponse, PhotoResponse, PhotoUploadResponse};
use crate::AppState;

/// Stand-in detection when the vision call fails or finds nothing; keeps
/// the photo flow alive with a zero estimate.
fn fallback_detections() -> Vec<Detection> {
    vec![Detection {
        label: "unknown".to_string(),
        confidence: 0.0,
    }]
}

/// Upload a photo (multipart field `file`), run label detection, estimate
/// emissions from the detected labels, and record both the photo and a
/// `photo-analysis` activity entry.
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
    mut multipart: Multipart,
) -> Result<Json<PhotoUploadResponse>, ApiError> {
    let user = require_user(&state, &token).await?;

    let mut upload: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| VerdaError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("upload.jpg").to_string();
            let content_type = field.content_type().unwrap_or("image/jpeg").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| VerdaError::Validation(format!("failed to read file field: {e}")))?
                .to_vec();
            upload = Some((original_name, content_type, bytes));
        }
    }

    let (original_name, content_type, bytes) = upload
        .ok_or_else(|| VerdaError::Validation("missing multipart field: file".to_string()))?;
    if bytes.is_empty() {
        return Err(VerdaError::Validation("uploaded file is empty".to_string()).into());
    }

    let stored_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(&original_name));
    tokio::fs::create_dir_all(&state.upload_dir)
        .await
        .map_err(|e| VerdaError::Internal(format!("failed to create upload dir: {e}")))?;
    tokio::fs::write(state.upload_dir.join(&stored_name), &bytes)
        .await
        .map_err(|e| VerdaError::Internal(format!("failed to store upload: {e}")))?;

    let detections = match &state.gemini {
        Some(client) => match client.detect_labels(&bytes, &content_type).await {
            Ok(found) if !found.is_empty() => found,
            Ok(_) => fallback_detections(),
            Err(e) => {
                tracing::warn!(error = %e, "vision call failed, using fallback detection");
                fallback_detections()
            }
        },
        None => fallback_detections(),
    };

    let (estimated_total, detection_details) =
        estimate_from_detections(&state.estimation, &detections);

    let photo = state
        .photo_repo
        .create(Photo {
            id: Uuid::new_v4(),
            user_id: user.id,
            filename: stored_name.clone(),
            detections: serde_json::to_value(&detections).unwrap_or_default(),
            estimated_kgco2: estimated_total,
            created_at: Utc::now(),
        })
        .await?;

    // The analysis also lands in the activity log
    state
        .entry_repo
        .create(Entry {
            id: Uuid::new_v4(),
            user_id: user.id,
            category: "photo-analysis".to_string(),
            details: json!({
                "file": stored_name,
                "detection_details": detection_details,
            }),
            emissions_kgco2: estimated_total,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(
        photo_id = %photo.id,
        detections = detections.len(),
        estimated_kgco2 = estimated_total,
        "photo analyzed"
    );

    Ok(Json(PhotoUploadResponse {
        photo_id: photo.id,
        estimated_kgco2: estimated_total,
        detection_details,
    }))
}

pub async fn list_photos(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
) -> Result<Json<ListPhotosResponse>, ApiError> {
    let user = require_user(&state, &token).await?;

    let photos = state.photo_repo.list_for_user(user.id).await?;
    let data: Vec<PhotoResponse> = photos
        .into_iter()
        .map(|p| PhotoResponse {
            id: p.id,
            filename: p.filename,
            detections: p.detections,
            estimated_kgco2: p.estimated_kgco2,
            created_at: p.created_at,
        })
        .collect();
    let count = data.len();

    Ok(Json(ListPhotosResponse { data, count }))
}

/// Keep only a safe basename: path separators and oddball characters
/// would otherwise end up in filesystem paths.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("upload");
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
