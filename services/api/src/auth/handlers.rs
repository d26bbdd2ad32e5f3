use axum::extract::State;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use verda_common::error::VerdaError;
use verda_db::users::models::User;
use verda_db::users::repositories::UserRepository;

use crate::auth::requests::{LoginRequest, SignupRequest};
use crate::auth::responses::TokenResponse;
use crate::error::ApiError;
use crate::AppState;

fn validate_email(email: &str) -> Result<(), VerdaError> {
    if !email.contains('@') || !email.contains('.') {
        return Err(VerdaError::Validation(format!(
            "invalid email format: {email}"
        )));
    }
    Ok(())
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn to_token_response(user: &User, token: String) -> TokenResponse {
    TokenResponse {
        token,
        user_id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    validate_email(&payload.email)?;
    if payload.password.is_empty() {
        return Err(VerdaError::Validation("password must not be empty".to_string()).into());
    }

    if state
        .user_repo
        .get_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(VerdaError::Validation("email already registered".to_string()).into());
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| VerdaError::Internal(format!("password hashing failed: {e}")))?;

    let token = new_token();
    let user = state
        .user_repo
        .create(User {
            id: Uuid::new_v4(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password_hash,
            token: Some(token.clone()),
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(user_id = %user.id, "user signed up");
    Ok(Json(to_token_response(&user, token)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .user_repo
        .get_by_email(&payload.email)
        .await?
        .ok_or_else(|| VerdaError::Unauthorized("invalid credentials".to_string()))?;

    let verified = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|e| VerdaError::Internal(format!("password verification failed: {e}")))?;
    if !verified {
        return Err(VerdaError::Unauthorized("invalid credentials".to_string()).into());
    }

    // Rotate the session token on every login
    let token = new_token();
    state.user_repo.set_token(user.id, &token).await?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(to_token_response(&user, token)))
}
