use std::sync::{Arc, OnceLock};

use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use chrono::Utc;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{DataApiClient, StoreError};
use shared_models::account::{AccountType, UserAccount};
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;
use shared_utils::password::{hash_password, verify_password};

use crate::models::{LoginRequest, LoginUser, SignupRequest};

const USERS: &str = "users";
const DOCTORS: &str = "doctors";
const PATIENTS: &str = "patients";

fn store_error(e: StoreError) -> AppError {
    match e {
        StoreError::Transport(inner) => AppError::ExternalService(inner.to_string()),
        other => AppError::Database(other.to_string()),
    }
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

#[axum::debug_handler]
pub async fn signup(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if !is_valid_email(&request.email) {
        return Err(AppError::ValidationError(
            "Email address is not valid".to_string(),
        ));
    }
    if request.password.len() < 8 {
        return Err(AppError::ValidationError(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let store = DataApiClient::new(&state);

    let existing = store
        .find_one(USERS, json!({ "email": request.email }))
        .await
        .map_err(store_error)?;
    if existing.is_some() {
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    let password_hash = hash_password(&request.password).map_err(AppError::Internal)?;

    let user_id = Uuid::new_v4();
    store
        .insert_one(
            USERS,
            json!({
                "_id": user_id,
                "firstName": request.first_name,
                "lastName": request.last_name,
                "email": request.email,
                "contactNumber": request.contact_number,
                "passwordHash": password_hash,
                "accountType": request.account_type,
                "createdAt": Utc::now().to_rfc3339(),
            }),
        )
        .await
        .map_err(store_error)?;

    // Role profile alongside the account. Doctors start with the stock
    // Monday-Friday 09:00-17:00 schedule until they update their profile.
    match request.account_type {
        AccountType::Doctor => {
            store
                .insert_one(
                    DOCTORS,
                    json!({
                        "_id": Uuid::new_v4(),
                        "user": user_id,
                        "degrees": [],
                        "availableDays": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"],
                        "availableTimeSlot": { "start": "09:00", "end": "17:00" },
                        "createdAt": Utc::now().to_rfc3339(),
                    }),
                )
                .await
                .map_err(store_error)?;
        }
        AccountType::Patient => {
            store
                .insert_one(
                    PATIENTS,
                    json!({
                        "_id": Uuid::new_v4(),
                        "user": user_id,
                        "createdAt": Utc::now().to_rfc3339(),
                    }),
                )
                .await
                .map_err(store_error)?;
        }
        AccountType::Admin => {}
    }

    info!("Registered new {} account {}", request.account_type, user_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully"
        })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    if !is_valid_email(&request.email) {
        return Err(AppError::ValidationError(
            "Email address is not valid".to_string(),
        ));
    }

    let store = DataApiClient::new(&state);

    let document = store
        .find_one(USERS, json!({ "email": request.email }))
        .await
        .map_err(store_error)?
        .ok_or_else(|| {
            AppError::BadRequest("Invalid credentials: User does not exist".to_string())
        })?;

    let user: UserAccount = serde_json::from_value(document)
        .map_err(|e| AppError::Database(format!("Failed to parse user: {}", e)))?;

    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Internal("User record has no password hash".to_string()))?;

    if !verify_password(&request.password, stored_hash) {
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    }

    let token = issue_token(&user, &state.jwt_secret).map_err(AppError::Internal)?;

    // Role profile for the dashboard, mirroring the account type.
    let profile_collection = match user.account_type {
        AccountType::Doctor => Some(DOCTORS),
        AccountType::Patient => Some(PATIENTS),
        AccountType::Admin => None,
    };
    let profile = match profile_collection {
        Some(collection) => store
            .find_one(collection, json!({ "user": user.id }))
            .await
            .map_err(store_error)?,
        None => None,
    };

    debug!("Login successful for user {}", user.id);

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "user": LoginUser::from(&user),
        "profile": profile,
        "token": token,
    })))
}

#[axum::debug_handler]
pub async fn logout(
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    // Tokens are stateless; the client discards its copy.
    debug!("Logout acknowledged for user {}", user.id);

    Ok(Json(json!({
        "success": true,
        "message": "User has been logged out successfully!"
    })))
}

#[cfg(test)]
mod tests {
    use super::is_valid_email;

    #[test]
    fn email_validation_is_stable_across_calls() {
        // The compiled pattern is shared; repeated calls must agree.
        for _ in 0..3 {
            assert!(is_valid_email("asha@example.com"));
            assert!(!is_valid_email("not-an-email"));
            assert!(!is_valid_email("spaced out@example.com"));
        }
    }
}
