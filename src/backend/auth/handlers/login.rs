/**
 * Login Handler
 *
 * This handler processes login requests:
 * 1. Look up the staff member in the directory document
 * 2. Verify the access key using bcrypt
 * 3. Issue a session token and install it as the session cookie
 *
 * # Security
 *
 * - Unknown usernames and wrong access keys answer with the same 401
 * - Access keys are never logged or echoed
 */
use axum::{
    extract::{Json, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
};

use crate::backend::auth::gate::session_cookie;
use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::staff::{find_by_username, verify_access_key};
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Arguments
///
/// * `State(app_state)` - Application state (store, token service, config)
/// * `Json(request)` - Login request with username and access key
///
/// # Returns
///
/// 200 with a `Set-Cookie` header and the token + profile in the body
///
/// # Errors
///
/// * `401 Unauthorized` - Unknown username or wrong access key
/// * `503 Service Unavailable` - Staff directory unreadable
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("[Auth] Login request for: {}", request.username);

    let record = find_by_username(app_state.store.as_ref(), &request.username)
        .await?
        .ok_or_else(|| {
            tracing::warn!("[Auth] Unknown staff username: {}", request.username);
            ApiError::unauthorized("Invalid credentials")
        })?;

    if !verify_access_key(&record, &request.access_key) {
        tracing::warn!("[Auth] Wrong access key for: {}", request.username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let staff = record.profile();
    let token = app_state.tokens.issue_default(&staff)?;
    let cookie = session_cookie(&token, app_state.config.secure_cookies);

    tracing::info!("[Auth] Logged in: {} ({})", record.username, staff.role);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse { token, staff }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::staff::{StaffRecord, STAFF_DIRECTORY_KEY};
    use crate::backend::server::state::AppState;
    use crate::backend::store::{DocumentStore, MemoryStore};
    use crate::shared::roles::Role;
    use axum::http::StatusCode;
    use uuid::Uuid;

    async fn state_with_staff() -> AppState {
        let state = AppState::for_tests();
        let record = StaffRecord {
            id: Uuid::new_v4(),
            username: "mara".to_string(),
            name: "Mara Voss".to_string(),
            role: Role::Coordinator,
            access_key_hash: bcrypt::hash("backstage-pass", 4).unwrap(),
        };
        state
            .store
            .write(
                STAFF_DIRECTORY_KEY,
                &serde_json::to_value(vec![record]).unwrap(),
            )
            .await
            .unwrap();
        state
    }

    #[tokio::test]
    async fn test_login_sets_cookie() {
        let state = state_with_staff().await;
        let response = login(
            State(state),
            Json(LoginRequest {
                username: "mara".to_string(),
                access_key: "backstage-pass".to_string(),
            }),
        )
        .await
        .unwrap()
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("stagelink_session="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_wrong_key_and_unknown_user_answer_identically() {
        let state = state_with_staff().await;

        let wrong_key = login(
            State(state.clone()),
            Json(LoginRequest {
                username: "mara".to_string(),
                access_key: "nope".to_string(),
            }),
        )
        .await
        .map(|_| ())
        .unwrap_err();

        let unknown = login(
            State(state),
            Json(LoginRequest {
                username: "ghost".to_string(),
                access_key: "nope".to_string(),
            }),
        )
        .await
        .map(|_| ())
        .unwrap_err();

        assert_eq!(wrong_key.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_key.message(), unknown.message());
    }

    #[tokio::test]
    async fn test_unreadable_directory_is_503() {
        let store = std::sync::Arc::new(MemoryStore::new());
        store.set_unavailable(true);
        let state = AppState::for_tests_with_store(store);

        let err = login(
            State(state),
            Json(LoginRequest {
                username: "mara".to_string(),
                access_key: "backstage-pass".to_string(),
            }),
        )
        .await
        .map(|_| ())
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
