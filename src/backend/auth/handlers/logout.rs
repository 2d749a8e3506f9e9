/**
 * Logout Handler
 *
 * Clears the session cookie. Tokens are stateless, so this is purely
 * client-side removal; an already-issued token stays valid until it expires.
 */
use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    Json,
};

use crate::backend::auth::gate::clear_session_cookie;
use crate::backend::auth::handlers::types::AckResponse;
use crate::backend::server::state::AppState;

/// Logout handler
///
/// Always succeeds, with or without a current session.
pub async fn logout(State(app_state): State<AppState>) -> impl IntoResponse {
    tracing::info!("[Auth] Logout, clearing session cookie");
    (
        AppendHeaders([(
            SET_COOKIE,
            clear_session_cookie(app_state.config.secure_cookies),
        )]),
        Json(AckResponse::ok()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let state = AppState::for_tests();
        let response = logout(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(cookie.starts_with("stagelink_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
