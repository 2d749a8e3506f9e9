/**
 * API Route Wiring
 *
 * This module defines route handlers for API endpoints, including:
 * - Authentication endpoints (login, logout, current session)
 * - Show endpoints (index, metadata, running order, alerts)
 * - Artist endpoints (roster, profiles)
 *
 * Handlers authenticate through the `AuthSession` extractor, so every
 * route here answers 401 JSON on a missing or invalid session rather
 * than redirecting.
 */
use axum::Router;

use crate::backend::artists::{get_artist, list_artists, put_artist};
use crate::backend::auth::{get_me, login, logout};
use crate::backend::server::state::AppState;
use crate::backend::shows::alerts::{alert_history, clear_alert, get_alert, put_alert};
use crate::backend::shows::running_order::{get_running_order, put_running_order};
use crate::backend::shows::{get_show, list_shows, put_show};

/**
 * Configure API routes
 *
 * # Arguments
 *
 * * `router` - The router to add routes to
 *
 * # Returns
 *
 * Router with API routes configured
 */
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/api/auth/login", axum::routing::post(login))
        .route("/api/auth/logout", axum::routing::post(logout))
        .route("/api/auth/me", axum::routing::get(get_me))
        // Show endpoints
        .route("/api/shows", axum::routing::get(list_shows))
        .route(
            "/api/shows/{show_id}",
            axum::routing::get(get_show).put(put_show),
        )
        .route(
            "/api/shows/{show_id}/running-order",
            axum::routing::get(get_running_order).put(put_running_order),
        )
        .route(
            "/api/shows/{show_id}/alert",
            axum::routing::get(get_alert)
                .put(put_alert)
                .delete(clear_alert),
        )
        .route(
            "/api/shows/{show_id}/alert/history",
            axum::routing::get(alert_history),
        )
        // Artist endpoints
        .route("/api/artists", axum::routing::get(list_artists))
        .route(
            "/api/artists/{artist_id}",
            axum::routing::get(get_artist).put(put_artist),
        )
}
