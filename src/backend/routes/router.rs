/**
 * Router Configuration
 *
 * Assembles the application router: the show WebSocket, the REST API, the
 * static file service and the 404 fallback, with the access gate layered
 * over all of them.
 *
 * # Route Order
 *
 * 1. WebSocket route (`/ws/shows/{show_id}`)
 * 2. API routes (auth, shows, artists)
 * 3. Static files under `/static`
 * 4. Fallback handler (404)
 *
 * The gate middleware runs before any of them and decides per path class
 * whether to redirect, pass through, or leave the check to the handler.
 */
use axum::{http::StatusCode, middleware, Router};
use tower_http::services::ServeDir;

use crate::backend::auth::access_gate;
use crate::backend::realtime::show_socket;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/**
 * Create the Axum router with all routes configured
 *
 * # Arguments
 *
 * * `app_state` - Application state shared by every handler
 *
 * # Returns
 *
 * Configured Axum Router ready to serve requests
 */
pub fn create_router(app_state: AppState) -> Router {
    // Show WebSocket first, then the REST surface
    let router = Router::new().route(
        "/ws/shows/{show_id}",
        axum::routing::get(show_socket),
    );

    let router = configure_api_routes(router);

    // Static assets (allow-listed in the gate)
    let router = router.nest_service("/static", ServeDir::new("static"));

    // Fallback handler for unknown paths
    let router = router.fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") });

    // The gate sees every request, including static files and the fallback
    router
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            access_gate,
        ))
        .with_state(app_state)
}
