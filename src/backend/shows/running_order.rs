/**
 * Running Order Handlers
 *
 * The running order is one document per show, an array of performance
 * slots in stage order. A PUT replaces the whole array; there is no
 * per-slot patching, so the last writer wins and every connected client
 * converges on the same full snapshot.
 */
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::backend::auth::AuthSession;
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::backend::shows::{is_valid_show_id, running_order_key};

/// Most slots a single show will realistically carry
const MAX_SLOTS: usize = 200;

/// GET /api/shows/{show_id}/running-order - the current order
pub async fn get_running_order(
    _session: AuthSession,
    State(app_state): State<AppState>,
    Path(show_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_show_id(&show_id) {
        return Err(ApiError::bad_request("Invalid show id"));
    }
    let order = app_state
        .store
        .read_or(&running_order_key(&show_id), json!([]))
        .await?;
    Ok(Json(order))
}

/**
 * PUT /api/shows/{show_id}/running-order - replace the whole order
 *
 * Broadcasts `running_order_update` with the full new order to the show's
 * connections after the write lands.
 *
 * # Errors
 *
 * * `400 Bad Request` - invalid show id, a body that is not an array, or
 *   more than the slot ceiling
 */
pub async fn put_running_order(
    session: AuthSession,
    State(app_state): State<AppState>,
    Path(show_id): Path<String>,
    Json(order): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_show_id(&show_id) {
        return Err(ApiError::bad_request("Invalid show id"));
    }
    let Some(slots) = order.as_array() else {
        return Err(ApiError::bad_request("Running order must be an array"));
    };
    if slots.len() > MAX_SLOTS {
        tracing::warn!(
            "[Shows] Rejected running order for {} with {} slots",
            show_id,
            slots.len()
        );
        return Err(ApiError::bad_request("Running order too long"));
    }

    app_state
        .store
        .write(&running_order_key(&show_id), &order)
        .await?;
    tracing::info!(
        "[Shows] {} set running order for {} ({} slots)",
        session.name,
        show_id,
        slots.len()
    );
    app_state
        .notifier
        .publish(&show_id, "running_order_update", order.clone());

    Ok(Json(order))
}
