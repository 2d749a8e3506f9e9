/**
 * Emergency Alert Handlers
 *
 * One active alert per show at `shows/<id>/alerts/active.json`; `null`
 * means all clear. Raising replaces the document, clearing writes `null`
 * back, and both append a history entry under `shows/<id>/alerts/log/`.
 *
 * # History Is Best-Effort
 *
 * An alert must reach the crew even when the log cannot be written: a
 * failed history append is logged and the operation still succeeds. The
 * active document is the authoritative state.
 */
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::backend::auth::AuthSession;
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::backend::shows::{active_alert_key, alert_log_key, alert_log_prefix, is_valid_show_id};

/// Longest accepted alert message
const MAX_MESSAGE_LENGTH: usize = 500;

/// GET /api/shows/{show_id}/alert - the active alert, or null
pub async fn get_alert(
    _session: AuthSession,
    State(app_state): State<AppState>,
    Path(show_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_show_id(&show_id) {
        return Err(ApiError::bad_request("Invalid show id"));
    }
    let alert = app_state
        .store
        .read_or(&active_alert_key(&show_id), Value::Null)
        .await?;
    Ok(Json(alert))
}

/**
 * PUT /api/shows/{show_id}/alert - raise or replace the active alert
 *
 * The stored alert is stamped with who raised it and when. Clients on the
 * show's scope receive `alert_update` with the full alert.
 *
 * # Errors
 *
 * * `400 Bad Request` - invalid show id, or a body without a usable
 *   `message`
 */
pub async fn put_alert(
    session: AuthSession,
    State(app_state): State<AppState>,
    Path(show_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_show_id(&show_id) {
        return Err(ApiError::bad_request("Invalid show id"));
    }
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty() && message.len() <= MAX_MESSAGE_LENGTH);
    let Some(message) = message else {
        tracing::warn!("[Alerts] Rejected alert for {} without a usable message", show_id);
        return Err(ApiError::bad_request("Alert needs a non-empty message"));
    };

    let alert = json!({
        "id": Uuid::new_v4(),
        "message": message,
        "severity": body.get("severity").cloned().unwrap_or(json!("critical")),
        "raised_by": session.name,
        "raised_at": Utc::now().to_rfc3339(),
    });

    app_state
        .store
        .write(&active_alert_key(&show_id), &alert)
        .await?;
    tracing::warn!("[Alerts] {} raised alert on {}: {}", session.name, show_id, message);

    append_history(&app_state, &show_id, &alert).await;
    app_state
        .notifier
        .publish(&show_id, "alert_update", alert.clone());

    Ok(Json(alert))
}

/**
 * DELETE /api/shows/{show_id}/alert - clear the active alert
 *
 * Writes `null` back to the active document (the store has no delete) and
 * broadcasts `alert_cleared`. Clearing an already-clear show is a no-op
 * that still answers 200, so two staff members can both hit "all clear".
 */
pub async fn clear_alert(
    session: AuthSession,
    State(app_state): State<AppState>,
    Path(show_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_show_id(&show_id) {
        return Err(ApiError::bad_request("Invalid show id"));
    }
    let key = active_alert_key(&show_id);
    let previous = app_state.store.read_or(&key, Value::Null).await?;

    app_state.store.write(&key, &Value::Null).await?;
    tracing::info!("[Alerts] {} cleared alert on {}", session.name, show_id);

    if !previous.is_null() {
        let entry = json!({
            "cleared": previous,
            "cleared_by": session.name,
            "cleared_at": Utc::now().to_rfc3339(),
        });
        append_history(&app_state, &show_id, &entry).await;
    }
    app_state.notifier.publish(&show_id, "alert_cleared", Value::Null);

    Ok(Json(Value::Null))
}

/// GET /api/shows/{show_id}/alert/history - the append-only log, oldest first
pub async fn alert_history(
    _session: AuthSession,
    State(app_state): State<AppState>,
    Path(show_id): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    if !is_valid_show_id(&show_id) {
        return Err(ApiError::bad_request("Invalid show id"));
    }
    let entries = app_state
        .store
        .list_dir(&alert_log_prefix(&show_id))
        .await?;
    Ok(Json(entries))
}

/// Append one history entry; failures are logged, never propagated
async fn append_history(app_state: &AppState, show_id: &str, entry: &Value) {
    // timestamp-first so the directory listing sorts chronologically
    let stamp = format!(
        "{}-{}",
        Utc::now().format("%Y%m%dT%H%M%S%3fZ"),
        &Uuid::new_v4().simple().to_string()[..8]
    );
    let key = alert_log_key(show_id, &stamp);
    if let Err(e) = app_state.store.write(&key, entry).await {
        tracing::warn!("[Alerts] History append for {} failed: {}", show_id, e);
    }
}
