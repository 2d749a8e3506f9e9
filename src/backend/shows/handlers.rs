/**
 * Show Index and Metadata Handlers
 *
 * Show metadata lives in `shows/<id>/meta.json`; `shows/index.json` is a
 * derived index of summaries refreshed best-effort after every metadata
 * write, the same unguarded read-modify-write the artist roster uses.
 */
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::backend::auth::AuthSession;
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::backend::shows::{is_valid_show_id, meta_key, SHOW_INDEX_KEY};
use crate::backend::store::StoreError;
use crate::shared::roles::Role;

/// Longest accepted show name
const MAX_NAME_LENGTH: usize = 160;

/// GET /api/shows - the show index
pub async fn list_shows(
    _session: AuthSession,
    State(app_state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let index = app_state.store.read_or(SHOW_INDEX_KEY, json!([])).await?;
    Ok(Json(index))
}

/// GET /api/shows/{show_id} - one show's metadata
pub async fn get_show(
    _session: AuthSession,
    State(app_state): State<AppState>,
    Path(show_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_show_id(&show_id) {
        return Err(ApiError::bad_request("Invalid show id"));
    }
    let meta = app_state
        .store
        .read(&meta_key(&show_id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No show '{}'", show_id)))?;
    Ok(Json(meta))
}

/**
 * PUT /api/shows/{show_id} - fully replace one show's metadata
 *
 * Coordinator-only. The metadata write is authoritative; the index refresh
 * is best-effort. Connections on the show's scope receive `show_update`
 * with the new metadata.
 *
 * # Errors
 *
 * * `400 Bad Request` - invalid show id, or metadata that is not an object
 *   with a usable `name`
 * * `403 Forbidden` - caller is not a coordinator
 */
pub async fn put_show(
    session: AuthSession,
    State(app_state): State<AppState>,
    Path(show_id): Path<String>,
    Json(meta): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    if !session.role.satisfies(Role::Coordinator) {
        tracing::warn!(
            "[Shows] {} ({}) may not edit show {}",
            session.name,
            session.role,
            show_id
        );
        return Err(ApiError::forbidden("Coordinator role required"));
    }
    if !is_valid_show_id(&show_id) {
        return Err(ApiError::bad_request("Invalid show id"));
    }
    let mut meta = meta;
    let Some(fields) = meta.as_object_mut() else {
        return Err(ApiError::bad_request("Show metadata must be a JSON object"));
    };
    let name_ok = fields
        .get("name")
        .and_then(Value::as_str)
        .map(|name| !name.trim().is_empty() && name.len() <= MAX_NAME_LENGTH)
        .unwrap_or(false);
    if !name_ok {
        tracing::warn!("[Shows] Rejected show {} without a usable name", show_id);
        return Err(ApiError::bad_request("Show needs a non-empty name"));
    }
    fields.insert("id".to_string(), json!(show_id));

    app_state.store.write(&meta_key(&show_id), &meta).await?;
    tracing::info!("[Shows] {} updated show {}", session.name, show_id);

    if let Err(e) = refresh_index(&app_state, &show_id, &meta).await {
        tracing::warn!("[Shows] Index refresh after {} failed: {}", show_id, e);
    }
    app_state
        .notifier
        .publish(&show_id, "show_update", meta.clone());

    Ok(Json(meta))
}

/// Replace or insert the show's index entry and write the index back
async fn refresh_index(
    app_state: &AppState,
    show_id: &str,
    meta: &Value,
) -> Result<(), StoreError> {
    let index = app_state.store.read_or(SHOW_INDEX_KEY, json!([])).await?;
    let mut entries = match index {
        Value::Array(entries) => entries,
        _ => Vec::new(),
    };

    let summary = index_entry(show_id, meta);
    match entries
        .iter_mut()
        .find(|entry| entry.get("id").and_then(Value::as_str) == Some(show_id))
    {
        Some(existing) => *existing = summary,
        None => entries.push(summary),
    }

    app_state.store.write(SHOW_INDEX_KEY, &Value::Array(entries)).await
}

/// The summary fields the index keeps per show
fn index_entry(show_id: &str, meta: &Value) -> Value {
    let mut entry = json!({
        "id": show_id,
        "name": meta.get("name").cloned().unwrap_or(Value::Null),
    });
    if let Some(date) = meta.get("date") {
        entry["date"] = date.clone();
    }
    entry
}
