/**
 * Artist Roster Handlers
 *
 * Thin transforms over the document store: a profile write fully replaces
 * `artists/<id>/profile.json`, then refreshes the roster index and notifies
 * the artist's show scope.
 *
 * # Roster Refresh
 *
 * The refresh is a plain read-modify-write of `artists/index.json` with no
 * guard. Two concurrent profile writes can interleave so that the second
 * roster write overwrites the first one's entry; the next profile write
 * repairs the index. Profile documents themselves are never affected, and
 * a failed refresh does not fail the profile write.
 */
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::backend::artists::{is_valid_artist_id, profile_key, ROSTER_KEY};
use crate::backend::auth::AuthSession;
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::backend::store::StoreError;

/// Longest accepted artist display name
const MAX_NAME_LENGTH: usize = 120;

/**
 * GET /api/artists - the roster index
 *
 * # Returns
 *
 * The roster array; an empty array when no artist has been written yet.
 */
pub async fn list_artists(
    _session: AuthSession,
    State(app_state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let roster = app_state.store.read_or(ROSTER_KEY, json!([])).await?;
    Ok(Json(roster))
}

/// GET /api/artists/{artist_id} - one artist's profile
pub async fn get_artist(
    _session: AuthSession,
    State(app_state): State<AppState>,
    Path(artist_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_artist_id(&artist_id) {
        return Err(ApiError::bad_request("Invalid artist id"));
    }
    let profile = app_state
        .store
        .read(&profile_key(&artist_id))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No artist '{}'", artist_id)))?;
    Ok(Json(profile))
}

/**
 * PUT /api/artists/{artist_id} - fully replace one artist's profile
 *
 * The profile write is authoritative; the roster refresh and the broadcast
 * that follows it are best-effort. When the profile names a `show_id`, the
 * refreshed roster is pushed to that show's connections as `artists_update`.
 *
 * # Errors
 *
 * * `400 Bad Request` - invalid artist id, or a profile that is not an
 *   object with a usable `name`
 * * `503 Service Unavailable` - the profile write itself failed
 */
pub async fn put_artist(
    session: AuthSession,
    State(app_state): State<AppState>,
    Path(artist_id): Path<String>,
    Json(profile): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    if !is_valid_artist_id(&artist_id) {
        return Err(ApiError::bad_request("Invalid artist id"));
    }
    let mut profile = profile;
    let Some(fields) = profile.as_object_mut() else {
        return Err(ApiError::bad_request("Profile must be a JSON object"));
    };
    let name_ok = fields
        .get("name")
        .and_then(Value::as_str)
        .map(|name| !name.trim().is_empty() && name.len() <= MAX_NAME_LENGTH)
        .unwrap_or(false);
    if !name_ok {
        tracing::warn!("[Artists] Rejected profile {} without a usable name", artist_id);
        return Err(ApiError::bad_request("Profile needs a non-empty name"));
    }
    // The path id wins over whatever the body carried
    fields.insert("id".to_string(), json!(artist_id));

    app_state.store.write(&profile_key(&artist_id), &profile).await?;
    tracing::info!("[Artists] {} updated profile {}", session.name, artist_id);

    match refresh_roster(&app_state, &artist_id, &profile).await {
        Ok(roster) => {
            if let Some(show_id) = profile.get("show_id").and_then(Value::as_str) {
                app_state.notifier.publish(show_id, "artists_update", roster);
            }
        }
        Err(e) => {
            // The profile is saved; the index catches up on the next write
            tracing::warn!("[Artists] Roster refresh after {} failed: {}", artist_id, e);
        }
    }

    Ok(Json(profile))
}

/// Replace or insert the artist's roster entry and write the index back
async fn refresh_roster(
    app_state: &AppState,
    artist_id: &str,
    profile: &Value,
) -> Result<Value, StoreError> {
    let roster = app_state.store.read_or(ROSTER_KEY, json!([])).await?;
    // a corrupt-but-parseable index is rebuilt from scratch
    let mut entries = match roster {
        Value::Array(entries) => entries,
        _ => Vec::new(),
    };

    let summary = roster_entry(artist_id, profile);
    match entries
        .iter_mut()
        .find(|entry| entry.get("id").and_then(Value::as_str) == Some(artist_id))
    {
        Some(existing) => *existing = summary,
        None => entries.push(summary),
    }

    let roster = Value::Array(entries);
    app_state.store.write(ROSTER_KEY, &roster).await?;
    Ok(roster)
}

/// The summary fields the roster keeps per artist
fn roster_entry(artist_id: &str, profile: &Value) -> Value {
    let mut entry = json!({
        "id": artist_id,
        "name": profile.get("name").cloned().unwrap_or(Value::Null),
    });
    if let Some(show_id) = profile.get("show_id") {
        entry["show_id"] = show_id.clone();
    }
    entry
}
