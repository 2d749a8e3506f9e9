/**
 * Show Socket Lifecycle
 *
 * One WebSocket per browser tab, scoped to one show. The handler registers
 * the connection with the hub before authentication so the scope is bound
 * early, then walks the frames: `authenticate` attaches an identity,
 * `request_<resource>` answers with a full snapshot, anything else gets an
 * error frame.
 *
 * # Authentication
 *
 * A valid session cookie on the handshake request authenticates the socket
 * ambiently. Clients connecting without a cookie (or from another origin)
 * send an `authenticate` frame instead. Rejected credentials end the
 * connection with a deliberate close, which clients treat as terminal.
 *
 * # Teardown
 *
 * The writer task owns the send half and drains every queued frame before
 * closing, so a rejection frame is flushed before the close frame that
 * follows it.
 */
use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, Utf8Bytes, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::backend::artists::ROSTER_KEY;
use crate::backend::auth::gate::{session_token_from_headers, AuthSession};
use crate::backend::realtime::hub::{ConnectionId, OutboundSender};
use crate::backend::server::state::AppState;
use crate::backend::shows::{active_alert_key, is_valid_show_id, running_order_key};
use crate::shared::protocol::{ClientCommand, ClientFrame, UpdateMessage};

/// What the frame loop should do after one frame
enum FrameOutcome {
    Continue,
    Close,
}

/**
 * GET /ws/shows/{show_id} - upgrade to the show socket
 *
 * The show id is validated before the upgrade; the session cookie, when
 * present and valid, authenticates the connection from the first frame.
 */
pub async fn show_socket(
    State(app_state): State<AppState>,
    Path(show_id): Path<String>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    if !is_valid_show_id(&show_id) {
        return (StatusCode::BAD_REQUEST, "Invalid show id").into_response();
    }

    let ambient = session_token_from_headers(&headers)
        .and_then(|token| app_state.tokens.verify(&token).ok())
        .and_then(|claims| AuthSession::from_claims(&claims).ok());

    ws.on_upgrade(move |socket| handle_socket(socket, app_state, show_id, ambient))
}

/// Drive one connection from accept to teardown
async fn handle_socket(
    socket: WebSocket,
    app_state: AppState,
    show_id: String,
    ambient: Option<AuthSession>,
) {
    let connection_id = ConnectionId::new();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut authenticated = ambient.is_some();
    app_state.hub.register(
        connection_id,
        &show_id,
        outbound_tx.clone(),
        ambient.as_ref().map(|session| session.staff_id),
    );

    match &ambient {
        Some(session) => {
            tracing::info!(
                "[Socket] {} joined show {} as {} ({})",
                connection_id,
                show_id,
                session.name,
                session.role
            );
            send_update(&outbound_tx, &UpdateMessage::authenticated());
        }
        None => {
            tracing::info!(
                "[Socket] {} joined show {} awaiting authentication",
                connection_id,
                show_id
            );
        }
    }

    // Writer task: drains the outbound queue onto the socket. When the queue
    // closes it sends a normal close frame, so every server-initiated
    // shutdown looks deliberate to the client.
    let writer = tokio::spawn(async move {
        while let Some(json) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
        let _ = ws_tx
            .send(Message::Close(Some(CloseFrame {
                code: close_code::NORMAL,
                reason: Utf8Bytes::from_static("closed"),
            })))
            .await;
    });

    while let Some(incoming) = ws_rx.next().await {
        match incoming {
            Ok(Message::Text(text)) => {
                let outcome = handle_frame(
                    &app_state,
                    connection_id,
                    &show_id,
                    &mut authenticated,
                    text.as_str(),
                    &outbound_tx,
                )
                .await;
                if matches!(outcome, FrameOutcome::Close) {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            // ping/pong are answered by the transport layer
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("[Socket] {} transport error: {}", connection_id, e);
                break;
            }
        }
    }

    // Unregister drops the hub's sender clone; dropping ours closes the
    // queue, and awaiting the writer lets queued frames flush first.
    app_state.hub.unregister(connection_id);
    drop(outbound_tx);
    let _ = writer.await;
    tracing::info!("[Socket] {} left show {}", connection_id, show_id);
}

/// Apply one client frame
async fn handle_frame(
    app_state: &AppState,
    connection_id: ConnectionId,
    show_id: &str,
    authenticated: &mut bool,
    raw: &str,
    outbound: &OutboundSender,
) -> FrameOutcome {
    let frame = match ClientFrame::from_json(raw) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!("[Socket] {} sent unreadable frame: {}", connection_id, e);
            send_update(outbound, &UpdateMessage::error("Unreadable frame"));
            return FrameOutcome::Continue;
        }
    };

    match frame.command() {
        ClientCommand::Authenticate { token } => {
            let session = app_state
                .tokens
                .verify(&token)
                .and_then(|claims| AuthSession::from_claims(&claims));
            match session {
                Ok(session) => {
                    *authenticated = true;
                    app_state.hub.authenticate(connection_id, session.staff_id);
                    tracing::info!(
                        "[Socket] {} authenticated as {} on show {}",
                        connection_id,
                        session.name,
                        show_id
                    );
                    send_update(outbound, &UpdateMessage::authenticated());
                    FrameOutcome::Continue
                }
                Err(e) => {
                    // Log the exact failure; the wire message stays uniform
                    tracing::warn!(
                        "[Socket] {} rejected token on show {}: {}",
                        connection_id,
                        show_id,
                        e
                    );
                    send_update(outbound, &UpdateMessage::authentication_failed("Invalid session"));
                    FrameOutcome::Close
                }
            }
        }
        ClientCommand::Snapshot { resource } => {
            if !*authenticated {
                send_update(outbound, &UpdateMessage::error("Authenticate first"));
                return FrameOutcome::Continue;
            }
            let Some((key, default, kind)) = snapshot_source(show_id, &resource) else {
                send_update(
                    outbound,
                    &UpdateMessage::error(format!("Unknown resource: {}", resource)),
                );
                return FrameOutcome::Continue;
            };
            match app_state.store.read_or(&key, default).await {
                Ok(data) => {
                    send_update(outbound, &UpdateMessage::update(kind, data));
                }
                Err(e) => {
                    tracing::error!(
                        "[Socket] {} snapshot of {} failed: {}",
                        connection_id,
                        key,
                        e
                    );
                    send_update(outbound, &UpdateMessage::error("Snapshot unavailable"));
                }
            }
            FrameOutcome::Continue
        }
        ClientCommand::Unknown { kind } => {
            tracing::debug!("[Socket] {} sent unknown frame type {}", connection_id, kind);
            send_update(
                outbound,
                &UpdateMessage::error(format!("Unknown frame type: {}", kind)),
            );
            FrameOutcome::Continue
        }
    }
}

/// Map a snapshot resource name to its document key, default and reply tag
fn snapshot_source(show_id: &str, resource: &str) -> Option<(String, serde_json::Value, String)> {
    let (key, default) = match resource {
        "running_order" => (running_order_key(show_id), serde_json::json!([])),
        "alert" => (active_alert_key(show_id), serde_json::Value::Null),
        "artists" => (ROSTER_KEY.to_string(), serde_json::json!([])),
        _ => return None,
    };
    Some((key, default, format!("{}_update", resource)))
}

/// Queue a frame for the writer; a closed queue means teardown is underway
fn send_update(outbound: &OutboundSender, frame: &UpdateMessage) {
    match frame.to_json() {
        Ok(json) => {
            let _ = outbound.send(json);
        }
        Err(e) => {
            tracing::error!("[Socket] Failed to serialize frame: {}", e);
        }
    }
}
