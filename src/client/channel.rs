/**
 * Reconnecting Show Channel
 *
 * Client-side connection manager for the show WebSocket. A background driver
 * task owns the transport and walks the lifecycle
 *
 *   Disconnected -> Connecting -> Connected -> Authenticated
 *
 * reporting every transition and every update frame on an event stream. On
 * an abnormal disconnect the driver redials on the backoff schedule; a
 * deliberate close from either side, a rejected credential, or a spent
 * retry budget parks the channel in the terminal `Closed` state.
 *
 * Authentication is ambient where possible: the session token rides the
 * upgrade request as the session cookie, and the server confirms it
 * unprompted. If no confirmation arrives the driver falls back to the
 * explicit `authenticate` frame. After every confirmed handshake the driver
 * requests a full snapshot of each configured resource, so a reconnect
 * never needs delta replay.
 */
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        http::header::{HeaderValue, COOKIE},
        protocol::{frame::coding::CloseCode, CloseFrame, Message},
    },
};

use crate::client::backoff::ReconnectPolicy;
use crate::shared::protocol::{ClientFrame, UpdateMessage, CLOSE_NORMAL, SESSION_COOKIE};

type WsStream = tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<TcpStream>>;

/// How long to wait for the server to confirm ambient (cookie) authentication
/// before presenting the token explicitly.
const AMBIENT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(2);

/// How long to wait for the handshake result after the explicit frame.
const HANDSHAKE_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Resources snapshotted after every confirmed handshake.
pub const DEFAULT_RESOURCES: [&str; 3] = ["running_order", "alert", "artists"];

/// Lifecycle of the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No transport; a reconnect may be pending
    Disconnected,
    /// Dialing the server
    Connecting,
    /// Transport open, handshake not confirmed yet
    Connected,
    /// Handshake confirmed; updates are applied and forwarded
    Authenticated,
    /// Terminal: deliberate close, rejected credential, or spent budget
    Closed,
}

/// What the driver reports to the owning application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The channel moved to a new lifecycle state
    StateChanged(ChannelState),
    /// A server frame arrived while authenticated (snapshot reply or broadcast)
    Update(UpdateMessage),
    /// Terminal report; the event stream ends after this
    Closed { reason: String },
}

/// Connection settings for one show channel
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Server base URL, e.g. `ws://127.0.0.1:3000`
    pub server_url: String,
    /// Show scope to join
    pub show_id: String,
    /// Session token; rides the upgrade request as the session cookie
    pub session_token: String,
    /// Resources to snapshot after each confirmed handshake
    pub resources: Vec<String>,
    /// Backoff schedule for abnormal disconnects
    pub reconnect: ReconnectPolicy,
}

impl ChannelConfig {
    pub fn new(
        server_url: impl Into<String>,
        show_id: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            show_id: show_id.into(),
            session_token: session_token.into(),
            resources: DEFAULT_RESOURCES.iter().map(|r| r.to_string()).collect(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Replace the backoff schedule
    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Replace the snapshot resource set
    pub fn with_resources(mut self, resources: Vec<String>) -> Self {
        self.resources = resources;
        self
    }

    /// Socket endpoint for the configured show
    fn socket_url(&self) -> String {
        format!(
            "{}/ws/shows/{}",
            self.server_url.trim_end_matches('/'),
            self.show_id
        )
    }
}

/// Commands from the handle to the driver task
enum ChannelCommand {
    Shutdown,
}

/// Handle to a running show channel
///
/// Dropping the handle tears the channel down the same way [`shutdown`]
/// does.
///
/// [`shutdown`]: ShowChannel::shutdown
pub struct ShowChannel {
    cmd_tx: mpsc::UnboundedSender<ChannelCommand>,
    state: Arc<RwLock<ChannelState>>,
    cache: Arc<RwLock<HashMap<String, Value>>>,
    _driver: JoinHandle<()>,
}

impl ShowChannel {
    /// Open a channel to one show
    ///
    /// Dialing happens on a background driver task; progress is reported on
    /// the returned event stream, which ends after a `Closed` event.
    ///
    /// # Arguments
    ///
    /// * `config` - Server endpoint, show id, session token and backoff
    ///
    /// # Returns
    ///
    /// The channel handle and the event stream
    pub fn connect(config: ChannelConfig) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let state = Arc::new(RwLock::new(ChannelState::Disconnected));
        let cache = Arc::new(RwLock::new(HashMap::new()));

        let driver = tokio::spawn(drive(
            config,
            Arc::clone(&state),
            Arc::clone(&cache),
            event_tx,
            cmd_rx,
        ));

        (
            Self {
                cmd_tx,
                state,
                cache,
                _driver: driver,
            },
            event_rx,
        )
    }

    /// Current lifecycle state
    pub fn state(&self) -> ChannelState {
        *self.state.read().unwrap()
    }

    /// True while the handshake is confirmed and updates are applied
    pub fn is_authenticated(&self) -> bool {
        self.state() == ChannelState::Authenticated
    }

    /// Latest cached value for one resource, if any update arrived yet
    pub fn latest(&self, resource: &str) -> Option<Value> {
        self.cache.read().unwrap().get(resource).cloned()
    }

    /// Deliberate close
    ///
    /// Idempotent. If a reconnect timer is pending, the driver drops it when
    /// it picks the command up, so no further dial happens.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(ChannelCommand::Shutdown);
    }
}

impl Drop for ShowChannel {
    fn drop(&mut self) {
        // Best-effort deliberate close.
        let _ = self.cmd_tx.send(ChannelCommand::Shutdown);
    }
}

/// How one transport session ended
enum SessionEnd {
    /// App-side deliberate close (shutdown command or dropped handle)
    Shutdown,
    /// Server sent a normal close
    ServerClosed,
    /// Handshake explicitly rejected; redialing would only fail again
    AuthRejected(String),
    /// Transport failure or non-normal close; eligible for reconnect
    Abnormal(String),
}

/// Driver task: dial, run the session, redial on the backoff schedule.
async fn drive(
    config: ChannelConfig,
    state: Arc<RwLock<ChannelState>>,
    cache: Arc<RwLock<HashMap<String, Value>>>,
    event_tx: mpsc::UnboundedSender<ChannelEvent>,
    mut cmd_rx: mpsc::UnboundedReceiver<ChannelCommand>,
) {
    let mut attempt: u32 = 0;

    loop {
        set_state(&state, &event_tx, ChannelState::Connecting);

        let session_end = match dial(&config).await {
            Ok(ws) => {
                set_state(&state, &event_tx, ChannelState::Connected);
                run_session(
                    ws,
                    &config,
                    &state,
                    &cache,
                    &event_tx,
                    &mut cmd_rx,
                    &mut attempt,
                )
                .await
            }
            Err(e) => SessionEnd::Abnormal(e),
        };

        match session_end {
            SessionEnd::Shutdown => {
                close_with(&state, &event_tx, "shutdown");
                return;
            }
            SessionEnd::ServerClosed => {
                close_with(&state, &event_tx, "server closed the channel");
                return;
            }
            SessionEnd::AuthRejected(reason) => {
                close_with(
                    &state,
                    &event_tx,
                    format!("authentication rejected: {}", reason),
                );
                return;
            }
            SessionEnd::Abnormal(reason) => {
                tracing::warn!("[Channel] Connection lost: {}", reason);
                set_state(&state, &event_tx, ChannelState::Disconnected);
            }
        }

        if config.reconnect.is_exhausted(attempt) {
            close_with(
                &state,
                &event_tx,
                format!("gave up after {} attempts", attempt),
            );
            return;
        }

        let delay = config.reconnect.delay_for(attempt);
        attempt += 1;
        tracing::info!("[Channel] Reconnecting in {:?} (attempt {})", delay, attempt);

        // A shutdown arriving here drops the pending timer with it.
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = cmd_rx.recv() => {
                close_with(&state, &event_tx, "shutdown");
                return;
            }
        }
    }
}

/// Open the WebSocket with the session cookie on the upgrade request.
async fn dial(config: &ChannelConfig) -> Result<WsStream, String> {
    let url = config.socket_url();
    let mut request = url
        .as_str()
        .into_client_request()
        .map_err(|e| format!("invalid socket url {}: {}", url, e))?;

    let cookie = format!("{}={}", SESSION_COOKIE, config.session_token);
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| format!("session token is not header-safe: {}", e))?;
    request.headers_mut().insert(COOKIE, value);

    tracing::debug!("[Channel] Dialing {}", url);
    let (ws, _response) = connect_async(request)
        .await
        .map_err(|e| format!("connect to {} failed: {}", url, e))?;
    Ok(ws)
}

/// Run one open transport until it ends.
///
/// Resets the shared attempt counter once the handshake is confirmed, so
/// only a connection that reached `Authenticated` restarts the backoff
/// schedule from its base delay.
async fn run_session(
    mut ws: WsStream,
    config: &ChannelConfig,
    state: &Arc<RwLock<ChannelState>>,
    cache: &Arc<RwLock<HashMap<String, Value>>>,
    event_tx: &mpsc::UnboundedSender<ChannelEvent>,
    cmd_rx: &mut mpsc::UnboundedReceiver<ChannelCommand>,
    attempt: &mut u32,
) -> SessionEnd {
    let mut authenticated = false;
    let mut explicit_sent = false;
    // The cookie went with the upgrade request; give the server a moment to
    // confirm ambient authentication before presenting the token explicitly.
    let mut handshake_deadline = Instant::now() + AMBIENT_CONFIRM_TIMEOUT;

    loop {
        let handshake_wait = tokio::time::sleep_until(handshake_deadline);
        tokio::pin!(handshake_wait);

        tokio::select! {
            _ = &mut handshake_wait, if !authenticated => {
                if explicit_sent {
                    return SessionEnd::Abnormal("handshake timed out".to_string());
                }
                tracing::debug!("[Channel] No ambient confirmation, sending authenticate frame");
                if let Err(e) = send_frame(&mut ws, &ClientFrame::authenticate(&config.session_token)).await {
                    return SessionEnd::Abnormal(e);
                }
                explicit_sent = true;
                handshake_deadline = Instant::now() + HANDSHAKE_REPLY_TIMEOUT;
            }

            cmd = cmd_rx.recv() => {
                // Shutdown command, or the owning handle went away.
                let _ = cmd;
                send_normal_close(&mut ws).await;
                return SessionEnd::Shutdown;
            }

            frame = ws.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let msg = match UpdateMessage::from_json(&text) {
                            Ok(msg) => msg,
                            Err(e) => {
                                tracing::warn!("[Channel] Dropping unparseable frame: {}", e);
                                continue;
                            }
                        };
                        if msg.kind == "authenticated" {
                            if msg.is_auth_ok() {
                                if !authenticated {
                                    authenticated = true;
                                    *attempt = 0;
                                    set_state(state, event_tx, ChannelState::Authenticated);
                                    if let Err(e) = request_snapshots(&mut ws, &config.resources).await {
                                        return SessionEnd::Abnormal(e);
                                    }
                                }
                            } else {
                                let reason = msg.error.unwrap_or_else(|| "rejected".to_string());
                                return SessionEnd::AuthRejected(reason);
                            }
                        } else if authenticated {
                            apply_update(cache, &msg);
                            if event_tx.send(ChannelEvent::Update(msg)).is_err() {
                                // Nobody is listening any more.
                                send_normal_close(&mut ws).await;
                                return SessionEnd::Shutdown;
                            }
                        } else {
                            tracing::debug!("[Channel] Ignoring {} frame before handshake", msg.kind);
                        }
                    }
                    Some(Ok(Message::Close(close))) => {
                        let code = close.as_ref().map(|f| u16::from(f.code));
                        if code == Some(CLOSE_NORMAL) {
                            return SessionEnd::ServerClosed;
                        }
                        return SessionEnd::Abnormal(format!("closed with code {:?}", code));
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = ws.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(_)) => {
                        // Binary and pong frames are not part of the protocol.
                    }
                    Some(Err(e)) => {
                        return SessionEnd::Abnormal(format!("transport error: {}", e));
                    }
                    None => {
                        return SessionEnd::Abnormal("stream ended".to_string());
                    }
                }
            }
        }
    }
}

/// Record and report a state transition.
fn set_state(
    state: &RwLock<ChannelState>,
    event_tx: &mpsc::UnboundedSender<ChannelEvent>,
    next: ChannelState,
) {
    *state.write().unwrap() = next;
    let _ = event_tx.send(ChannelEvent::StateChanged(next));
}

/// Park the channel in the terminal state and report why.
fn close_with(
    state: &RwLock<ChannelState>,
    event_tx: &mpsc::UnboundedSender<ChannelEvent>,
    reason: impl Into<String>,
) {
    let reason = reason.into();
    tracing::info!("[Channel] Closed: {}", reason);
    set_state(state, event_tx, ChannelState::Closed);
    let _ = event_tx.send(ChannelEvent::Closed { reason });
}

/// Send a deliberate close so the server does not treat the drop as abnormal.
async fn send_normal_close(ws: &mut WsStream) {
    let close = CloseFrame {
        code: CloseCode::Normal,
        reason: "shutdown".into(),
    };
    let _ = ws.send(Message::Close(Some(close))).await;
}

/// Serialize and send one client frame.
async fn send_frame(ws: &mut WsStream, frame: &ClientFrame) -> Result<(), String> {
    let json = frame
        .to_json()
        .map_err(|e| format!("encode frame: {}", e))?;
    ws.send(Message::Text(json.into()))
        .await
        .map_err(|e| format!("send frame: {}", e))
}

/// Request a full snapshot of every configured resource.
async fn request_snapshots(ws: &mut WsStream, resources: &[String]) -> Result<(), String> {
    for resource in resources {
        send_frame(ws, &ClientFrame::snapshot(resource)).await?;
    }
    Ok(())
}

/// Fold an update frame into the local cache.
///
/// `<resource>_update` frames replace the cached value wholesale;
/// `alert_cleared` resets the alert entry. Other kinds are forwarded to the
/// application but not cached.
fn apply_update(cache: &RwLock<HashMap<String, Value>>, msg: &UpdateMessage) {
    if msg.kind == "alert_cleared" {
        cache
            .write()
            .unwrap()
            .insert("alert".to_string(), Value::Null);
    } else if let Some(resource) = msg.kind.strip_suffix("_update") {
        let value = msg.data.clone().unwrap_or(Value::Null);
        cache.write().unwrap().insert(resource.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_socket_url_building() {
        let config = ChannelConfig::new("ws://127.0.0.1:3000/", "gala", "tok");
        assert_eq!(config.socket_url(), "ws://127.0.0.1:3000/ws/shows/gala");
    }

    #[test]
    fn test_default_resources() {
        let config = ChannelConfig::new("ws://localhost:3000", "gala", "tok");
        assert_eq!(config.resources, vec!["running_order", "alert", "artists"]);
    }

    #[test]
    fn test_apply_update_replaces_wholesale() {
        let cache = RwLock::new(HashMap::new());
        apply_update(
            &cache,
            &UpdateMessage::update("running_order_update", json!([{"artist": "Nova"}])),
        );
        apply_update(&cache, &UpdateMessage::update("running_order_update", json!([])));
        assert_eq!(cache.read().unwrap().get("running_order"), Some(&json!([])));
    }

    #[test]
    fn test_alert_cleared_resets_cache_entry() {
        let cache = RwLock::new(HashMap::new());
        apply_update(
            &cache,
            &UpdateMessage::update("alert_update", json!({"message": "hold the doors"})),
        );
        apply_update(
            &cache,
            &UpdateMessage::update("alert_cleared", Value::Null),
        );
        assert_eq!(cache.read().unwrap().get("alert"), Some(&Value::Null));
    }

    #[test]
    fn test_unrecognized_kinds_are_not_cached() {
        let cache = RwLock::new(HashMap::new());
        apply_update(&cache, &UpdateMessage::error("Authenticate first"));
        assert!(cache.read().unwrap().is_empty());
    }
}
