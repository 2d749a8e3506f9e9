/**
 * Connection Registry and Broadcast Hub
 *
 * In-process fan-out for show sockets. Every accepted connection is
 * registered here under its show scope before it has authenticated; its
 * identity is attached once the handshake verifies. Broadcasting to a scope
 * serializes the frame once and pushes it down each member's outbound
 * channel.
 *
 * # Locking
 *
 * One mutex guards the registry and the scope index together. Critical
 * sections only touch the maps; sends happen on a snapshot taken under the
 * lock, so a concurrent unregister cannot corrupt a fan-out and the lock is
 * never held across an await.
 *
 * # Failure Policy
 *
 * A send fails only when the connection's writer task is gone. The failed
 * connection is unregistered and the fan-out continues; one dead socket
 * never stops delivery to the rest.
 */
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::shared::protocol::UpdateMessage;

/// Process-unique id for one socket connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sending half of a connection's outbound channel; the socket's writer
/// task drains the other end into the websocket
pub type OutboundSender = mpsc::UnboundedSender<String>;

/// One registered connection
#[derive(Debug)]
struct ConnectionRecord {
    scope: String,
    identity: Option<Uuid>,
    sender: OutboundSender,
}

#[derive(Debug, Default)]
struct HubInner {
    connections: HashMap<ConnectionId, ConnectionRecord>,
    by_scope: HashMap<String, HashSet<ConnectionId>>,
}

/// Scope-keyed connection registry with broadcast fan-out
#[derive(Debug, Default)]
pub struct BroadcastHub {
    inner: Mutex<HubInner>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection under its show scope
    ///
    /// Called at socket accept, before authentication completes: the scope
    /// is known from the URL, the identity usually is not. Ambient cookie
    /// authentication may supply the identity already.
    pub fn register(
        &self,
        id: ConnectionId,
        scope: &str,
        sender: OutboundSender,
        identity: Option<Uuid>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner.connections.insert(
            id,
            ConnectionRecord {
                scope: scope.to_string(),
                identity,
                sender,
            },
        );
        inner
            .by_scope
            .entry(scope.to_string())
            .or_default()
            .insert(id);
        tracing::info!("[Hub] Registered connection {} in scope {}", id, scope);
    }

    /// Attach a verified identity to an existing connection
    ///
    /// Returns false if the connection is already gone.
    pub fn authenticate(&self, id: ConnectionId, identity: Uuid) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.connections.get_mut(&id) {
            Some(record) => {
                record.identity = Some(identity);
                tracing::info!("[Hub] Authenticated connection {} as {}", id, identity);
                true
            }
            None => false,
        }
    }

    /// Remove a connection and prune its scope entry if now empty
    ///
    /// Idempotent: unregistering an unknown id is a no-op. Returns whether
    /// a record was actually removed.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let Some(record) = inner.connections.remove(&id) else {
            return false;
        };
        if let Some(members) = inner.by_scope.get_mut(&record.scope) {
            members.remove(&id);
            if members.is_empty() {
                inner.by_scope.remove(&record.scope);
            }
        }
        tracing::info!(
            "[Hub] Unregistered connection {} from scope {}",
            id,
            record.scope
        );
        true
    }

    /// Broadcast a frame to every connection in a scope
    ///
    /// Serializes once, snapshots the member set under the lock, sends
    /// outside it. Members whose writer task is gone are unregistered and
    /// the fan-out continues. Returns the number of successful deliveries;
    /// an empty scope is a no-op returning 0.
    pub fn broadcast(&self, scope: &str, frame: &UpdateMessage) -> usize {
        let json = match frame.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("[Hub] Could not serialize {} frame: {}", frame.kind, e);
                return 0;
            }
        };

        let members: Vec<(ConnectionId, OutboundSender)> = {
            let inner = self.inner.lock().unwrap();
            let Some(ids) = inner.by_scope.get(scope) else {
                tracing::debug!("[Hub] No connections in scope {}, skipping", scope);
                return 0;
            };
            ids.iter()
                .filter_map(|id| inner.connections.get(id).map(|r| (*id, r.sender.clone())))
                .collect()
        };

        self.deliver(&json, &frame.kind, members)
    }

    /// Send a frame to every authenticated connection of one identity
    ///
    /// Covers multiple tabs: each open connection of the identity receives
    /// its own copy, across all scopes.
    pub fn send_to_identity(&self, identity: Uuid, frame: &UpdateMessage) -> usize {
        let json = match frame.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("[Hub] Could not serialize {} frame: {}", frame.kind, e);
                return 0;
            }
        };

        let members: Vec<(ConnectionId, OutboundSender)> = {
            let inner = self.inner.lock().unwrap();
            inner
                .connections
                .iter()
                .filter(|(_, r)| r.identity == Some(identity))
                .map(|(id, r)| (*id, r.sender.clone()))
                .collect()
        };

        self.deliver(&json, &frame.kind, members)
    }

    /// Connections currently registered, overall or in one scope
    pub fn connection_count(&self, scope: Option<&str>) -> usize {
        let inner = self.inner.lock().unwrap();
        match scope {
            Some(scope) => inner.by_scope.get(scope).map_or(0, |ids| ids.len()),
            None => inner.connections.len(),
        }
    }

    /// Scopes that currently have at least one connection
    pub fn scopes(&self) -> Vec<String> {
        let mut scopes: Vec<String> = self.inner.lock().unwrap().by_scope.keys().cloned().collect();
        scopes.sort();
        scopes
    }

    /// Whether a connection is still registered
    pub fn is_registered(&self, id: ConnectionId) -> bool {
        self.inner.lock().unwrap().connections.contains_key(&id)
    }

    fn deliver(
        &self,
        json: &str,
        kind: &str,
        members: Vec<(ConnectionId, OutboundSender)>,
    ) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, sender) in members {
            if sender.send(json.to_string()).is_ok() {
                delivered += 1;
            } else {
                dead.push(id);
            }
        }
        for id in dead {
            tracing::warn!("[Hub] Send of {} to {} failed, unregistering", kind, id);
            self.unregister(id);
        }
        tracing::debug!("[Hub] Delivered {} to {} connection(s)", kind, delivered);
        delivered
    }
}
