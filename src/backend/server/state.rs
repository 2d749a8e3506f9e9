/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central container threaded through every handler:
 * - The document store behind `Arc<dyn DocumentStore>`
 * - The broadcast hub and the change notifier wrapping it
 * - The session token service
 * - The startup configuration
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and safe to share: the store and hub are
 * `Arc`s, the notifier and token service clone by reference internally.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers ask for just the part they
 * use (`State<SharedStore>`, `State<Arc<BroadcastHub>>`, ...) instead of
 * the whole `AppState`.
 */
use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::realtime::{BroadcastHub, ChangeNotifier};
use crate::backend::server::config::ServerConfig;
use crate::backend::store::SharedStore;
use crate::backend::auth::TokenService;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Path-addressed JSON document storage
    pub store: SharedStore,

    /// Registry of live WebSocket connections, indexed by show scope
    pub hub: Arc<BroadcastHub>,

    /// Write-then-broadcast glue over the hub
    pub notifier: ChangeNotifier,

    /// Session token issue/verify service
    pub tokens: TokenService,

    /// Startup configuration
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Assemble the state; the notifier is derived from the hub
    pub fn new(store: SharedStore, tokens: TokenService, config: ServerConfig) -> Self {
        let hub = Arc::new(BroadcastHub::new());
        Self {
            store,
            notifier: ChangeNotifier::new(hub.clone()),
            hub,
            tokens,
            config: Arc::new(config),
        }
    }

    /// State over a fresh in-memory store, for unit tests
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::for_tests_with_store(Arc::new(crate::backend::store::MemoryStore::new()))
    }

    /// State over a caller-supplied store, for tests that pre-seed or
    /// fault-inject documents
    #[cfg(test)]
    pub fn for_tests_with_store(store: Arc<crate::backend::store::MemoryStore>) -> Self {
        let config = ServerConfig::default();
        let tokens = TokenService::new(&config.session_key, config.session_ttl);
        Self::new(store, tokens, config)
    }
}

/// Extract the document store alone
impl FromRef<AppState> for SharedStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

/// Extract the broadcast hub alone
impl FromRef<AppState> for Arc<BroadcastHub> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

/// Extract the change notifier alone
impl FromRef<AppState> for ChangeNotifier {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.notifier.clone()
    }
}

/// Extract the token service alone
impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}
