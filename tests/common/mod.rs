//! Common test utilities and helpers
//!
//! Shared fixtures for the integration suite: application state over the
//! in-memory store, staff directory seeding, and a real server bound to an
//! ephemeral port for the WebSocket and channel tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

use stagelink::backend::auth::staff::{StaffRecord, STAFF_DIRECTORY_KEY};
use stagelink::backend::auth::TokenService;
use stagelink::backend::routes::create_router;
use stagelink::backend::server::{AppState, ServerConfig};
use stagelink::backend::store::{DocumentStore, MemoryStore};
use stagelink::shared::protocol::SESSION_COOKIE;
use stagelink::shared::roles::Role;
use stagelink::shared::staff::StaffProfile;

/// One seeded staff member with a live session
pub struct TestStaff {
    pub id: Uuid,
    pub username: String,
    pub access_key: String,
    pub profile: StaffProfile,
    pub token: String,
}

/// Application state over a fresh in-memory store
pub fn test_state() -> AppState {
    test_state_with_store(Arc::new(MemoryStore::new()))
}

/// Application state over a caller-supplied store, for tests that pre-seed
/// or fault-inject documents
pub fn test_state_with_store(store: Arc<MemoryStore>) -> AppState {
    let config = ServerConfig::default();
    let tokens = TokenService::new(&config.session_key, config.session_ttl);
    AppState::new(store, tokens, config)
}

/// Seed one staff member into the directory and hand back a session
pub async fn seed_staff(state: &AppState, username: &str, role: Role) -> TestStaff {
    let access_key = format!("{}-access-key", username);
    let record = StaffRecord {
        id: Uuid::new_v4(),
        username: username.to_string(),
        name: username.to_string(),
        role,
        // min cost keeps the suite fast
        access_key_hash: bcrypt::hash(&access_key, 4).unwrap(),
    };

    let mut directory: Vec<StaffRecord> = match state.store.read(STAFF_DIRECTORY_KEY).await.unwrap()
    {
        Some(value) => serde_json::from_value(value).unwrap(),
        None => Vec::new(),
    };
    directory.push(record.clone());
    state
        .store
        .write(
            STAFF_DIRECTORY_KEY,
            &serde_json::to_value(&directory).unwrap(),
        )
        .await
        .unwrap();

    let profile = record.profile();
    let token = state.tokens.issue_default(&profile).unwrap();
    TestStaff {
        id: record.id,
        username: username.to_string(),
        access_key,
        profile,
        token,
    }
}

/// Cookie header value carrying a session token
pub fn session_cookie(token: &str) -> String {
    format!("{}={}", SESSION_COOKIE, token)
}

/// Serve the full router on an ephemeral port
///
/// Returns the bound address and the serve task handle.
pub async fn spawn_server(state: AppState) -> (SocketAddr, JoinHandle<()>) {
    let app = create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, handle)
}
