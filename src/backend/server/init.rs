/**
 * Server Initialization
 *
 * Wires configuration, the document store, the broadcast hub and the
 * router into a runnable application.
 *
 * # Initialization Process
 *
 * 1. Open the filesystem document store (creating the data directory)
 * 2. Build the token service from the configured signing key
 * 3. Assemble `AppState` (hub and notifier come with it)
 * 4. Create the router with the access gate installed
 *
 * # Error Handling
 *
 * A data directory that cannot be created is fatal: the server is a
 * coordination layer over that store, so there is nothing useful to run
 * without it.
 */
use std::sync::Arc;

use axum::Router;

use crate::backend::auth::TokenService;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::state::AppState;
use crate::backend::store::{FsStore, StoreError};

/**
 * Create and configure the Axum application
 *
 * # Arguments
 *
 * * `config` - startup configuration, usually `ServerConfig::from_env()`
 *
 * # Returns
 *
 * A configured router ready for `axum::serve`, or the store error that
 * prevented the data directory from opening.
 */
pub async fn create_app(config: ServerConfig) -> Result<Router, StoreError> {
    tracing::info!("Initializing Stagelink backend server");

    // Step 1: Open the document store
    let store = Arc::new(FsStore::open(&config.data_dir).await?);

    // Step 2: Token service over the configured signing key
    let tokens = TokenService::new(&config.session_key, config.session_ttl);

    // Step 3: Assemble shared state (hub and notifier included)
    let app_state = AppState::new(store, tokens, config);
    tracing::info!("Document store and broadcast hub initialized");

    // Step 4: Router with the access gate over every route
    Ok(create_router(app_state))
}
