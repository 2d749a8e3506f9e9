/**
 * Server Configuration
 *
 * Environment-driven configuration, read once at startup and threaded
 * through `AppState`. Every knob has a local-development default so a bare
 * `cargo run` works.
 *
 * # Variables
 *
 * - `STAGELINK_ADDR` - bind address (default `127.0.0.1:3000`)
 * - `STAGELINK_DATA_DIR` - document store root (default `./data`)
 * - `STAGELINK_SESSION_KEY` - token signing secret
 * - `STAGELINK_SESSION_TTL_HOURS` - session lifetime (default 12)
 * - `STAGELINK_INSECURE_COOKIES` - set to `1` to drop the `Secure` cookie
 *   attribute for plain-HTTP development
 *
 * # Error Handling
 *
 * Unparseable values are logged and replaced by their defaults; a missing
 * session key falls back to a development constant in debug builds and
 * refuses to start in release builds.
 */
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default bind address
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default document store root
const DEFAULT_DATA_DIR: &str = "./data";

/// Default session lifetime in hours
const DEFAULT_SESSION_TTL_HOURS: u64 = 12;

/// Signing key used when none is configured. Debug builds only.
const DEV_SESSION_KEY: &str = "stagelink-dev-session-key-not-for-production";

/// Startup configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the HTTP listener binds
    pub bind_addr: SocketAddr,
    /// Root directory of the filesystem document store
    pub data_dir: PathBuf,
    /// Secret the session tokens are signed with
    pub session_key: String,
    /// Lifetime of newly issued sessions
    pub session_ttl: Duration,
    /// Whether session cookies carry the `Secure` attribute
    pub secure_cookies: bool,
}

impl ServerConfig {
    /**
     * Read configuration from the environment
     *
     * # Returns
     *
     * A complete configuration; defaults fill anything unset.
     *
     * # Panics
     *
     * Release builds panic when `STAGELINK_SESSION_KEY` is unset, because
     * a guessable signing key would let anyone mint sessions.
     */
    pub fn from_env() -> Self {
        let bind_addr = match std::env::var("STAGELINK_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    "STAGELINK_ADDR '{}' is not a socket address ({}), using {}",
                    raw,
                    e,
                    DEFAULT_ADDR
                );
                default_addr()
            }),
            Err(_) => default_addr(),
        };

        let data_dir = std::env::var("STAGELINK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let session_key = match std::env::var("STAGELINK_SESSION_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                if cfg!(debug_assertions) {
                    tracing::warn!(
                        "STAGELINK_SESSION_KEY not set, using the development key. \
                         Sessions will not survive scrutiny outside local development."
                    );
                    DEV_SESSION_KEY.to_string()
                } else {
                    panic!("STAGELINK_SESSION_KEY must be set in release builds");
                }
            }
        };

        let ttl_hours = match std::env::var("STAGELINK_SESSION_TTL_HOURS") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "STAGELINK_SESSION_TTL_HOURS '{}' is not a number, using {}",
                    raw,
                    DEFAULT_SESSION_TTL_HOURS
                );
                DEFAULT_SESSION_TTL_HOURS
            }),
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        let insecure = std::env::var("STAGELINK_INSECURE_COOKIES")
            .map(|raw| raw == "1" || raw.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if insecure {
            tracing::warn!("STAGELINK_INSECURE_COOKIES set, session cookies sent without Secure");
        }

        Self {
            bind_addr,
            data_dir,
            session_key,
            session_ttl: Duration::from_secs(ttl_hours * 3600),
            secure_cookies: !insecure,
        }
    }
}

impl Default for ServerConfig {
    /// Local-development values, also used by tests
    fn default() -> Self {
        Self {
            bind_addr: default_addr(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            session_key: DEV_SESSION_KEY.to_string(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_HOURS * 3600),
            secure_cookies: false,
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}
