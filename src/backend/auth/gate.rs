/**
 * Access Gate
 *
 * Route-level protection. The session token travels in an HTTP-only cookie;
 * the gate decides per request whether the path is public, a page route it
 * must check itself, or an API/socket route that owns its check.
 *
 * Behavior by route class:
 * 1. Allow-listed paths pass untouched
 * 2. Page routes: missing/invalid session redirects to /login; a valid
 *    session whose role does not satisfy the matched prefix redirects to /
 * 3. `/api/` routes pass through and check the cookie themselves via the
 *    `AuthSession` extractor, answering 401 JSON instead of redirecting
 * 4. `/ws/` routes pass through; the socket handshake owns authentication
 *
 * The allow-list and the role rules are static tables, not conditionals
 * scattered over handlers.
 */
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::COOKIE, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::backend::auth::tokens::SessionClaims;
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::shared::protocol::SESSION_COOKIE;
use crate::shared::roles::Role;

/// Paths admitted without a session
const PUBLIC_PATHS: &[&str] = &["/", "/login", "/api/auth/login", "/api/auth/logout"];

/// Path prefixes admitted without a session
const PUBLIC_PREFIXES: &[&str] = &["/static/"];

/// Page prefixes with a minimum role; first match wins
const ROLE_RULES: &[(&str, Role)] = &[
    ("/coordinator", Role::Coordinator),
    ("/tech", Role::Tech),
    ("/performer", Role::Performer),
];

/// Verified session data attached to a request
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub staff_id: Uuid,
    pub name: String,
    pub role: Role,
}

impl AuthSession {
    /// Build from verified claims; fails only on an unparseable subject
    pub fn from_claims(claims: &SessionClaims) -> Result<Self, crate::backend::auth::tokens::TokenError> {
        Ok(Self {
            staff_id: claims.staff_id()?,
            name: claims.name.clone(),
            role: claims.role,
        })
    }
}

/// Whether a path is on the public allow-list
pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// The role a page prefix requires, if any
pub fn required_role(path: &str) -> Option<Role> {
    ROLE_RULES
        .iter()
        .find(|(prefix, _)| path == *prefix || path.starts_with(&format!("{}/", prefix)))
        .map(|(_, role)| *role)
}

/// Pull the session token out of the Cookie header(s)
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Build the Set-Cookie value that installs a session
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, token);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears a session
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Access gate middleware
///
/// Installed over the whole router. Page routes that pass the gate carry an
/// `AuthSession` extension for their handlers.
pub async fn access_gate(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_public(&path) {
        return next.run(request).await;
    }
    // API and socket routes own their checks (401 JSON / socket handshake)
    if path.starts_with("/api/") || path.starts_with("/ws/") {
        return next.run(request).await;
    }

    // Page route: a session is required
    let Some(token) = session_token_from_headers(request.headers()) else {
        tracing::debug!("[Gate] No session for page {}, redirecting to login", path);
        return Redirect::to("/login").into_response();
    };

    let claims = match app_state.tokens.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("[Gate] Rejected session for page {}: {}", path, e);
            return Redirect::to("/login").into_response();
        }
    };
    let session = match AuthSession::from_claims(&claims) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("[Gate] Unusable claims for page {}: {}", path, e);
            return Redirect::to("/login").into_response();
        }
    };

    if let Some(required) = required_role(&path) {
        if !session.role.satisfies(required) {
            tracing::warn!(
                "[Gate] Role {} does not satisfy {} required by {}",
                session.role,
                required,
                path
            );
            return Redirect::to("/").into_response();
        }
    }

    request.extensions_mut().insert(session);
    next.run(request).await
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Page routes already carry the session the gate verified
        if let Some(session) = parts.extensions.get::<AuthSession>() {
            return Ok(session.clone());
        }

        // API routes verify the cookie themselves
        let token = session_token_from_headers(&parts.headers).ok_or_else(|| {
            tracing::debug!("[Gate] API request without session cookie");
            ApiError::unauthorized("Missing session")
        })?;

        let claims = state.tokens.verify(&token).map_err(|e| {
            tracing::warn!("[Gate] Rejected API session: {}", e);
            ApiError::from(e)
        })?;

        AuthSession::from_claims(&claims).map_err(|e| {
            tracing::warn!("[Gate] Unusable API claims: {}", e);
            ApiError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_public_paths() {
        assert!(is_public("/"));
        assert!(is_public("/login"));
        assert!(is_public("/api/auth/login"));
        assert!(is_public("/static/app.css"));
        assert!(!is_public("/coordinator"));
        assert!(!is_public("/api/shows"));
    }

    #[test]
    fn test_role_rules_match_prefixes() {
        assert_eq!(required_role("/coordinator"), Some(Role::Coordinator));
        assert_eq!(
            required_role("/coordinator/running-order"),
            Some(Role::Coordinator)
        );
        assert_eq!(required_role("/tech/patchbay"), Some(Role::Tech));
        assert_eq!(required_role("/performer"), Some(Role::Performer));
        assert_eq!(required_role("/about"), None);
        // prefix match is per segment, not per character
        assert_eq!(required_role("/technical-rider"), None);
    }

    #[test]
    fn test_cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; stagelink_session=tok123; lang=en"),
        );
        assert_eq!(
            session_token_from_headers(&headers),
            Some("tok123".to_string())
        );

        let mut empty = HeaderMap::new();
        empty.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token_from_headers(&empty), None);

        let mut blank = HeaderMap::new();
        blank.insert(COOKIE, HeaderValue::from_static("stagelink_session="));
        assert_eq!(session_token_from_headers(&blank), None);
    }

    #[test]
    fn test_cookie_builders() {
        let cookie = session_cookie("tok123", true);
        assert!(cookie.starts_with("stagelink_session=tok123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));

        let dev_cookie = session_cookie("tok123", false);
        assert!(!dev_cookie.contains("Secure"));

        let cleared = clear_session_cookie(false);
        assert!(cleared.contains("Max-Age=0"));
    }
}
