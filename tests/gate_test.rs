//! Access gate integration tests
//!
//! Drives the full router with tower's `oneshot` to verify each route class:
//! public paths pass untouched, page routes redirect on missing sessions or
//! insufficient roles, and API routes answer 401 JSON instead of redirecting.
mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use common::{seed_staff, session_cookie, test_state};
use stagelink::backend::routes::create_router;
use stagelink::shared::roles::Role;

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn get_as(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, session_cookie(token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_public_paths_pass_without_session() {
    let app = create_router(test_state());

    // No page is mounted at /login; the point is the gate does not
    // redirect it back onto itself.
    for path in ["/", "/login"] {
        let response = app.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::NOT_FOUND,
            "{} should reach the fallback, not a redirect",
            path
        );
    }
}

#[tokio::test]
async fn test_page_without_session_redirects_to_login() {
    let app = create_router(test_state());

    for path in ["/coordinator", "/tech/patchbay", "/about"] {
        let response = app.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(response.headers()[header::LOCATION], "/login", "{}", path);
    }
}

#[tokio::test]
async fn test_page_with_garbage_session_redirects_to_login() {
    let app = create_router(test_state());

    let response = app
        .oneshot(get_as("/coordinator", "not.a.token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_role_mismatch_redirects_home() {
    let state = test_state();
    let performer = seed_staff(&state, "io", Role::Performer).await;
    let app = create_router(state);

    // A valid session that lacks the role is sent home, not to login
    let response = app
        .oneshot(get_as("/coordinator", &performer.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_sufficient_role_passes_the_gate() {
    let state = test_state();
    let coordinator = seed_staff(&state, "mara", Role::Coordinator).await;
    let app = create_router(state);

    // Coordinators outrank every page prefix; with no page handlers
    // mounted, passing the gate means reaching the 404 fallback.
    for path in ["/coordinator", "/tech", "/performer", "/tech/patchbay"] {
        let response = app
            .clone()
            .oneshot(get_as(path, &coordinator.token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
    }
}

#[tokio::test]
async fn test_role_prefixes_match_per_segment() {
    let state = test_state();
    let performer = seed_staff(&state, "io", Role::Performer).await;
    let app = create_router(state);

    // /tech turns a performer back, /technical-rider is not a tech page
    let blocked = app
        .clone()
        .oneshot(get_as("/tech", &performer.token))
        .await
        .unwrap();
    assert_eq!(blocked.status(), StatusCode::SEE_OTHER);

    let unmatched = app
        .oneshot(get_as("/technical-rider", &performer.token))
        .await
        .unwrap();
    assert_eq!(unmatched.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_without_session_is_401_not_redirect() {
    let app = create_router(test_state());

    let response = app.oneshot(get("/api/shows")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn test_api_with_session_passes() {
    let state = test_state();
    let performer = seed_staff(&state, "io", Role::Performer).await;
    let app = create_router(state);

    // Reads require a session but no particular role
    let response = app
        .oneshot(get_as("/api/shows", &performer.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let state = test_state();
    let staff = seed_staff(&state, "mara", Role::Coordinator).await;
    let expired = state
        .tokens
        .issue(&staff.profile, std::time::Duration::ZERO)
        .unwrap();
    let app = create_router(state);

    // Correctly signed but past its expiry: API rejects, page redirects
    let api = app
        .clone()
        .oneshot(get_as("/api/shows", &expired))
        .await
        .unwrap();
    assert_eq!(api.status(), StatusCode::UNAUTHORIZED);

    let page = app.oneshot(get_as("/coordinator", &expired)).await.unwrap();
    assert_eq!(page.status(), StatusCode::SEE_OTHER);
    assert_eq!(page.headers()[header::LOCATION], "/login");
}
