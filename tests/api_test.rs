//! REST API integration tests
//!
//! Exercises the show-day surface end to end through the router: show
//! metadata and index, running order replacement, alerts with history, and
//! the artist roster. Handler-level edge cases live next to the handlers;
//! these tests cover the HTTP wiring, status mapping and role enforcement.
mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{seed_staff, session_cookie, test_state, test_state_with_store};
use stagelink::backend::routes::create_router;
use stagelink::backend::store::MemoryStore;
use stagelink::shared::roles::Role;

fn request(method: Method, path: &str, token: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::COOKIE, session_cookie(token));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

#[tokio::test]
async fn test_show_day_flow() {
    let state = test_state();
    let coordinator = seed_staff(&state, "mara", Role::Coordinator).await;
    let tech = seed_staff(&state, "sam", Role::Tech).await;
    let app = create_router(state);

    // Coordinator sets up the show
    let created = send(
        &app,
        request(
            Method::PUT,
            "/api/shows/gala",
            &coordinator.token,
            Some(&json!({"name": "Winter Gala", "date": "2026-12-12"})),
        ),
    )
    .await;
    assert_eq!(created.status(), StatusCode::OK);
    assert_eq!(body_json(created).await["id"], json!("gala"));

    let index = send(&app, request(Method::GET, "/api/shows", &tech.token, None)).await;
    assert_eq!(
        body_json(index).await,
        json!([{"id": "gala", "name": "Winter Gala", "date": "2026-12-12"}])
    );

    // Tech replaces the running order wholesale
    let order = json!([
        {"artist": "dj-nova", "slot": 1},
        {"artist": "the-hollow-suns", "slot": 2},
    ]);
    let put_order = send(
        &app,
        request(
            Method::PUT,
            "/api/shows/gala/running-order",
            &tech.token,
            Some(&order),
        ),
    )
    .await;
    assert_eq!(put_order.status(), StatusCode::OK);

    let read_order = send(
        &app,
        request(
            Method::GET,
            "/api/shows/gala/running-order",
            &coordinator.token,
            None,
        ),
    )
    .await;
    assert_eq!(body_json(read_order).await, order);

    // Alert raised, observed, cleared; two history entries remain
    let raised = send(
        &app,
        request(
            Method::PUT,
            "/api/shows/gala/alert",
            &tech.token,
            Some(&json!({"message": "Fog machine on fire"})),
        ),
    )
    .await;
    assert_eq!(raised.status(), StatusCode::OK);
    assert_eq!(body_json(raised).await["raised_by"], json!("sam"));

    let active = send(
        &app,
        request(Method::GET, "/api/shows/gala/alert", &coordinator.token, None),
    )
    .await;
    assert_eq!(
        body_json(active).await["message"],
        json!("Fog machine on fire")
    );

    let cleared = send(
        &app,
        request(Method::DELETE, "/api/shows/gala/alert", &tech.token, None),
    )
    .await;
    assert_eq!(cleared.status(), StatusCode::OK);
    assert_eq!(body_json(cleared).await, Value::Null);

    let history = send(
        &app,
        request(
            Method::GET,
            "/api/shows/gala/alert/history",
            &coordinator.token,
            None,
        ),
    )
    .await;
    let entries = body_json(history).await;
    assert_eq!(entries.as_array().map(Vec::len), Some(2));
    assert_eq!(entries[1]["cleared_by"], json!("sam"));
}

#[tokio::test]
async fn test_artist_roster_roundtrip() {
    let state = test_state();
    let coordinator = seed_staff(&state, "mara", Role::Coordinator).await;
    let app = create_router(state);

    let saved = send(
        &app,
        request(
            Method::PUT,
            "/api/artists/dj-nova",
            &coordinator.token,
            Some(&json!({"name": "DJ Nova", "bio": "late set", "show_id": "gala"})),
        ),
    )
    .await;
    assert_eq!(saved.status(), StatusCode::OK);

    let roster = send(
        &app,
        request(Method::GET, "/api/artists", &coordinator.token, None),
    )
    .await;
    assert_eq!(
        body_json(roster).await,
        json!([{"id": "dj-nova", "name": "DJ Nova", "show_id": "gala"}])
    );

    let profile = send(
        &app,
        request(Method::GET, "/api/artists/dj-nova", &coordinator.token, None),
    )
    .await;
    assert_eq!(body_json(profile).await["bio"], json!("late set"));
}

#[tokio::test]
async fn test_only_coordinators_edit_show_metadata() {
    let state = test_state();
    let performer = seed_staff(&state, "io", Role::Performer).await;
    let app = create_router(state);

    let denied = send(
        &app,
        request(
            Method::PUT,
            "/api/shows/gala",
            &performer.token,
            Some(&json!({"name": "Hostile Takeover"})),
        ),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    // but a performer may still raise an alert
    let raised = send(
        &app,
        request(
            Method::PUT,
            "/api/shows/gala/alert",
            &performer.token,
            Some(&json!({"message": "Monitor wedge is dead"})),
        ),
    )
    .await;
    assert_eq!(raised.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_ids_answer_400() {
    let state = test_state();
    let staff = seed_staff(&state, "sam", Role::Tech).await;
    let app = create_router(state);

    for path in ["/api/shows/Gala", "/api/artists/DJ%20Nova"] {
        let response = send(&app, request(Method::GET, path, &staff.token, None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
    }
}

#[tokio::test]
async fn test_unknown_show_answers_404() {
    let state = test_state();
    let staff = seed_staff(&state, "sam", Role::Tech).await;
    let app = create_router(state);

    let response = send(
        &app,
        request(Method::GET, "/api/shows/ghost-show", &staff.token, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["error"]
        .as_str()
        .is_some_and(|e| e.contains("ghost-show")));
}

#[tokio::test]
async fn test_store_outage_maps_to_503() {
    let store = Arc::new(MemoryStore::new());
    let state = test_state_with_store(store.clone());
    let staff = seed_staff(&state, "sam", Role::Tech).await;
    let app = create_router(state);

    store.set_unavailable(true);
    let response = send(&app, request(Method::GET, "/api/shows", &staff.token, None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["status"], json!(503));

    // the outage does not wedge anything; recovery is immediate
    store.set_unavailable(false);
    let response = send(&app, request(Method::GET, "/api/shows", &staff.token, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
