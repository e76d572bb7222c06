/// API integration tests
/// Tests complete HTTP request/response cycles with a real database
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use common::{create_test_database, fixtures, TestDb};
use http_body_util::BodyExt;
use mixtape_server::{api, middleware, services::AuthService, state::AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

/// Helper to create the test app router
async fn create_test_app() -> (Router, TestDb, Arc<AuthService>) {
    let db = create_test_database().await.unwrap();

    let auth_service = Arc::new(AuthService::new("test-secret-key".to_string(), 1));

    let app_state = AppState::new(db.pool.clone(), Arc::clone(&auth_service));

    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout));

    let protected_routes = Router::new()
        .route("/auth/me", get(api::auth::me))
        .route("/playlists", get(api::playlists::list_playlists))
        .route("/playlists", post(api::playlists::create_playlist))
        .route(
            "/playlists/public",
            get(api::playlists::list_public_playlists),
        )
        .route(
            "/playlists/followed",
            get(api::playlists::list_followed_playlists),
        )
        .route("/playlists/:id", get(api::playlists::get_playlist))
        .route("/playlists/:id", delete(api::playlists::delete_playlist))
        .route(
            "/playlists/:id/songs",
            post(api::playlists::add_song_to_playlist),
        )
        .route(
            "/playlists/:id/songs/:song_id",
            delete(api::playlists::remove_song_from_playlist),
        )
        .route(
            "/playlists/:id/follow",
            post(api::playlists::follow_playlist),
        )
        .route("/songs", post(api::songs::create_song))
        .route("/admin/users", get(api::admin::list_users))
        .route("/admin/stats", get(api::admin::stats))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    let app = Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(app_state);

    (app, db, auth_service)
}

/// Send a JSON request, optionally authenticated with a bearer token
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Register a user through the API, returning its token
async fn register_user(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": fixtures::TEST_PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Log a user in through the API, returning its token
async fn login_user(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({
            "username": username,
            "password": fixtures::TEST_PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Catalog fixture: insert an artist and a song directly
async fn seed_song(db: &TestDb, title: &str) -> i64 {
    let artist = sqlx::query("INSERT INTO artists (name) VALUES ('Test Artist')")
        .execute(&db.pool)
        .await
        .unwrap()
        .last_insert_rowid();

    sqlx::query("INSERT INTO songs (title, duration_seconds, artist_id) VALUES (?, 180, ?)")
        .bind(title)
        .bind(artist)
        .execute(&db.pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _db, _auth) = create_test_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_protected_route_requires_auth() {
    let (app, _db, _auth) = create_test_app().await;

    let (status, body) = send(&app, "GET", "/api/playlists", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_register_sets_cookie_and_login_flow() {
    let (app, _db, _auth) = create_test_app().await;

    // Register
    let request = Request::builder()
        .uri("/api/auth/register")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "username": fixtures::TEST_USERNAME,
                "email": fixtures::TEST_EMAIL,
                "password": fixtures::TEST_PASSWORD,
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The token travels in an HttpOnly cookie
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("register should set the auth cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("mixtape_token="));
    assert!(set_cookie.contains("HttpOnly"));

    // The cookie authenticates follow-up requests
    let cookie_pair = set_cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::COOKIE, cookie_pair)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Wrong password is rejected
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({
            "username": fixtures::TEST_USERNAME,
            "password": "wrong-password",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Right password returns a fresh token
    let token = login_user(&app, fixtures::TEST_USERNAME).await;
    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], fixtures::TEST_USERNAME);
}

#[tokio::test]
async fn test_duplicate_registration_conflict() {
    let (app, _db, _auth) = create_test_app().await;

    register_user(&app, "alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "alice",
            "email": "alice2@example.com",
            "password": fixtures::TEST_PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_playlist_membership_endpoints() {
    let (app, db, _auth) = create_test_app().await;

    let token = register_user(&app, "owner").await;
    let song_id = seed_song(&db, "Song One").await;

    // Create playlist
    let (status, playlist) = send(
        &app,
        "POST",
        "/api/playlists",
        Some(&token),
        Some(json!({ "name": "My Mix" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let playlist_id = playlist["id"].as_i64().unwrap();

    // Add song: 201 with the created membership record
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/playlists/{playlist_id}/songs"),
        Some(&token),
        Some(json!({ "songId": song_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["position"], 1);
    assert_eq!(body["data"]["song_id"], song_id);

    // Duplicate add: 409, standard error shape
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/playlists/{playlist_id}/songs"),
        Some(&token),
        Some(json!({ "songId": song_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["error"]["message"].is_string());

    // Out-of-range position: 400
    let other_song = seed_song(&db, "Song Two").await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/playlists/{playlist_id}/songs"),
        Some(&token),
        Some(json!({ "songId": other_song, "order": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing playlist: 404
    let (status, _) = send(
        &app,
        "POST",
        "/api/playlists/9999/songs",
        Some(&token),
        Some(json!({ "songId": song_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Remove: success envelope
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/playlists/{playlist_id}/songs/{song_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["message"].is_string());

    // Removing again: 404
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/playlists/{playlist_id}/songs/{song_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_owner_cannot_modify_membership() {
    let (app, db, _auth) = create_test_app().await;

    let owner_token = register_user(&app, "owner").await;
    let other_token = register_user(&app, "other").await;
    let song_id = seed_song(&db, "Song").await;

    // Owner creates a public playlist (visible to the other user)
    let (status, playlist) = send(
        &app,
        "POST",
        "/api/playlists",
        Some(&owner_token),
        Some(json!({ "name": "Public Mix", "is_public": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let playlist_id = playlist["id"].as_i64().unwrap();

    // The other user can read it
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/playlists/{playlist_id}"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // But not add songs to it
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/playlists/{playlist_id}/songs"),
        Some(&other_token),
        Some(json!({ "songId": song_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    // Following works, though
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/playlists/{playlist_id}/follow"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, followed) = send(
        &app,
        "GET",
        "/api/playlists/followed",
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(followed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_private_playlist_hidden_from_others() {
    let (app, _db, _auth) = create_test_app().await;

    let owner_token = register_user(&app, "owner").await;
    let other_token = register_user(&app, "other").await;

    let (_, playlist) = send(
        &app,
        "POST",
        "/api/playlists",
        Some(&owner_token),
        Some(json!({ "name": "Secret Mix" })),
    )
    .await;
    let playlist_id = playlist["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/playlists/{playlist_id}"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/playlists/{playlist_id}"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_gating() {
    let (app, db, _auth) = create_test_app().await;

    register_user(&app, "worker").await;

    // Plain users cannot touch the catalog back office
    let token = login_user(&app, "worker").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/songs",
        Some(&token),
        Some(json!({ "title": "New Song", "duration_seconds": 200, "artist_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Promote to MANAGER; roles are carried in the token, so log in again
    sqlx::query("UPDATE users SET role = 'MANAGER' WHERE username = 'worker'")
        .execute(&db.pool)
        .await
        .unwrap();
    let token = login_user(&app, "worker").await;

    sqlx::query("INSERT INTO artists (name) VALUES ('Seeded Artist')")
        .execute(&db.pool)
        .await
        .unwrap();

    let (status, song) = send(
        &app,
        "POST",
        "/api/songs",
        Some(&token),
        Some(json!({ "title": "New Song", "duration_seconds": 200, "artist_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(song["title"], "New Song");

    // Stats open to managers, user administration is not
    let (status, stats) = send(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["songs"], 1);

    let (status, _) = send(&app, "GET", "/api/admin/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admins see everything
    sqlx::query("UPDATE users SET role = 'ADMIN' WHERE username = 'worker'")
        .execute(&db.pool)
        .await
        .unwrap();
    let token = login_user(&app, "worker").await;

    let (status, users) = send(&app, "GET", "/api/admin/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 1);
}
