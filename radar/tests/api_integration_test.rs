mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::NamedTempFile;
use tower::ServiceExt;

use radar::api::{create_router, AppState};
use radar::config::{Config, DatabaseConfig};
use radar::db::{Database, LibSqlBackend, RadarBackend};
use radar::models::MomentumDirection;

use common::{seed, StubAdapter};

const KEY: &str = "integration-key";

async fn app() -> (axum::Router, Arc<dyn RadarBackend>, NamedTempFile) {
    let file = NamedTempFile::new().unwrap();
    let mut config = Config::default();
    config.server.api_keys = vec![KEY.to_string()];
    config.database = DatabaseConfig::local(format!("file:{}", file.path().display()));

    let db = Database::new(&config.database).await.unwrap();
    let db: Arc<dyn RadarBackend> = Arc::new(LibSqlBackend::new(db));
    let adapter = StubAdapter::default()
        .with_scenes("ada", &["uk-drill"])
        .with_scenes("bex", &["uk-drill"]);
    let state = AppState::new(config, db.clone(), Arc::new(adapter)).unwrap();
    (create_router(state), db, file)
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {KEY}"))
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn wrong_key_is_unauthorized() {
    let (app, _db, _file) = app().await;
    let req = Request::builder()
        .uri("/api/v1/pulse")
        .header("Authorization", "Bearer nope")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["code"], "unauthorized");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn pulse_envelope() {
    let (app, db, _file) = app().await;
    seed(&db, "ada", None, |s| {
        s.momentum = 88.0;
        s.breakout_probability = 0.8;
    })
    .await;

    let (status, json) = send(&app, request("GET", "/api/v1/pulse?limit=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["topRising"][0]["artistSlug"], "ada");
    assert_eq!(json["data"]["summary"]["totalArtistsTracked"], 1);
    assert_eq!(json["data"]["summary"]["highBreakoutCount"], 1);
    assert!(json.get("error").is_none());

    let (status, json) = send(&app, request("GET", "/api/v1/pulse?limit=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "invalid_request");
}

#[tokio::test]
async fn insights_generate_then_list() {
    let (app, db, _file) = app().await;
    seed(&db, "ada", None, |s| {
        s.breakout_probability = 0.9;
        s.momentum_direction = MomentumDirection::StronglyUp;
    })
    .await;

    let (status, json) = send(&app, request("POST", "/api/v1/users/u1/insights:generate")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["userId"], "u1");
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["insights"]["candidate-to-watch"][0]["userId"], "u1");

    let (status, json) = send(&app, request("GET", "/api/v1/users/u1/insights?limit=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["type"], "candidate-to-watch");
}

#[tokio::test]
async fn collaboration_routes() {
    let (app, db, _file) = app().await;
    seed(&db, "ada", None, |_| {}).await;
    seed(&db, "bex", None, |_| {}).await;
    db.add_roster_member("r1", "ada").await.unwrap();
    db.add_roster_member("r1", "bex").await.unwrap();

    let (status, json) = send(&app, request("GET", "/api/v1/collaborations:assess?a=ada&b=bex")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["components"]["sceneOverlap"], 1.0);
    assert_eq!(json["data"]["sharedScenes"][0], "uk-drill");

    let (status, json) = send(&app, request("GET", "/api/v1/collaborations:assess?a=ada&b=ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");

    let (status, json) = send(
        &app,
        request("GET", "/api/v1/rosters/r1/collaborations?minCompatibility=0.1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["artistA"], "ada");

    let (status, json) = send(&app, request("GET", "/api/v1/rosters/r1/collaborations/ada?minCompatibility=0.1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["artistB"], "bex");
}

#[tokio::test]
async fn refresh_unknown_artist_is_not_found() {
    let (app, _db, _file) = app().await;
    let (status, json) = send(&app, request("POST", "/api/v1/artists/ghost/scores:refresh")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}
