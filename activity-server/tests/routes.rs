//! Route tests against a mock PHP upstream

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use activity_server::gateway::{SignatureScheme, UpstreamTarget, signer};
use activity_server::{AppState, Config, create_router};
use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

#[derive(Default)]
struct Upstream {
    calls: AtomicUsize,
    seen: Mutex<Vec<Seen>>,
}

#[derive(Clone)]
struct Seen {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
}

impl Upstream {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last(&self) -> Seen {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

fn form_fields(body: &str) -> HashMap<String, String> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn reply(body: Value) -> Response {
    axum::Json(body).into_response()
}

async fn php(
    State(upstream): State<Arc<Upstream>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    upstream.calls.fetch_add(1, Ordering::SeqCst);
    let body = String::from_utf8_lossy(&body).to_string();
    upstream.seen.lock().unwrap().push(Seen {
        method,
        uri,
        headers,
        body: body.clone(),
    });

    let route = query.get("r").map(String::as_str).unwrap_or_default();
    let activity = query.get("activity_id").map(String::as_str).unwrap_or_default();

    match (route, activity) {
        ("admin.login", _) => {
            let form = form_fields(&body);
            if form.get("username").map(String::as_str) == Some("admin")
                && form.get("password").map(String::as_str) == Some("secret")
            {
                reply(json!({
                    "code": 200,
                    "msg": "ok",
                    "data": {"token": "tok-1", "user": {"username": "admin", "role": "super"}}
                }))
            } else {
                reply(json!({"code": 1002, "msg": "wrong password"}))
            }
        }
        ("admin.verifyToken", _) => reply(json!({"success": true, "data": {"valid": true}})),
        ("activity.getConfig", "nested") => reply(json!({
            "code": 0,
            "data": {"data": [{"a": 1}], "total": 1}
        })),
        ("activity.getConfig", "missing") => reply(json!({"code": 5, "msg": "activity not found"})),
        ("activity.getConfig", "html") => "<html>Fatal error</html>".into_response(),
        ("activity.getConfig", "status") => StatusCode::BAD_GATEWAY.into_response(),
        ("activity.getConfig", "slow") => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            reply(json!({"code": 0, "data": {}}))
        }
        ("activity.getConfig", _) => reply(json!({
            "code": 0,
            "data": {"activity_id": activity, "enabled": true, "update_time": "2024-05-01 10:00:00"}
        })),
        ("activity.saveConfig", _) => reply(json!({"code": 1, "msg": "save failed"})),
        ("monitor.getData", "down") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        ("monitor.getData", _) => reply(json!({
            "code": 0,
            "data": {"series": {"hour": "00:00", "participants": 3}, "alerts": null}
        })),
        ("cache.reload", _) => reply(json!({"code": 200, "data": {}})),
        ("cache.delete", _) => reply(json!({"code": 1, "msg": "key locked"})),
        ("signin.records", _) => reply(json!({
            "code": 0,
            "data": {"list": {"id": 1, "update_time": "t1"}, "total": 1}
        })),
        _ => reply(json!({"code": 404, "msg": "unknown route"})),
    }
}

async fn spawn_upstream() -> (String, Arc<Upstream>) {
    let upstream = Arc::new(Upstream::default());
    let app = Router::new()
        .route("/index.php", any(php))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), upstream)
}

fn server_for(base_url: &str, timeout: Duration) -> Router {
    let mut config = Config::from_lookup(|name| match name {
        "UPSTREAM_SECRET" => Some(SECRET.to_string()),
        _ => None,
    })
    .unwrap();
    config.gateway.target = UpstreamTarget::new(base_url, "/index.php");
    config.gateway.timeout = timeout;
    create_router(AppState::new(config).unwrap())
}

async fn setup() -> (Router, Arc<Upstream>, String) {
    let (base, upstream) = spawn_upstream().await;
    (server_for(&base, Duration::from_secs(5)), upstream, base)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_nested_data_takes_precedence() {
    let (app, _, _) = setup().await;
    let (status, body) = get(&app, "/api/activity/config?activity_id=nested").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], json!([{"a": 1}]));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_config_field_rename() {
    let (app, _, _) = setup().await;
    let (_, body) = get(&app, "/api/activity/config?activity_id=a1").await;

    assert_eq!(body["data"]["updated_time"], "2024-05-01 10:00:00");
    assert!(body["data"].get("update_time").is_none());
}

#[tokio::test]
async fn test_business_failure_is_200() {
    let (app, _, _) = setup().await;
    let (status, body) = get(&app, "/api/activity/config?activity_id=missing").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "activity not found");
    assert_eq!(body["error"], "upstream code 5");
}

#[tokio::test]
async fn test_timeout_is_500() {
    let (base, _) = spawn_upstream().await;
    let app = server_for(&base, Duration::from_millis(200));
    let (status, body) = get(&app, "/api/activity/config?activity_id=slow").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Upstream service timed out");
}

#[tokio::test]
async fn test_non_json_body_is_500() {
    let (app, _, _) = setup().await;
    let (status, body) = get(&app, "/api/activity/config?activity_id=html").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Upstream returned malformed data");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upstream_error_status_is_500() {
    let (app, _, _) = setup().await;
    let (status, body) = get(&app, "/api/activity/config?activity_id=status").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "upstream returned HTTP 502");
}

#[tokio::test]
async fn test_save_failure_never_succeeds() {
    let (app, _, _) = setup().await;
    let (status, body) = post(
        &app,
        "/api/activity/config",
        json!({"activity_id": "a1", "config": {"enabled": true}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "save failed");
    assert!(body["data"].is_null());
    assert!(body.get("fallback").is_none());
}

#[tokio::test]
async fn test_save_sends_json_body() {
    let (app, upstream, _) = setup().await;
    post(
        &app,
        "/api/activity/config",
        json!({"activity_id": "a1", "config": {"enabled": true}}),
    )
    .await;

    let seen = upstream.last();
    assert_eq!(seen.method, Method::POST);
    let sent: Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(sent, json!({"activity_id": "a1", "config": {"enabled": true}}));
}

#[tokio::test]
async fn test_delete_failure_never_succeeds() {
    let (app, _, _) = setup().await;
    let (status, body) = post(&app, "/api/cache/delete", json!({"key": "k1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "key locked");
}

#[tokio::test]
async fn test_reload_accepts_code_200_and_empty_body() {
    let (app, _, _) = setup().await;
    let request = Request::post("/api/cache/reload").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Cache reloaded");
}

#[tokio::test]
async fn test_record_list_is_coerced() {
    let (app, _, _) = setup().await;
    let (status, body) = get(&app, "/api/activities/sign-in/records?activity_id=a1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["list"], json!([{"id": 1, "updated_time": "t1"}]));
}

#[tokio::test]
async fn test_monitor_coerces_series_and_alerts() {
    let (app, _, _) = setup().await;
    let (_, body) = get(&app, "/api/monitor?activity_id=a1&date=2024-05-01").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["series"], json!([{"hour": "00:00", "participants": 3}]));
    assert_eq!(body["data"]["alerts"], json!([]));
}

#[tokio::test]
async fn test_dashboard_fallback_is_flagged_and_deterministic() {
    let (app, _, _) = setup().await;
    let uri = "/api/monitor?activity_id=down&date=2024-05-01";
    let (status, first) = get(&app, uri).await;
    let (_, second) = get(&app, uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["success"], true);
    assert_eq!(first["fallback"], true);
    assert_eq!(first["data"]["date"], "2024-05-01");
    assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn test_unknown_upstream_route_falls_back_on_dashboard() {
    let (app, _, _) = setup().await;
    let (status, body) = get(&app, "/api/activities/lottery/records").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["data"]["list"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_missing_field_is_400_without_upstream_call() {
    let (app, upstream, _) = setup().await;

    let (status, body) = get(&app, "/api/activity/config").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing required field: activity_id");

    let (status, _) = post(&app, "/api/auth/login", json!({"username": "admin"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/api/cache/delete", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_bad_input_is_400() {
    let (app, upstream, _) = setup().await;

    let (status, _) = get(&app, "/api/activities/bingo/records").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/api/monitor?activity_id=a1&date=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::post("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_login_success() {
    let (app, upstream, _) = setup().await;
    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({"username": "admin", "password": "secret"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["token"], "tok-1");
    assert_eq!(body["data"]["user"]["username"], "admin");

    let seen = upstream.last();
    assert_eq!(form_fields(&seen.body).get("username").unwrap(), "admin");
}

#[tokio::test]
async fn test_login_rejected_keeps_upstream_message() {
    let (app, _, _) = setup().await;
    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({"username": "admin", "password": "nope"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "wrong password");
}

#[tokio::test]
async fn test_login_transport_failure_message() {
    // Nothing listens on this port once the listener is dropped
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = server_for(&format!("http://{addr}"), Duration::from_secs(2));
    let (status, body) = post(
        &app,
        "/api/auth/login",
        json!({"username": "admin", "password": "secret"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication service unavailable");
}

#[tokio::test]
async fn test_verify_accepts_success_flag() {
    let (app, _, _) = setup().await;
    let (status, body) = post(&app, "/api/auth/verify", json!({"token": "tok-1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["valid"], true);
}

#[tokio::test]
async fn test_outbound_call_is_signed() {
    let (app, upstream, base) = setup().await;
    get(&app, "/api/activity/config?activity_id=a1").await;

    let seen = upstream.last();
    let timestamp: i64 = seen.headers["x-timestamp"].to_str().unwrap().parse().unwrap();
    let url = format!("{base}{}", seen.uri);
    let expected = signer::sign(SignatureScheme::Digest, "GET", &url, timestamp, SECRET);

    assert_eq!(seen.headers["x-signature"].to_str().unwrap(), expected);
    assert_eq!(seen.headers["x-client-id"].to_str().unwrap(), "activity-admin");
    assert!(!seen.headers["x-request-id"].is_empty());

    let query = seen.uri.query().unwrap();
    assert!(query.starts_with("r=activity.getConfig&uid="));
    assert!(query.contains("&debug=1&"));
}

#[tokio::test]
async fn test_field_mapping_falls_back_to_local_dictionary() {
    let (app, _, _) = setup().await;
    let (status, body) = get(&app, "/api/field-mapping").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["data"]["uid"], "User ID");
}

#[tokio::test]
async fn test_unknown_route_is_404_envelope() {
    let (app, _, _) = setup().await;
    let (status, body) = get(&app, "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health() {
    let (app, _, _) = setup().await;
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
}
