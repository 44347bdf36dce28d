use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use domain::{PingMethod, UnitStatus};
use fleet_backend::{BackendError, FleetBackend, HttpBackendOptions, HttpFleetBackend, UnitUpdate};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("127.0.0.1:{}", addr.port())
}

fn client(addr: &str, token: Option<&str>) -> HttpFleetBackend {
    client_with_credentials(addr, token, None)
}

fn client_with_credentials(
    addr: &str,
    token: Option<&str>,
    credentials: Option<(&str, &str)>,
) -> HttpFleetBackend {
    HttpFleetBackend::new(HttpBackendOptions {
        base_url: format!("http://{addr}/"),
        request_timeout: Duration::from_secs(2),
        ping_timeout: Duration::from_millis(500),
        unit_port: 8000,
        token: token.map(str::to_string),
        credentials: credentials
            .map(|(username, password)| (username.to_string(), password.to_string())),
    })
    .expect("client")
}

fn fake_backend() -> Router {
    Router::new()
        .route(
            "/api/compute_units",
            get(|| async {
                Json(json!({"compute_units": [
                    {"id": 1, "name": "edge-1", "ip_address": "10.0.0.5", "ipAddress": "10.0.0.5",
                     "status": "online", "last_seen": "2024-05-01 10:00:00", "lastSeen": "2024-05-01 10:00:00"},
                    {"id": 2, "name": "broken"}
                ]}))
            })
            .post(|Json(body): Json<Value>| async move {
                if body["ip_address"] == "10.0.0.9" {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({"message": "Compute unit with this IP already exists"})),
                    );
                }
                (
                    StatusCode::CREATED,
                    Json(json!({"compute_unit": {
                        "id": 7,
                        "name": body["name"].as_str().unwrap_or("Compute Unit"),
                        "ip_address": body["ip_address"],
                        "status": "online"
                    }})),
                )
            }),
        )
        .route(
            "/api/compute_units/:id",
            put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                Json(json!({"compute_unit": {
                    "id": id,
                    "name": "edge-1",
                    "ip_address": "10.0.0.5",
                    "status": body["status"].as_str().unwrap_or("unknown")
                }}))
            }),
        )
        .route(
            "/get_cameras",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                let ip = query.get("compute_unit_ip").cloned().unwrap_or_default();
                Json(json!({"payload": [
                    {"streamer_uuid": "cam-1", "streamer_hr_name": "Gate", "is_alive": 1,
                     "features": ["detector.person"]},
                    {"streamer_uuid": "cam-2", "streamer_hr_name": "Dock", "is_alive": "false",
                     "compute_unit_ip": ip.clone() + "-explicit"}
                ]}))
            }),
        )
        .route(
            "/api/apps/assignments",
            get(|| async {
                Json(json!({"assignments": [
                    {"assignment_uuid": "as-1", "streamer_uuid": "cam-1", "app_name": "detector", "result_name": "person"},
                    {"assignment_uuid": "as-2", "streamer_uuid": "cam-2", "app_name": "detector", "result_name": "car"}
                ]}))
            }),
        )
        .route(
            "/api/memory_set/samples",
            get(|| async { Json(json!({"sample_uuids": ["s1", "s2", "s1"]})) }),
        )
        .route(
            "/api/anomaly_logs/image",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], vec![1u8, 2, 3]) }),
        )
        .route(
            "/api/anomaly_logs/star",
            post(|headers: HeaderMap| async move {
                if headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok())
                    == Some("Bearer secret")
                {
                    StatusCode::OK.into_response()
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({"error": "token required"})))
                        .into_response()
                }
            }),
        )
        .route(
            "/api/system/stats",
            get(|| async {
                Json(json!({"cpu_usage": 23.5, "memory_usage": 61.0, "memory_total": 8192,
                    "disk_usage": 40.2, "temperature": 52.3, "uptime": "3d 4h 5m",
                    "uptime_seconds": 273900}))
            }),
        )
        .route(
            "/api/ai_service/health",
            get(|| async { Json(json!({"status": "healthy"})) }),
        )
        .route(
            "/api/streamers/configs",
            get(|Query(query): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "streamer_uuid": query.get("streamer_uuid"),
                    "configs": [{"app_name": "detector", "threshold": 0.5}]
                }))
            }),
        )
        .route(
            "/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "pw" {
                    (
                        StatusCode::OK,
                        Json(json!({"access_token": "secret", "user": {"username": body["username"]}})),
                    )
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid credentials"})))
                }
            }),
        )
}

#[tokio::test]
async fn list_units_skips_malformed_rows() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let units = backend.list_units().await.expect("units");
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].id, "1");
    assert_eq!(units[0].status, UnitStatus::Online);
}

#[tokio::test]
async fn add_unit_unwraps_and_reports_conflict() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let unit = backend
        .add_unit(" 10.0.0.6 ", Some("lab"))
        .await
        .expect("created");
    assert_eq!(unit.id, "7");
    assert_eq!(unit.name, "lab");
    assert_eq!(unit.ip_address, "10.0.0.6");

    let err = backend
        .add_unit("10.0.0.9", None)
        .await
        .expect_err("conflict");
    assert_eq!(
        err,
        BackendError::Status {
            status: 409,
            message: "Compute unit with this IP already exists".to_string()
        }
    );

    let err = backend.add_unit("  ", None).await.expect_err("blank ip");
    assert!(matches!(err, BackendError::InvalidInput(_)));
}

#[tokio::test]
async fn update_unit_sends_status() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let unit = backend
        .update_unit("1", &UnitUpdate::status(UnitStatus::Offline))
        .await
        .expect("updated");
    assert_eq!(unit.status, UnitStatus::Offline);
}

#[tokio::test]
async fn cameras_are_stamped_with_unit_ip() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let cameras = backend.list_cameras("10.0.0.5").await.expect("cameras");
    assert_eq!(cameras.len(), 2);
    assert_eq!(cameras[0].compute_unit_ip.as_deref(), Some("10.0.0.5"));
    assert!(cameras[0].is_alive);
    assert_eq!(
        cameras[1].compute_unit_ip.as_deref(),
        Some("10.0.0.5-explicit")
    );
    assert!(!cameras[1].is_alive);
}

#[tokio::test]
async fn assignments_filtered_by_streamer() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let all = backend
        .list_assignments("10.0.0.5", None)
        .await
        .expect("all");
    assert_eq!(all.len(), 2);
    let filtered = backend
        .list_assignments("10.0.0.5", Some("cam-2"))
        .await
        .expect("filtered");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].result_name, "car");
}

#[tokio::test]
async fn memory_set_samples_are_deduplicated() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let samples = backend
        .memory_set_samples("10.0.0.5", "set-1")
        .await
        .expect("samples");
    assert_eq!(samples, vec!["s1", "s2"]);
}

#[tokio::test]
async fn anomaly_image_keeps_content_type() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let image = backend
        .anomaly_image("10.0.0.5", "/logs/a.png")
        .await
        .expect("image");
    assert_eq!(image.content_type, "image/png");
    assert_eq!(image.bytes, vec![1, 2, 3]);
}

#[tokio::test]
async fn login_stores_bearer_token() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);

    let err = backend
        .star_anomaly("10.0.0.5", "an-1", true)
        .await
        .expect_err("unauthorized");
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("token required"));

    let err = backend.login("admin", "wrong").await.expect_err("bad password");
    assert_eq!(err.status(), Some(401));

    let user = backend.login("admin", "pw").await.expect("login");
    assert_eq!(user["username"], "admin");
    backend
        .star_anomaly("10.0.0.5", "an-1", true)
        .await
        .expect("authorized");
}

#[tokio::test]
async fn rejected_token_triggers_relogin() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client_with_credentials(&addr, Some("expired"), Some(("admin", "pw")));
    backend
        .star_anomaly("10.0.0.5", "an-1", true)
        .await
        .expect("retried after login");

    let backend = client_with_credentials(&addr, Some("expired"), Some(("admin", "wrong")));
    let err = backend
        .star_anomaly("10.0.0.5", "an-1", true)
        .await
        .expect_err("login rejected");
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid credentials"));
}

#[tokio::test]
async fn startup_login_against_unreachable_backend_fails_softly() {
    let backend = client_with_credentials("127.0.0.1:1", None, Some(("admin", "pw")));
    let err = backend
        .login_with_credentials()
        .await
        .expect_err("unreachable");
    assert!(matches!(err, BackendError::Transport(_)));

    let backend = client("127.0.0.1:1", None);
    let err = backend
        .login_with_credentials()
        .await
        .expect_err("no credentials");
    assert!(matches!(err, BackendError::InvalidInput(_)));
}

#[tokio::test]
async fn system_stats_decode() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let stats = backend.system_stats().await.expect("stats");
    assert_eq!(stats.cpu_usage, 23.5);
    assert_eq!(stats.memory_total, 8192);
    assert_eq!(stats.disk_free, 0);
    assert_eq!(stats.uptime, "3d 4h 5m");
}

#[tokio::test]
async fn ai_service_health_passes_through() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let health = backend.ai_service_health().await.expect("health");
    assert_eq!(health["status"], "healthy");

    let down = Router::new().route(
        "/api/ai_service/health",
        get(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": "Could not connect to AI service"})),
            )
        }),
    );
    let addr = spawn_server(down).await;
    let err = client(&addr, None)
        .ai_service_health()
        .await
        .expect_err("down");
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn streamer_configs_send_uuid() {
    let addr = spawn_server(fake_backend()).await;
    let backend = client(&addr, None);
    let configs = backend.streamer_configs("cam-1").await.expect("configs");
    assert_eq!(configs["streamer_uuid"], "cam-1");
    assert_eq!(configs["configs"][0]["app_name"], "detector");

    let err = backend.streamer_configs(" ").await.expect_err("blank");
    assert!(matches!(err, BackendError::InvalidInput(_)));
}

#[tokio::test]
async fn ping_requires_pong() {
    let pong = Router::new().route("/ping", get(|| async { Json(json!({"msg": "pong"})) }));
    let addr = spawn_server(pong).await;
    let backend = client("127.0.0.1:1", None);
    let report = backend.ping_unit(&addr).await;
    assert!(report.reachable);
    assert_eq!(report.method, PingMethod::DirectAiPing);

    let busy = Router::new().route("/ping", get(|| async { Json(json!({"status": "busy"})) }));
    let addr = spawn_server(busy).await;
    let report = backend.ping_unit(&addr).await;
    assert!(!report.reachable);
    assert_eq!(report.response, "busy");

    let missing = Router::new();
    let addr = spawn_server(missing).await;
    let report = backend.ping_unit(&addr).await;
    assert!(!report.reachable);
    assert_eq!(report.response, "Device not found (HTTP 404)");
}

#[tokio::test]
async fn ping_refused_is_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let backend = client("127.0.0.1:1", None);
    let report = backend.ping_unit(&format!("127.0.0.1:{port}")).await;
    assert!(!report.reachable);
    assert_eq!(report.method, PingMethod::ConnectionRefused);
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let backend = client("127.0.0.1:1", None);
    let err = backend.list_units().await.expect_err("unreachable");
    assert!(matches!(err, BackendError::Transport(_)));
}
