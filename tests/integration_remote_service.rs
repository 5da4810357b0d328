//! Integration tests for connected sessions.
//!
//! An in-process axum server plays the remote dataset API: Basic auth,
//! multipart uploads, a five-entry history listing and PDF report downloads.

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chemviz::models::{ExtremesSource, RemoteSummary, SessionMode};
use chemviz::summary::type_distribution;
use chemviz::{AppConfig, ChemvizError, Session, parse_csv, summarize};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// `analyst:secret`
const VALID_AUTH: &str = "Basic YW5hbHlzdDpzZWNyZXQ=";

const SAMPLE: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature
Pump A,Pump,120,8.5,320
Reactor 1,Reactor,200,15.0,450
Mixer 1,Mixer,90,5.0,280";

#[derive(Clone)]
struct StoredDataset {
    id: u64,
    filename: String,
    uploaded_at: DateTime<Utc>,
    summary: RemoteSummary,
}

#[derive(Clone, Default)]
struct ApiState {
    datasets: Arc<Mutex<Vec<StoredDataset>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == VALID_AUTH)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Invalid username/password."})),
    )
        .into_response()
}

async fn upload(State(state): State<ApiState>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            upload = Some((name, String::from_utf8_lossy(&bytes).into_owned()));
        }
    }

    let Some((filename, text)) = upload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "CSV file is required"})),
        )
            .into_response();
    };
    if !text.starts_with("Equipment Name") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Missing required columns"})),
        )
            .into_response();
    }

    let records = parse_csv(&text);
    let local = summarize(&records);
    let summary = RemoteSummary {
        total_equipment: local.total_count,
        avg_flowrate: local.average_flowrate,
        avg_pressure: local.average_pressure,
        avg_temperature: local.average_temperature,
        type_distribution: type_distribution(&records),
    };

    let mut datasets = state.datasets.lock().unwrap();
    let id = datasets.iter().map(|d| d.id).max().unwrap_or(0) + 1;
    datasets.insert(
        0,
        StoredDataset {
            id,
            filename,
            uploaded_at: Utc::now(),
            summary: summary.clone(),
        },
    );
    datasets.truncate(5);

    (
        StatusCode::CREATED,
        Json(json!({"message": "CSV uploaded successfully", "summary": summary})),
    )
        .into_response()
}

async fn history(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let datasets = state.datasets.lock().unwrap();
    let listing: Vec<_> = datasets
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "filename": d.filename,
                "uploaded_at": d.uploaded_at,
                "summary": d.summary,
            })
        })
        .collect();
    Json(listing).into_response()
}

async fn report(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let exists = state.datasets.lock().unwrap().iter().any(|d| d.id == id);
    if !exists {
        return StatusCode::NOT_FOUND.into_response();
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        b"%PDF-1.4 equipment report".to_vec(),
    )
        .into_response()
}

/// Start the fake API and return a config pointing at it
async fn spawn_api(state_dir: &TempDir) -> (AppConfig, ApiState) {
    let state = ApiState::default();
    let app = Router::new()
        .route("/api/upload/", post(upload))
        .route("/api/history/", get(history))
        .route("/api/report/{id}/", get(report))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = AppConfig::default()
        .with_api_base_url(format!("http://{addr}/api"))
        .with_state_dir(state_dir.path())
        .with_report_dir(state_dir.path().join("reports"));
    (config, state)
}

async fn connected_session(config: &AppConfig) -> Session {
    Session::login(config, "analyst", "secret").await.unwrap()
}

#[tokio::test]
async fn test_login_connected() {
    let temp_dir = TempDir::new().unwrap();
    let (config, _) = spawn_api(&temp_dir).await;

    let session = connected_session(&config).await;
    assert_eq!(session.mode(), SessionMode::Connected);
    assert_eq!(session.username(), "analyst");
}

#[tokio::test]
async fn test_login_rejected_even_for_demo_pair() {
    let temp_dir = TempDir::new().unwrap();
    let (config, _) = spawn_api(&temp_dir).await;

    for (user, password) in [("analyst", "wrong"), ("admin", "admin123")] {
        let result = Session::login(&config, user, password).await;
        assert!(matches!(result, Err(ChemvizError::InvalidCredentials)));
    }
}

#[tokio::test]
async fn test_upload_recomputes_extremes_locally() {
    let temp_dir = TempDir::new().unwrap();
    let (config, state) = spawn_api(&temp_dir).await;
    let mut session = connected_session(&config).await;

    let dataset = session.upload("plant.csv", SAMPLE).await.unwrap();

    assert_eq!(dataset.records.len(), 3);
    assert_eq!(dataset.summary.total_count, 3);
    assert_eq!(dataset.summary.extremes, ExtremesSource::Local);
    assert_eq!(dataset.summary.min_flowrate, 90.0);
    assert_eq!(dataset.summary.max_flowrate, 200.0);
    assert_eq!(dataset.summary.type_distribution["Reactor"], 1);
    assert_eq!(dataset.history_id, Some(1));
    assert_eq!(state.datasets.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_message_surfaces() {
    let temp_dir = TempDir::new().unwrap();
    let (config, _) = spawn_api(&temp_dir).await;
    let mut session = connected_session(&config).await;

    let result = session
        .upload("bad.csv", "Name,Kind\nPump A,Pump")
        .await;

    match result {
        Err(ChemvizError::Remote { message }) => assert_eq!(message, "Missing required columns"),
        other => panic!("expected remote error, got {other:?}"),
    }
    assert!(session.current().is_none());
}

#[tokio::test]
async fn test_history_entries_have_no_rows() {
    let temp_dir = TempDir::new().unwrap();
    let (config, _) = spawn_api(&temp_dir).await;
    let mut session = connected_session(&config).await;

    for name in ["a.csv", "b.csv", "c.csv", "d.csv", "e.csv", "f.csv"] {
        session.upload(name, SAMPLE).await.unwrap();
    }

    let history = session.history().await.unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].file_name, "f.csv");
    assert_eq!(history[0].record_count, 3);
    assert!(history.iter().all(|entry| !entry.has_records()));
    assert!(
        history
            .iter()
            .all(|entry| entry.summary.extremes == ExtremesSource::Unavailable)
    );

    let dataset = session.load_from_history(history[2].id).await.unwrap();
    assert_eq!(dataset.file_name, "d.csv");
    assert!(dataset.records.is_empty());
    assert_eq!(dataset.summary.max_flowrate, 0.0);
}

#[tokio::test]
async fn test_report_download() {
    let temp_dir = TempDir::new().unwrap();
    let (config, _) = spawn_api(&temp_dir).await;
    let mut session = connected_session(&config).await;
    let id = session
        .upload("plant.csv", SAMPLE)
        .await
        .unwrap()
        .history_id
        .unwrap();

    let path = session
        .report_history_entry(id, &config.report_dir)
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "plant.csv_report.pdf");
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));

    let missing = session.report_history_entry(99, &config.report_dir).await;
    assert!(matches!(
        missing,
        Err(ChemvizError::HistoryEntryNotFound { id: 99 })
    ));
}

#[tokio::test]
async fn test_local_report_of_current_upload() {
    let temp_dir = TempDir::new().unwrap();
    let (config, _) = spawn_api(&temp_dir).await;
    let mut session = connected_session(&config).await;
    session.upload("plant.csv", SAMPLE).await.unwrap();

    let path = session.report_current(&config.report_dir).unwrap();
    let text = std::fs::read_to_string(path).unwrap();

    assert!(text.contains("Flowrate: 90 - 200 m³/h"));
    assert!(text.contains("Reactor 1 (Reactor): Flow=200, Pressure=15, Temp=450"));
}

#[tokio::test]
async fn test_remote_history_cannot_be_cleared() {
    let temp_dir = TempDir::new().unwrap();
    let (config, _) = spawn_api(&temp_dir).await;
    let mut session = connected_session(&config).await;

    assert!(matches!(
        session.clear_history().await,
        Err(ChemvizError::Remote { .. })
    ));
}

#[tokio::test]
async fn test_resumed_session_uses_remote_service() {
    let temp_dir = TempDir::new().unwrap();
    let (config, _) = spawn_api(&temp_dir).await;
    let store = chemviz::SessionStore::new(&config);

    let mut session = connected_session(&config).await;
    session.upload("plant.csv", SAMPLE).await.unwrap();
    store.save(&session.to_stored()).unwrap();

    let stored = store.load().unwrap().unwrap();
    let resumed = Session::resume(&config, &stored).unwrap();
    assert_eq!(resumed.mode(), SessionMode::Connected);
    assert_eq!(resumed.history().await.unwrap().len(), 1);

    resumed.logout(&store).await.unwrap();
    assert!(store.load().unwrap().is_none());
}
