//! Integration tests for the dataset, engine and health endpoints

mod common;

use axum::http::StatusCode;
use common::*;
use std::path::PathBuf;
use tower::Service;

#[tokio::test]
async fn test_dataset_metrics_available() {
    let file = dataset_file(TWO_UNIT_DATASET, ".txt");
    let (mut app, _) = make_app(config_for(Some(file.path().to_path_buf())));

    let response = app.call(get("/dataset-metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["available"], true);
    assert_eq!(json["summary"]["rows"], 5);
    assert_eq!(json["summary"]["units"], 2);
    assert_eq!(json["summary"]["num_sensors"], 2);
    assert_eq!(json["summary"]["max_rul"], 2.0);
    assert_eq!(json["summary"]["min_rul"], 0.0);
    let mean = json["summary"]["mean_rul"].as_f64().unwrap();
    assert!((mean - 0.8).abs() < 1e-9);
}

#[tokio::test]
async fn test_dataset_metrics_csv_with_header() {
    let file = dataset_file(
        "unit,cycle,s1\n1,1,0.5\n1,2,0.7\n2,1,0.9\n",
        ".csv",
    );
    let (mut app, _) = make_app(config_for(Some(file.path().to_path_buf())));

    let json = body_json(app.call(get("/dataset-metrics")).await.unwrap()).await;
    assert_eq!(json["available"], true);
    assert_eq!(json["summary"]["rows"], 3);
    assert_eq!(json["summary"]["num_sensors"], 1);
}

#[tokio::test]
async fn test_dataset_metrics_missing_file_is_200_unavailable() {
    let (mut app, _) = make_app(config_for(Some(PathBuf::from(
        "/nonexistent/train_FD001.txt",
    ))));

    let response = app.call(get("/dataset-metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["available"], false);
    assert!(json["reason"]
        .as_str()
        .unwrap()
        .starts_with("file not found"));
    assert!(json.get("summary").is_none());
}

#[tokio::test]
async fn test_dataset_metrics_not_configured() {
    let (mut app, _) = make_app(config_for(None));

    let json = body_json(app.call(get("/dataset-metrics")).await.unwrap()).await;
    assert_eq!(json["available"], false);
    assert!(json["reason"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn test_dataset_metrics_malformed_row_names_line() {
    let file = dataset_file("1 1 0.5\n1 2 abc\n", ".txt");
    let (mut app, _) = make_app(config_for(Some(file.path().to_path_buf())));

    let json = body_json(app.call(get("/dataset-metrics")).await.unwrap()).await;
    assert_eq!(json["available"], false);
    assert!(json["reason"].as_str().unwrap().contains("line 2"));
}

#[tokio::test]
async fn test_reload_picks_up_new_rows() {
    use std::io::Write;

    let mut file = dataset_file(TWO_UNIT_DATASET, ".txt");
    let (mut app, _) = make_app(config_for(Some(file.path().to_path_buf())));

    let before = body_json(app.call(get("/dataset-metrics")).await.unwrap()).await;
    assert_eq!(before["summary"]["units"], 2);

    file.write_all(b"3 1 518.67 641.90\n").unwrap();
    file.flush().unwrap();

    // cached until reloaded
    let cached = body_json(app.call(get("/dataset-metrics")).await.unwrap()).await;
    assert_eq!(cached["summary"]["units"], 2);

    let reloaded = app.call(post("/dataset-metrics/reload")).await.unwrap();
    assert_eq!(reloaded.status(), StatusCode::OK);
    let reloaded = body_json(reloaded).await;
    assert_eq!(reloaded["summary"]["units"], 3);
    assert_eq!(reloaded["summary"]["rows"], 6);

    let after = body_json(app.call(get("/dataset-metrics")).await.unwrap()).await;
    assert_eq!(after["summary"]["units"], 3);
}

#[tokio::test]
async fn test_reload_requires_post() {
    let (mut app, _) = make_app(config_for(None));

    let response = app.call(get("/dataset-metrics/reload")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_engine_returns_initial_reading() {
    let (mut app, _) = make_app(config_for(None));

    let response = app.call(get("/engine")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["energy"], 500.0);
    assert_eq!(json["temp"], 300.0);
}

#[tokio::test]
async fn test_engine_history_reflects_recorded_readings() {
    use engine_twin::telemetry::EngineReading;

    let (mut app, state) = make_app(config_for(None));
    for temp in [310.0, 320.0] {
        state
            .telemetry
            .record(EngineReading {
                energy: 505.0,
                temp,
            })
            .unwrap();
    }

    let latest = body_json(app.call(get("/engine")).await.unwrap()).await;
    assert_eq!(latest["temp"], 320.0);

    let history = body_json(app.call(get("/engine/history")).await.unwrap()).await;
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["temp"], 310.0);
    assert!(entries[0]["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_does_not_trigger_load() {
    let (mut app, state) = make_app(config_for(Some(PathBuf::from("/nonexistent.txt"))));

    let json = body_json(app.call(get("/health")).await.unwrap()).await;
    assert_eq!(json["status"], "ok");
    assert!(json["dataset_available"].is_null());
    assert!(state.dataset.peek().is_none());

    app.call(get("/dataset-metrics")).await.unwrap();

    let json = body_json(app.call(get("/health")).await.unwrap()).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["dataset_available"], false);
}

#[tokio::test]
async fn test_request_id_generated_and_echoed() {
    let (mut app, _) = make_app(config_for(None));

    let response = app.call(get("/health")).await.unwrap();
    let generated = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(generated.len(), UUID_V4_STRING_LEN);

    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-abc");
}

#[tokio::test]
async fn test_metrics_endpoint_prometheus_content_type() {
    let (mut app, _) = make_app(config_for(None));

    let response = app.call(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let (mut app, _) = make_app(config_for(None));

    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/dataset-metrics")
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "GET")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.call(request).await.unwrap();

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_unknown_route_404() {
    let (mut app, _) = make_app(config_for(None));

    let response = app.call(get("/v1/chat/completions")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
