use axum::body::Body;
use axum::http::{Request, StatusCode};
use engine::persist::save_snapshot;
use engine::Engine;
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

fn write_snapshot(path: &Path, weighted: bool) {
    let mut engine = Engine::default();
    engine
        .ingest_document("doc0", "Rust is great. Rust systems programming in Rust.", None)
        .unwrap();
    engine.ingest_document("doc1", "Cooking pasta slowly.", None).unwrap();
    if weighted {
        engine.compute_weights().unwrap();
    }
    save_snapshot(path, &engine).unwrap();
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    write_snapshot(&path, true);
    let app = server::build_app(path.to_str().unwrap()).unwrap();

    let (status, json) = get_json(app, "/search?q=rust").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["key"], "doc0");
    assert!(results[0]["score"].as_f64().unwrap() > 0.0);
    assert_eq!(results[1]["score"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn stats_reports_corpus_statistics() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    write_snapshot(&path, true);
    let app = server::build_app(path.to_str().unwrap()).unwrap();

    let (status, json) = get_json(app, "/stats?top=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["documents"], 2);
    assert_eq!(json["top_terms"].as_array().unwrap().len(), 3);
    assert_eq!(json["top_terms"][0][0], "rust");
    assert_eq!(json["top_terms"][0][1], 3);
}

#[test]
fn raw_snapshots_are_rejected_at_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    write_snapshot(&path, false);
    assert!(server::build_app(path.to_str().unwrap()).is_err());
}
