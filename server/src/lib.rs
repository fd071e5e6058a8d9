use anyhow::{bail, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use engine::persist::load_snapshot;
use engine::{Engine, SearchHit, VocabularySkew};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<SearchHit>,
}

#[derive(Deserialize)]
pub struct StatsParams {
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    10
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub documents: usize,
    pub word_count: u64,
    pub vocabulary_size: usize,
    pub top_terms: Vec<(String, u64)>,
    pub fifteen_percent: VocabularySkew,
}

/// The finalized index is immutable, so concurrent requests share it behind
/// a plain Arc.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

pub fn build_app(snapshot_path: &str) -> Result<Router> {
    let engine = load_snapshot(snapshot_path)?;
    if !engine.is_weighted() {
        bail!("snapshot {snapshot_path} holds raw counts; queries need finalized weights");
    }
    tracing::info!(
        documents = engine.doc_count(),
        vocabulary = engine.vocabulary_size(),
        "snapshot loaded"
    );
    let state = AppState { engine: Arc::new(engine) };

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let results = state
        .engine
        .process_query(&params.q)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        results,
    }))
}

pub async fn stats_handler(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Json<StatsResponse> {
    let engine = &state.engine;
    Json(StatsResponse {
        documents: engine.doc_count(),
        word_count: engine.word_count(),
        vocabulary_size: engine.vocabulary_size(),
        top_terms: engine.top_n(params.top),
        fifteen_percent: engine.fifteen_percent_vocabulary(),
    })
}
