//! Liveness endpoint
//!
//! Reports the sizes of the loaded tables alongside the service version so
//! an operator can tell an empty models directory from a healthy one.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub artifacts: ArtifactCounts,
}

/// Row counts of the in-memory tables
#[derive(Debug, Serialize)]
pub struct ArtifactCounts {
    pub popular_books: usize,
    pub indexed_titles: usize,
    pub metadata_records: usize,
    pub similarity_rows: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = &state.artifacts;

    Json(HealthResponse {
        status: "ok",
        module: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        artifacts: ArtifactCounts {
            popular_books: store.popular.len(),
            indexed_titles: store.pivot.len(),
            metadata_records: store.metadata.len(),
            similarity_rows: store.similarity.len(),
        },
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
