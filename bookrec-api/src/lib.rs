//! bookrec-api library - popularity and similarity lookup service
//!
//! Serves read-only endpoints over tables loaded once at startup.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use bookrec_common::{ArtifactStore, Error, Result};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod api;
pub mod recommender;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Recommendation tables (read-only for the process lifetime)
    pub artifacts: Arc<ArtifactStore>,
}

impl AppState {
    /// Create new application state
    pub fn new(artifacts: ArtifactStore) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }
}

/// Build application router
///
/// CORS admits exactly `allowed_origin` (or any origin for `*`), with any
/// method and header. Request spans and response events are emitted at
/// INFO so they show under the default `tower_http` filter.
pub fn build_router(state: AppState, allowed_origin: &str) -> Result<Router> {
    use axum::routing::{get, post};

    let cors = CorsLayer::new()
        .allow_origin(cors_origin(allowed_origin)?)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/popular", get(api::get_popular))
        .route("/recommend", post(api::post_recommend))
        .route("/build_info", get(api::get_build_info))
        .merge(api::health_routes())
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors))
}

/// Requests carrying any other `Origin` get no allow-origin header
fn cors_origin(allowed_origin: &str) -> Result<AllowOrigin> {
    if allowed_origin == "*" {
        return Ok(AllowOrigin::any());
    }

    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| Error::Config(format!("Invalid CORS origin {:?}: {}", allowed_origin, e)))?;

    Ok(AllowOrigin::list([origin]))
}
