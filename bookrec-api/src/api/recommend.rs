//! Similar-book recommendation endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookrec_common::Error;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::recommender::{self, Recommendation};
use crate::AppState;

/// Error message for titles absent from the pivot table
pub const BOOK_NOT_FOUND: &str = "Book not found";

/// POST /recommend request body
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Exact book title (case-sensitive)
    pub user_input: String,
}

/// POST /recommend response body
///
/// Unknown titles are reported in the payload, not via HTTP status.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RecommendResponse {
    Found { recommendations: Vec<Recommendation> },
    NotFound { error: String },
}

/// POST /recommend
pub async fn post_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, RecommendError> {
    let result = recommender::recommend(&state.artifacts, &request.user_input);
    respond(result).map(Json)
}

/// Map a recommender result onto the response payload
///
/// Only `NotFound` becomes the in-band "Book not found" payload; anything
/// else is a server fault.
fn respond(
    result: bookrec_common::Result<Vec<Recommendation>>,
) -> Result<RecommendResponse, RecommendError> {
    match result {
        Ok(recommendations) => Ok(RecommendResponse::Found { recommendations }),
        Err(Error::NotFound(title)) => {
            debug!("No pivot row for title {:?}", title);
            Ok(RecommendResponse::NotFound {
                error: BOOK_NOT_FOUND.to_string(),
            })
        }
        Err(e) => Err(RecommendError::Internal(e.to_string())),
    }
}

/// Recommendation API errors
#[derive(Debug)]
pub enum RecommendError {
    Internal(String),
}

impl IntoResponse for RecommendError {
    fn into_response(self) -> Response {
        let RecommendError::Internal(message) = self;
        error!("Recommendation failed: {}", message);

        let body = Json(json!({
            "error": message,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
