//! Popularity list endpoint

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use bookrec_common::artifacts::PopularBook;
use serde::Serialize;

use crate::AppState;

/// `/popular` response body
///
/// Borrows the loaded table so nothing is cloned per request.
#[derive(Debug, Serialize)]
pub struct PopularResponse<'a> {
    pub books: &'a [PopularBook],
}

/// GET /popular
///
/// Returns the whole popularity table in stored order, projected to
/// title, author, image URL, rating count and average rating.
pub async fn get_popular(State(state): State<AppState>) -> Response {
    Json(PopularResponse {
        books: &state.artifacts.popular,
    })
    .into_response()
}
