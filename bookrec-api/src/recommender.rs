//! Item-to-item recommendation over the precomputed similarity matrix
//!
//! Given an exact title, finds its pivot-table row, ranks every column of
//! the matching similarity row by descending score, drops the top rank
//! (the title itself) and joins the next few against the metadata table.

use bookrec_common::artifacts::BookRecord;
use bookrec_common::{ArtifactStore, Error, Result};
use serde::Serialize;
use tracing::debug;

/// Maximum number of recommendations returned per lookup
pub const RECOMMENDATION_COUNT: usize = 4;

/// Leading ranks skipped; rank 1 is assumed to be the query title
const SELF_RANKS: usize = 1;

/// One recommended book as returned by `/recommend`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub author: Option<String>,
    pub image: Option<String>,
}

impl From<&BookRecord> for Recommendation {
    fn from(record: &BookRecord) -> Self {
        Self {
            title: record.title.clone(),
            author: record.author.clone(),
            image: record.image_url.clone(),
        }
    }
}

/// Recommend books similar to `title`
///
/// Returns `Error::NotFound` when `title` is not a pivot-table row label.
/// Titles without metadata are skipped, so fewer than
/// [`RECOMMENDATION_COUNT`] results may come back.
pub fn recommend(store: &ArtifactStore, title: &str) -> Result<Vec<Recommendation>> {
    let index = store
        .pivot
        .position(title)
        .ok_or_else(|| Error::NotFound(title.to_string()))?;

    let Some(scores) = store.similarity.row(index) else {
        debug!(index, "Pivot row has no similarity row");
        return Ok(Vec::new());
    };

    let recommendations: Vec<Recommendation> = rank_similar(scores)
        .filter_map(|i| store.pivot.title(i))
        .filter_map(|similar| store.metadata.first(similar))
        .map(Recommendation::from)
        .collect();

    debug!(
        title,
        index,
        count = recommendations.len(),
        "Resolved recommendations"
    );

    Ok(recommendations)
}

/// Column indices of the best-scoring neighbours, best first
///
/// Stable sort: equal scores keep ascending column order. NaN ranks below
/// every real score so it can never displace the query row from rank 1.
fn rank_similar(scores: &[f64]) -> impl Iterator<Item = usize> {
    let mut ranked: Vec<(usize, f64)> = scores
        .iter()
        .map(|&score| if score.is_nan() { f64::NEG_INFINITY } else { score })
        .enumerate()
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .skip(SELF_RANKS)
        .take(RECOMMENDATION_COUNT)
        .map(|(i, _)| i)
}
