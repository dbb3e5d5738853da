//! Read-only artifact store
//!
//! Loads the four precomputed tables from a models directory once at
//! startup. Nothing is written back and nothing is reloaded while running.
//! The schema is an external contract; beyond JSON decoding, no
//! cross-table consistency is checked.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

mod tables;
pub use tables::{BookRecord, MetadataTable, PivotTable, PopularBook, SimilarityMatrix};
use tables::PivotTableFile;

/// Popularity table file name
pub const POPULAR_FILE: &str = "popular.json";

/// Pivot table file name
pub const PIVOT_FILE: &str = "pt.json";

/// Book metadata file name
pub const BOOKS_FILE: &str = "books.json";

/// Similarity matrix file name
pub const SIMILARITY_FILE: &str = "similarity_scores.json";

/// Process-lifetime recommendation tables
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    pub popular: Vec<PopularBook>,
    pub pivot: PivotTable,
    pub metadata: MetadataTable,
    pub similarity: SimilarityMatrix,
}

impl ArtifactStore {
    /// Assemble a store from already-built tables
    pub fn new(
        popular: Vec<PopularBook>,
        pivot: PivotTable,
        metadata: MetadataTable,
        similarity: SimilarityMatrix,
    ) -> Self {
        Self {
            popular,
            pivot,
            metadata,
            similarity,
        }
    }

    /// Load all four artifacts from `models_dir`
    ///
    /// Fails on the first missing or malformed file.
    pub fn load(models_dir: &Path) -> Result<Self> {
        if !models_dir.is_dir() {
            return Err(Error::Artifact(format!(
                "Models directory not found: {}",
                models_dir.display()
            )));
        }

        let popular: Vec<PopularBook> = read_json(&models_dir.join(POPULAR_FILE))?;
        info!("Loaded popularity table: {} books", popular.len());

        let pivot: PivotTable = read_json::<PivotTableFile>(&models_dir.join(PIVOT_FILE))?.into();
        info!(
            "Loaded pivot table: {} titles x {} columns",
            pivot.len(),
            pivot.column_count()
        );

        let metadata = MetadataTable::new(read_json(&models_dir.join(BOOKS_FILE))?);
        info!(
            "Loaded book metadata: {} records ({} distinct titles)",
            metadata.len(),
            metadata.distinct_titles()
        );

        let similarity: SimilarityMatrix = read_json(&models_dir.join(SIMILARITY_FILE))?;
        info!("Loaded similarity matrix: {} rows", similarity.len());

        Ok(Self::new(popular, pivot, metadata, similarity))
    }
}

/// Read and decode one JSON artifact
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::Artifact(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::Artifact(format!("Failed to decode {}: {}", path.display(), e)))
}
