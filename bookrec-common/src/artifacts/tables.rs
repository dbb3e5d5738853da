//! In-memory table types for the precomputed recommendation artifacts

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the popularity table
///
/// Field names match the exported pandas column names, which are also the
/// wire names of the `/popular` response. Extra columns in the artifact are
/// dropped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularBook {
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author")]
    pub author: Option<String>,
    #[serde(rename = "Image-URL-M")]
    pub image_url: Option<String>,
    pub num_ratings: u64,
    pub avg_rating: f64,
}

/// One row of the book metadata table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author")]
    pub author: Option<String>,
    #[serde(rename = "Image-URL-M")]
    pub image_url: Option<String>,
}

/// Split-layout pivot table as exported by `DataFrame.to_json(orient="split")`
///
/// Only the row labels and column labels are read; `data` is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct PivotTableFile {
    pub index: Vec<String>,
    #[serde(default)]
    pub columns: Vec<serde_json::Value>,
}

/// Row labels of the pivot table
///
/// Row `i` of the pivot table corresponds to row `i` of the similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct PivotTable {
    labels: Vec<String>,
    column_count: usize,
    first_row: HashMap<String, usize>,
}

impl PivotTable {
    pub fn new(labels: Vec<String>, column_count: usize) -> Self {
        let mut first_row = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            first_row.entry(label.clone()).or_insert(i);
        }

        Self {
            labels,
            column_count,
            first_row,
        }
    }

    /// First row whose label equals `title` exactly (case-sensitive)
    pub fn position(&self, title: &str) -> Option<usize> {
        self.first_row.get(title).copied()
    }

    /// Label of row `index`
    pub fn title(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }
}

impl From<PivotTableFile> for PivotTable {
    fn from(file: PivotTableFile) -> Self {
        let column_count = file.columns.len();
        Self::new(file.index, column_count)
    }
}

/// Book metadata keyed by title
///
/// The source table may repeat a title; lookups return the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    records: Vec<BookRecord>,
    first_by_title: HashMap<String, usize>,
}

impl MetadataTable {
    pub fn new(records: Vec<BookRecord>) -> Self {
        let mut first_by_title = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            first_by_title.entry(record.title.clone()).or_insert(i);
        }

        Self {
            records,
            first_by_title,
        }
    }

    /// First record for `title`, if any
    pub fn first(&self, title: &str) -> Option<&BookRecord> {
        self.first_by_title
            .get(title)
            .and_then(|&i| self.records.get(i))
    }

    /// Number of records including duplicates
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct titles
    pub fn distinct_titles(&self) -> usize {
        self.first_by_title.len()
    }
}

/// Pairwise similarity scores between pivot-table rows
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
