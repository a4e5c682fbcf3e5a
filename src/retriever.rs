use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata attached to one retrieved chunk of course material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub course_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u32>,
}

impl ChunkMetadata {
    pub fn new<S: Into<String>>(course_title: S, lesson_number: Option<u32>) -> Self {
        Self {
            course_title: course_title.into(),
            lesson_number,
        }
    }
}

/// One semantic-search result set. The three sequences are index-aligned:
/// documents[i] corresponds to metadata[i] and distances[i]. An empty result
/// is a defined outcome, distinct from a RetrieverError.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub distances: Vec<f64>,
}

impl SearchResults {
    pub fn new(documents: Vec<String>, metadata: Vec<ChunkMetadata>, distances: Vec<f64>) -> Self {
        debug_assert_eq!(documents.len(), metadata.len());
        debug_assert_eq!(documents.len(), distances.len());
        Self {
            documents,
            metadata,
            distances,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Errors surfaced by the retrieval backend. The Display strings are
/// forwarded verbatim to the model as tool-result text, so they must stay
/// human-readable.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrieverError {
    #[error("Search error: {0}")]
    Backend(String),

    #[error("No course found matching '{0}'")]
    CourseNotFound(String),

    /// A store configured to return zero results per query is a
    /// configuration error, not a crash.
    #[error("Search error: Number of requested results {0}, cannot be less than 1.")]
    InvalidResultCount(usize),
}

/// Semantic search over the course corpus. Implementations wrap the vector
/// store; the generation stack only ever sees this trait.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Run one semantic-search call, optionally narrowed to a course and/or
    /// lesson. Ranking is the implementation's responsibility; callers must
    /// not reorder the results.
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<SearchResults, RetrieverError>;

    /// Link to a lesson's page, if the corpus has one for this
    /// (course, lesson) pair.
    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String>;
}
